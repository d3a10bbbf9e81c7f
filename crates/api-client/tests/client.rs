use api_client::{ApiClient, ApiConfig, ApiError, LoginRequest, ProfileUpdate, RegisterRequest};
use catalog::ProductFilter;
use httpmock::Method::{DELETE, GET, POST, PUT};
use httpmock::MockServer;
use serde_json::json;

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(ApiConfig {
        base_url: server.url("/api"),
        file_store_url: server.url(""),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn predict_uploads_multipart_with_bearer() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/predict")
                .header("authorization", "Bearer tok")
                .body_contains("name=\"file\"")
                .body_contains("captured-photo.jpg");
            then.status(200).json_body(json!({
                "success": true,
                "data": {
                    "id": "abc123def456ghi",
                    "hasil": "dry",
                    "akurasi": 0.91,
                    "wajah": "captured_photo.jpg",
                    "userid": "u1",
                    "collectionId": "pbc_2982428850",
                    "created": "2025-06-01 10:00:00.000Z"
                }
            }));
        })
        .await;

    let record = client(&server)
        .predict(Some("tok"), "captured-photo.jpg", b"jpeg-bytes".to_vec())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(record.label, "dry");
    assert_eq!(record.confidence, Some(0.91));
}

#[tokio::test]
async fn predict_html_body_is_server_error_page() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/predict");
            then.status(502)
                .header("content-type", "text/html")
                .body("<!DOCTYPE html><html><body>Bad Gateway</body></html>");
        })
        .await;

    let result = client(&server).predict(Some("tok"), "a.jpg", vec![1, 2]).await;
    assert!(matches!(result, Err(ApiError::HtmlResponse)));
}

#[tokio::test]
async fn predict_plain_text_body_is_invalid_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/predict");
            then.status(200).body("ok");
        })
        .await;

    let result = client(&server).predict(Some("tok"), "a.jpg", vec![1]).await;
    assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
}

#[tokio::test]
async fn predict_status_codes() {
    let cases = [(401, "unauthorized"), (404, "not_found"), (500, "server"), (422, "rejected")];

    for (status, kind) in cases {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/predict");
                then.status(status).json_body(json!({"error": "Gambar tidak valid"}));
            })
            .await;

        let err = client(&server)
            .predict(Some("tok"), "a.jpg", vec![1])
            .await
            .unwrap_err();

        let matched = match kind {
            "unauthorized" => matches!(err, ApiError::Unauthorized),
            "not_found" => matches!(err, ApiError::NotFound(_)),
            "server" => matches!(err, ApiError::Server { status: 500 }),
            _ => matches!(&err, ApiError::Rejected { message, .. } if message == "Gambar tidak valid"),
        };
        assert!(matched, "status {} gave {:?}", status, err);
    }
}

#[tokio::test]
async fn history_sends_paging() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/history")
                .query_param("page", "2")
                .query_param("limit", "5")
                .header("authorization", "Bearer tok");
            then.status(200).json_body(json!({
                "success": true,
                "history": [{"id": "r1", "hasil": "oily", "akurasi": 0.8}]
            }));
        })
        .await;

    let page = client(&server).history(Some("tok"), 2, 5).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.history.len(), 1);
    assert!(page.pagination.is_none());
}

#[tokio::test]
async fn history_entry_and_delete() {
    let server = MockServer::start_async().await;
    let get = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/history/r1");
            then.status(200)
                .json_body(json!({"success": true, "data": {"id": "r1", "hasil": "normal"}}));
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/history/r1");
            then.status(200).json_body(json!({"success": true}));
        })
        .await;

    let api = client(&server);
    let record = api.history_entry(Some("tok"), "r1").await.unwrap();
    api.delete_history(Some("tok"), "r1").await.unwrap();

    get.assert_async().await;
    delete.assert_async().await;
    assert_eq!(record.label, "normal");
}

#[tokio::test]
async fn products_forward_filters() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/products")
                .query_param("product_type", "Toner")
                .query_param("min_price", "50000");
            then.status(200).json_body(json!({
                "success": true,
                "products": [
                    {"id": "p1", "product_name": "Calm Toner", "brand": "Acme", "product_type": "Toner",
                     "skintype": "Sensitive", "price": 75000}
                ]
            }));
        })
        .await;

    let filter = ProductFilter {
        category: Some("Toner".into()),
        min_price: Some(50000),
        ..Default::default()
    };
    let products = client(&server).products(None, &filter).await.unwrap();

    mock.assert_async().await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].brand, "Acme");
}

#[tokio::test]
async fn products_success_false_is_rejected() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/products");
            then.status(200).json_body(json!({"success": false, "error": "Internal Server Error"}));
        })
        .await;

    let result = client(&server).products(None, &ProductFilter::default()).await;
    assert!(matches!(result, Err(ApiError::Rejected { status: 200, .. })));
}

#[tokio::test]
async fn login_returns_session() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/login")
                .json_body(json!({"email": "sari@example.com", "password": "secret1"}));
            then.status(200).json_body(json!({
                "success": true,
                "token": "jwt",
                "user": {"id": "u1", "nama": "Sari", "email": "sari@example.com", "poin": 10}
            }));
        })
        .await;

    let session = client(&server)
        .login(&LoginRequest::new(" sari@example.com ", "secret1"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(session.token.as_deref(), Some("jwt"));
    assert_eq!(session.user.name, "Sari");
}

#[tokio::test]
async fn register_sends_backend_field_names() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/register").json_body(json!({
                "nama": "Sari",
                "email": "sari@example.com",
                "password": "secret1",
                "passwordConfirm": "secret1"
            }));
            then.status(200)
                .json_body(json!({"success": true, "user": {"id": "u1", "nama": "Sari"}}));
        })
        .await;

    let session = client(&server)
        .register(&RegisterRequest {
            name: "Sari".into(),
            email: "sari@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(session.token.is_none());
}

#[tokio::test]
async fn profile_roundtrip() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/auth/profile");
            then.status(200).json_body(json!({"user": {"id": "u1", "nama": "Sari"}}));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/auth/profile")
                .json_body(json!({"nama": "Sari W"}));
            then.status(200).json_body(json!({"user": {"id": "u1", "nama": "Sari W"}}));
        })
        .await;

    let api = client(&server);
    assert_eq!(api.profile(Some("tok")).await.unwrap().name, "Sari");

    let user = api
        .update_profile(
            Some("tok"),
            &ProfileUpdate {
                name: Some("Sari W".into()),
                email: None,
            },
        )
        .await
        .unwrap();

    update.assert_async().await;
    assert_eq!(user.name, "Sari W");
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let api = ApiClient::new(ApiConfig {
        base_url: "http://127.0.0.1:9/api".into(),
        timeout_secs: 2,
        ..Default::default()
    })
    .unwrap();

    let err = api.products(None, &ProductFilter::default()).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert!(err.is_unavailable());
}
