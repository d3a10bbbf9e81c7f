//! Account session

use std::sync::Arc;

use api_client::{ApiClient, ApiError, AuthSession, LoginRequest, ProfileUpdate, RegisterRequest, User};
use local_store::LocalStore;
use tracing::{info, warn};

use crate::AppError;

/// Auth service
pub struct AuthService {
    client: Arc<ApiClient>,
    store: Arc<LocalStore>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>, store: Arc<LocalStore>) -> Self {
        Self { client, store }
    }

    fn persist(&self, session: AuthSession) -> Result<User, AppError> {
        let token = session
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::InvalidResponse("missing token".to_string()))?;
        self.store.save_session(&token, &session.user)?;
        Ok(session.user)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<User, AppError> {
        let session = self.client.login(request).await?;
        let user = self.persist(session)?;
        info!("Logged in as {}", user.id);
        Ok(user)
    }

    /// Register, then log in when the backend did not hand out a token
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, AppError> {
        let session = self.client.register(request).await?;
        info!("Registered {}", session.user.id);

        if session.token.as_deref().is_some_and(|t| !t.is_empty()) {
            return self.persist(session);
        }
        self.login(&request.login()).await
    }

    /// Always clears local state, even when the backend call fails
    pub async fn logout(&self) -> Result<(), AppError> {
        if let Some(token) = self.store.token() {
            if let Err(e) = self.client.logout(&token).await {
                warn!("Logout error: {}", e);
            }
        }
        self.store.clear_session()?;
        info!("Logged out");
        Ok(())
    }

    /// Refresh the stored user from the backend
    pub async fn profile(&self) -> Result<User, AppError> {
        let token = self.store.token();
        match self.client.profile(token.as_deref()).await {
            Ok(user) => {
                self.store.update_user(&user)?;
                Ok(user)
            }
            Err(ApiError::Unauthorized) => {
                warn!("Stored token rejected, clearing session");
                self.store.clear_session()?;
                Err(ApiError::Unauthorized.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, AppError> {
        let token = self.store.token();
        let user = self.client.update_profile(token.as_deref(), update).await?;
        self.store.update_user(&user)?;
        Ok(user)
    }

    pub fn current_user(&self) -> Option<User> {
        self.store.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::{ApiConfig, ValidationError};
    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use serde_json::json;

    fn service(server: &MockServer) -> (AuthService, Arc<LocalStore>) {
        let client = ApiClient::new(ApiConfig {
            base_url: server.url("/api"),
            ..Default::default()
        })
        .unwrap();
        let store = Arc::new(LocalStore::in_memory());
        (AuthService::new(Arc::new(client), store.clone()), store)
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            name: "Sari".into(),
            email: "sari@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/register");
                then.status(200)
                    .json_body(json!({"success": true, "user": {"id": "u1", "nama": "Sari"}}));
            })
            .await;
        let login = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/login");
                then.status(200).json_body(json!({
                    "success": true,
                    "token": "jwt",
                    "user": {"id": "u1", "nama": "Sari", "email": "sari@example.com"}
                }));
            })
            .await;

        let (auth, store) = service(&server);
        let user = auth.register(&register_request()).await.unwrap();

        login.assert_async().await;
        assert_eq!(user.email, "sari@example.com");
        assert_eq!(store.token().as_deref(), Some("jwt"));
        assert!(auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_mismatch_never_hits_backend() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/register");
                then.status(200);
            })
            .await;

        let (auth, _) = service(&server);
        let mut request = register_request();
        request.confirm_password = "other".into();

        let err = auth.register(&request).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Api(ApiError::Validation(ValidationError::PasswordMismatch))
        ));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_backend_fails() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/logout");
                then.status(500).body("<html>oops</html>");
            })
            .await;

        let (auth, store) = service(&server);
        store.save_session("jwt", &json!({"id": "u1"})).unwrap();
        store.set_cache("products", &vec![1]).unwrap();

        auth.logout().await.unwrap();
        assert!(!auth.is_authenticated());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_token_clears_session() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/auth/profile");
                then.status(401).json_body(json!({"error": "Unauthorized"}));
            })
            .await;

        let (auth, store) = service(&server);
        store.save_session("stale", &json!({"id": "u1"})).unwrap();

        let err = auth.profile().await.unwrap_err();
        assert!(matches!(err, AppError::Api(ApiError::Unauthorized)));
        assert!(store.token().is_none());
    }
}
