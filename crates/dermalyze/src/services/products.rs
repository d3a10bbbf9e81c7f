//! Product catalog and skin-type recommendations

use std::sync::Arc;

use api_client::ApiClient;
use catalog::{recommend, Category, Product, ProductFilter, SkinType};
use local_store::LocalStore;
use tracing::{debug, info, warn};

use crate::settings::CacheConfig;
use crate::AppError;

const PRODUCTS_KEY: &str = "products";

/// Product service
pub struct ProductService {
    client: Arc<ApiClient>,
    store: Arc<LocalStore>,
    cache: CacheConfig,
}

impl ProductService {
    pub fn new(client: Arc<ApiClient>, store: Arc<LocalStore>, cache: CacheConfig) -> Self {
        Self {
            client,
            store,
            cache,
        }
    }

    fn cache_key(filter: &ProductFilter) -> String {
        let pairs: Vec<String> = filter
            .query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}_{}", PRODUCTS_KEY, pairs.join("&"))
    }

    /// Products matching `filter`, falling back to the last fetched list
    pub async fn products(&self, filter: &ProductFilter) -> Result<Vec<Product>, AppError> {
        let key = Self::cache_key(filter);
        if let Some(cached) = self.store.get_cache::<Vec<Product>>(&key, self.cache.products_ttl()) {
            debug!("Returning {} cached products", cached.len());
            return Ok(cached);
        }

        let token = self.store.token();
        match self.client.products(token.as_deref(), filter).await {
            Ok(products) => {
                for cache_key in [key.as_str(), PRODUCTS_KEY] {
                    if let Err(e) = self.store.set_cache(cache_key, &products) {
                        warn!("Failed to cache products: {}", e);
                    }
                }
                Ok(products)
            }
            Err(e) => {
                warn!("Product fetch failed: {}", e);
                match self
                    .store
                    .get_cache::<Vec<Product>>(PRODUCTS_KEY, self.cache.products_fallback_ttl())
                {
                    Some(stale) => {
                        info!("Returning fallback cached products");
                        Ok(stale)
                    }
                    None => Err(e.into()),
                }
            }
        }
    }

    /// Up to six products for `skin_type`, spread across brands. Never fails.
    pub async fn recommended(&self, skin_type: SkinType) -> Vec<Product> {
        match self.products(&ProductFilter::default()).await {
            Ok(all) => {
                let picked = recommend(&all, skin_type);
                info!(
                    "Recommended {} products for {} skin",
                    picked.len(),
                    skin_type
                );
                picked
            }
            Err(e) => {
                warn!("Error fetching recommended products: {}", e);
                Vec::new()
            }
        }
    }

    pub fn categories(&self) -> Vec<Category> {
        catalog::categories()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::ApiConfig;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;

    fn service(server: &MockServer, store: Arc<LocalStore>) -> ProductService {
        let client = ApiClient::new(ApiConfig {
            base_url: server.url("/api"),
            ..Default::default()
        })
        .unwrap();
        ProductService::new(Arc::new(client), store, CacheConfig::default())
    }

    fn catalog_json() -> serde_json::Value {
        let mut products = Vec::new();
        for (i, brand) in ["A", "A", "A", "A", "B", "B", "C", "A"].iter().enumerate() {
            products.push(json!({
                "id": format!("p{}", i),
                "product_name": format!("Item {}", i),
                "brand": brand,
                "skintype": if i == 7 { "Dry" } else { "Oily, Combination" },
                "price": 50000 + i * 1000
            }));
        }
        json!({"success": true, "products": products})
    }

    #[tokio::test]
    async fn test_recommended_is_diversified() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/products");
                then.status(200).json_body(catalog_json());
            })
            .await;

        let svc = service(&server, Arc::new(LocalStore::in_memory()));
        let picked = svc.recommended(SkinType::Oily).await;

        assert_eq!(picked.len(), 6);
        assert!(picked.iter().all(|p| p.suits("oily")));
        assert!(picked.iter().any(|p| p.brand == "B"));
        assert!(picked.iter().any(|p| p.brand == "C"));
    }

    #[tokio::test]
    async fn test_recommended_empty_on_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/products");
                then.status(500).json_body(json!({"success": false}));
            })
            .await;

        let svc = service(&server, Arc::new(LocalStore::in_memory()));
        assert!(svc.recommended(SkinType::Dry).await.is_empty());
    }

    #[tokio::test]
    async fn test_products_fall_back_to_last_list() {
        let store = Arc::new(LocalStore::in_memory());
        let server = MockServer::start_async().await;
        let mut ok = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/products");
                then.status(200).json_body(catalog_json());
            })
            .await;

        let svc = service(&server, store.clone());
        assert_eq!(svc.products(&ProductFilter::default()).await.unwrap().len(), 8);

        ok.delete_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/products");
                then.status(500).body("<!DOCTYPE html>");
            })
            .await;

        let filter = ProductFilter {
            category: Some("Serum".into()),
            ..Default::default()
        };
        let fallback = svc.products(&filter).await.unwrap();
        assert_eq!(fallback.len(), 8);
    }

    #[test]
    fn test_cache_key_depends_on_filter() {
        let serum = ProductFilter {
            category: Some("Serum".into()),
            ..Default::default()
        };
        assert_eq!(ProductService::cache_key(&ProductFilter::default()), "products_");
        assert_eq!(ProductService::cache_key(&serum), "products_product_type=Serum");
    }
}
