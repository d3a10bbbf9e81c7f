//! Analysis photo URL resolution

use tracing::{debug, warn};

use crate::config::{ApiConfig, Environment};

/// Record ids in the file store are 15 lowercase alphanumerics
const RECORD_ID_LEN: usize = 15;

/// Builds browser-loadable URLs for stored analysis photos.
///
/// Development hits the file store directly; production goes through the
/// `/files` proxy on the app origin.
#[derive(Debug, Clone)]
pub struct ImageUrls {
    file_store_url: String,
    collection_id: String,
    environment: Environment,
}

impl ImageUrls {
    pub fn new(
        file_store_url: impl Into<String>,
        collection_id: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            file_store_url: file_store_url.into().trim_end_matches('/').to_string(),
            collection_id: collection_id.into(),
            environment,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(
            config.file_store_url.clone(),
            config.collection_id.clone(),
            config.environment,
        )
    }

    /// URL for an image path from the backend, `None` for an empty path
    pub fn resolve(&self, image_path: &str, record_id: Option<&str>) -> Option<String> {
        let image_path = image_path.trim();
        if image_path.is_empty() {
            warn!("No image path provided");
            return None;
        }

        if image_path.starts_with("http") {
            return Some(self.resolve_absolute(image_path));
        }

        let clean = image_path.strip_prefix("uploads/").unwrap_or(image_path);
        let filename = clean.rsplit('/').next().unwrap_or(clean);

        if let Some(record_id) = record_id.filter(|id| !id.is_empty()) {
            return Some(self.file_url(record_id, filename));
        }

        if let Some(record_id) = record_id_prefix(filename) {
            debug!("Using record id {} from filename {}", record_id, filename);
            return Some(self.file_url(record_id, filename));
        }

        warn!("No record id for {}, using image endpoint", filename);
        Some(format!("/api/images/{}", filename))
    }

    fn resolve_absolute(&self, url: &str) -> String {
        let files_root = format!("{}/api/files/", self.file_store_url);
        match (self.environment, url.strip_prefix(&files_root)) {
            (Environment::Production, Some(rest)) => format!("/files/{}", rest),
            _ => url.to_string(),
        }
    }

    fn file_url(&self, record_id: &str, filename: &str) -> String {
        match self.environment {
            Environment::Development => format!(
                "{}/api/files/{}/{}/{}",
                self.file_store_url, self.collection_id, record_id, filename
            ),
            Environment::Production => {
                format!("/files/{}/{}/{}", self.collection_id, record_id, filename)
            }
        }
    }
}

fn record_id_prefix(filename: &str) -> Option<&str> {
    let prefix = filename.get(..RECORD_ID_LEN)?;
    prefix
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        .then_some(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const STORE: &str = "http://files.local:8090";

    fn urls(environment: Environment) -> ImageUrls {
        ImageUrls::new(STORE, "pbc_1", environment)
    }

    #[test]
    fn test_empty_path() {
        assert!(urls(Environment::Development).resolve("  ", None).is_none());
    }

    #[test]
    fn test_absolute_urls() {
        let file = "http://files.local:8090/api/files/pbc_1/rec/a.jpg?token=x";
        let dev = urls(Environment::Development);
        let prod = urls(Environment::Production);

        assert_eq!(dev.resolve(file, None).unwrap(), file);
        assert_eq!(prod.resolve(file, None).unwrap(), "/files/pbc_1/rec/a.jpg?token=x");
        assert_eq!(
            prod.resolve("https://cdn.example.com/a.jpg", None).unwrap(),
            "https://cdn.example.com/a.jpg"
        );
    }

    #[test]
    fn test_record_id_given() {
        let path = "uploads/ctr2dgurf472a7x/photo.jpg";
        assert_eq!(
            urls(Environment::Development).resolve(path, Some("rec123")).unwrap(),
            "http://files.local:8090/api/files/pbc_1/rec123/photo.jpg"
        );
        assert_eq!(
            urls(Environment::Production).resolve(path, Some("rec123")).unwrap(),
            "/files/pbc_1/rec123/photo.jpg"
        );
    }

    #[test]
    fn test_record_id_from_filename() {
        let name = "abc123def456ghi_photo.jpg";
        assert_eq!(
            urls(Environment::Production).resolve(name, None).unwrap(),
            "/files/pbc_1/abc123def456ghi/abc123def456ghi_photo.jpg"
        );
    }

    #[test]
    fn test_fallback_endpoint() {
        assert_eq!(
            urls(Environment::Production).resolve("uploads/Photo.JPG", None).unwrap(),
            "/api/images/Photo.JPG"
        );
    }

    proptest! {
        #[test]
        fn prop_record_prefix_becomes_record_id(
            id in "[a-z0-9]{15}",
            rest in "_[a-z]{1,8}\\.jpg",
            uploads in any::<bool>(),
        ) {
            let name = format!("{}{}", id, rest);
            let path = if uploads { format!("uploads/{}", name) } else { name.clone() };
            let url = urls(Environment::Production).resolve(&path, None).unwrap();
            prop_assert_eq!(url, format!("/files/pbc_1/{}/{}", id, name));
        }

        #[test]
        fn prop_foreign_urls_pass_through(host in "[a-z]{3,10}", file in "[a-z]{1,8}\\.png") {
            let url = format!("https://{}.example.com/{}", host, file);
            for env in [Environment::Development, Environment::Production] {
                prop_assert_eq!(urls(env).resolve(&url, None).unwrap(), url.clone());
            }
        }
    }
}
