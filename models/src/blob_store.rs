//! Blob store checks for action trees that download from or upload to it.
//!
//! Submitting tools verify the store credentials before sending a tree whose
//! `Download.from` or `Upload.to` points at the store. The codec itself never
//! calls into this module.
//!
//! # Environment Variables
//! - `BLOB_STORE_HOST`: WebDAV host
//! - `BLOB_STORE_PORT`: WebDAV port
//! - `BLOB_STORE_USERNAME`, `BLOB_STORE_PASSWORD`: basic auth credentials (default: empty)

use crate::action::Action;
use actionspec_base::error::ActionSpecError;
use anyhow::Result;
use async_trait::async_trait;
use debug_stub_derive::DebugStub;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use url::Url;

#[derive(Deserialize, Clone, DebugStub, PartialEq, Eq)]
pub struct BlobStoreConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    #[debug_stub = "********"]
    pub password: String,
}

impl BlobStoreConfig {
    pub fn base_url(&self) -> Result<Url, ActionSpecError> {
        Url::parse(&format!("http://{}:{}/", self.host, self.port)).map_err(|e| {
            ActionSpecError::ConfigError(format!("invalid blob store address: {:?}", e))
        })
    }

    /// True when `location` is a URL on this store's host and port.
    pub fn is_store_location(&self, location: &str) -> bool {
        match Url::parse(location) {
            Ok(url) => {
                // the parsed host is lowercased, the configured one may not be
                url.host_str()
                    .is_some_and(|host| host.eq_ignore_ascii_case(&self.host))
                    && url.port_or_known_default() == Some(self.port)
            }
            Err(_) => false,
        }
    }
}

pub fn load_blob_store_config_from_env() -> Result<BlobStoreConfig, ActionSpecError> {
    envy::prefixed("BLOB_STORE_")
        .from_env::<BlobStoreConfig>()
        .map_err(|e| {
            ActionSpecError::ConfigError(format!("cannot read blob store config from env: {:?}", e))
        })
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStoreVerifier: Send + Sync {
    /// `Ok(false)` when the store rejects the credentials,
    /// `Err` when the store could not be asked.
    async fn verify(&self, config: &BlobStoreConfig) -> Result<bool>;
}

/// Verifies credentials against a WebDAV blob store with an authenticated
/// `PROPFIND` on its root collection.
#[derive(Debug, Clone, Default)]
pub struct DavBlobStoreVerifier {
    client: reqwest::Client,
}

impl DavBlobStoreVerifier {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BlobStoreVerifier for DavBlobStoreVerifier {
    async fn verify(&self, config: &BlobStoreConfig) -> Result<bool> {
        let url = config.base_url()?;
        let method = Method::from_bytes(b"PROPFIND")?;
        tracing::debug!("verifying blob store credentials: {}", url);
        let res = self
            .client
            .request(method, url)
            .basic_auth(&config.username, Some(&config.password))
            .header("Depth", "1")
            .send()
            .await
            .map_err(ActionSpecError::from)?;
        let status = res.status();
        if status.is_success() {
            Ok(true)
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("blob store rejected credentials for user {}", config.username);
            Ok(false)
        } else {
            Err(ActionSpecError::OtherError(format!(
                "unexpected blob store response: {}",
                status
            ))
            .into())
        }
    }
}

/// True when any download source or upload destination in the tree is on the store.
pub fn references_blob_store(action: &Action, config: &BlobStoreConfig) -> bool {
    let mut found = false;
    action.walk(&mut |a| {
        let location = match a {
            Action::Download(d) => Some(d.from.as_str()),
            Action::Upload(u) => Some(u.to.as_str()),
            _ => None,
        };
        if let Some(location) = location {
            found |= config.is_store_location(location);
        }
    });
    found
}

/// Check store credentials before submitting `action`.
/// Trees that do not touch the store are accepted without asking it.
pub async fn verify_blob_store_access(
    verifier: &dyn BlobStoreVerifier,
    config: &BlobStoreConfig,
    action: &Action,
) -> Result<()> {
    if !references_blob_store(action, config) {
        tracing::debug!("action does not reference blob store {}", config.host);
        return Ok(());
    }
    if verifier.verify(config).await? {
        Ok(())
    } else {
        Err(ActionSpecError::BlobStoreUnauthorized(format!(
            "{}:{} (user: {})",
            config.host, config.port, config.username
        ))
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructors::{download, parallel, run, try_, upload};

    fn config() -> BlobStoreConfig {
        BlobStoreConfig {
            host: "blobs.example.com".to_string(),
            port: 8444,
            username: "user".to_string(),
            password: "secret".to_string(),
        }
    }

    fn store_tree() -> Action {
        parallel([
            run("echo", "me").into(),
            try_(Some(
                upload(
                    "/tmp/out.tgz",
                    "http://blobs.example.com:8444/droplets/out.tgz",
                    "me",
                )
                .into(),
            ))
            .into(),
        ])
        .into()
    }

    #[test]
    fn test_debug_hides_password() {
        let debug = format!("{:?}", config());
        assert!(debug.contains("blobs.example.com"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_base_url() {
        assert_eq!(
            config().base_url().unwrap().as_str(),
            "http://blobs.example.com:8444/"
        );
        let bad = BlobStoreConfig {
            host: "bad host".to_string(),
            ..config()
        };
        assert!(bad.base_url().is_err());
    }

    #[test]
    fn test_is_store_location() {
        let config = config();
        assert!(config.is_store_location("http://blobs.example.com:8444/a/b"));
        assert!(!config.is_store_location("http://blobs.example.com/a/b"));
        assert!(!config.is_store_location("http://other.example.com:8444/a"));
        assert!(!config.is_store_location("local_location"));
    }

    #[test]
    fn test_is_store_location_ignores_host_case() {
        let config = BlobStoreConfig {
            host: "Blobs.Example.com".to_string(),
            ..config()
        };
        assert!(config.is_store_location("http://blobs.example.com:8444/a"));
        assert!(config.is_store_location("http://BLOBS.example.COM:8444/a"));
        let tree: Action = download("http://blobs.example.com:8444/x", "/tmp/x", "me").into();
        assert!(references_blob_store(&tree, &config));
    }

    #[test]
    fn test_config_from_env() {
        let vars = vec![
            ("BLOB_STORE_HOST".to_string(), "blobs.example.com".to_string()),
            ("BLOB_STORE_PORT".to_string(), "8444".to_string()),
            ("BLOB_STORE_USERNAME".to_string(), "user".to_string()),
            ("BLOB_STORE_PASSWORD".to_string(), "secret".to_string()),
        ];
        let loaded = envy::prefixed("BLOB_STORE_")
            .from_iter::<_, BlobStoreConfig>(vars)
            .unwrap();
        assert_eq!(loaded, config());

        let missing_port = vec![("BLOB_STORE_HOST".to_string(), "h".to_string())];
        assert!(envy::prefixed("BLOB_STORE_")
            .from_iter::<_, BlobStoreConfig>(missing_port)
            .is_err());
    }

    #[test]
    fn test_references_blob_store() {
        assert!(references_blob_store(&store_tree(), &config()));

        let remote_download: Action =
            download("http://blobs.example.com:8444/cache/x", "/tmp/x", "me").into();
        assert!(references_blob_store(&remote_download, &config()));

        // only download sources and upload destinations count
        let elsewhere: Action = parallel([
            download("https://cdn.example.com/x", "/tmp/x", "me").into(),
            upload("http://blobs.example.com:8444/in", "/tmp/y", "me").into(),
        ])
        .into();
        assert!(!references_blob_store(&elsewhere, &config()));
    }

    #[tokio::test]
    async fn test_verify_skipped_when_store_unused() {
        let mut verifier = MockBlobStoreVerifier::new();
        verifier.expect_verify().times(0);
        let action: Action = run("echo", "me").into();
        assert!(verify_blob_store_access(&verifier, &config(), &action)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_verify_authorized() {
        let mut verifier = MockBlobStoreVerifier::new();
        verifier
            .expect_verify()
            .withf(|c| c.username == "user" && c.password == "secret")
            .times(1)
            .returning(|_| Ok(true));
        assert!(verify_blob_store_access(&verifier, &config(), &store_tree())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_verify_unauthorized() {
        let mut verifier = MockBlobStoreVerifier::new();
        verifier.expect_verify().times(1).returning(|_| Ok(false));
        let err = verify_blob_store_access(&verifier, &config(), &store_tree())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ActionSpecError>(),
            Some(ActionSpecError::BlobStoreUnauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_error_is_propagated() {
        let mut verifier = MockBlobStoreVerifier::new();
        verifier
            .expect_verify()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("connection refused")));
        let err = verify_blob_store_access(&verifier, &config(), &store_tree())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
    }

    #[tokio::test]
    async fn test_dav_verifier_unreachable_store() {
        let verifier = DavBlobStoreVerifier::default();
        let config = BlobStoreConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..config()
        };
        assert!(verifier.verify(&config).await.is_err());
    }
}
