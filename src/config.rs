use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::client::StoreClient;
use crate::error::{AdaptorError, Result};
use crate::handler::ErrorHandler;

/// one hour, in seconds
pub const DEFAULT_LIFETIME: u32 = 60 * 60;

fn default_lifetime() -> u32 {
    DEFAULT_LIFETIME
}

/// the plain, serializable part of the adaptor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptorOptions {
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default = "default_lifetime")]
    pub lifetime: u32,
}

impl Default for AdaptorOptions {
    fn default() -> Self {
        AdaptorOptions {
            namespace: None,
            lifetime: DEFAULT_LIFETIME,
        }
    }
}

impl AdaptorOptions {
    /// parse options from a json document, e.g. `{"namespace":"app","lifetime":10}`
    pub fn from_json(js: &str) -> anyhow::Result<AdaptorOptions> {
        let options = serde_json::from_str(js)?;
        Ok(options)
    }
}

/// Everything needed to build a `CacheAdaptor`. The client is required.
#[derive(Clone, Default)]
pub struct AdaptorConfig {
    pub client: Option<Arc<dyn StoreClient>>,
    pub options: AdaptorOptions,
    pub error_handler: Option<Arc<dyn ErrorHandler>>,
}

impl AdaptorConfig {
    pub fn new() -> AdaptorConfig {
        AdaptorConfig::default()
    }

    pub fn with_client(mut self, client: Arc<dyn StoreClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.options.namespace = Some(namespace.into());
        self
    }

    pub fn with_lifetime(mut self, lifetime: u32) -> Self {
        self.options.lifetime = lifetime;
        self
    }

    pub fn with_options(mut self, options: AdaptorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_error_handler(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
        self.error_handler = Some(handler);
        self
    }

    /// fail fast on a missing client or a zero lifetime
    pub fn validate(&self) -> Result<()> {
        if self.client.is_none() {
            return Err(AdaptorError::Config("a store client is required".to_string()));
        }
        if self.options.lifetime == 0 {
            return Err(AdaptorError::Config(
                "lifetime must be a positive number of seconds".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for AdaptorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdaptorConfig")
            .field("client", &self.client.is_some())
            .field("options", &self.options)
            .field("error_handler", &self.error_handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::TreatAsMiss;
    use crate::store::Supervisor;

    #[test]
    fn defaults() {
        let options = AdaptorOptions::default();
        assert_eq!(options.namespace, None);
        assert_eq!(options.lifetime, 3600);
    }

    #[test]
    fn from_json() {
        let options = AdaptorOptions::from_json(r#"{"namespace":"app","lifetime":10}"#).unwrap();
        assert_eq!(options.namespace.as_deref(), Some("app"));
        assert_eq!(options.lifetime, 10);

        let options = AdaptorOptions::from_json("{}").unwrap();
        assert_eq!(options, AdaptorOptions::default());

        assert!(AdaptorOptions::from_json(r#"{"lifetime":-1}"#).is_err());
    }

    #[test]
    fn missing_client() {
        let config = AdaptorConfig::new().with_namespace("app");
        match config.validate() {
            Err(AdaptorError::Config(msg)) => assert!(msg.contains("client")),
            other => panic!("expected a config error, got {:?}", other),
        }
    }

    #[test]
    fn zero_lifetime() {
        async_std::task::block_on(async move {
            let store = Arc::new(Supervisor::new(1).await.unwrap());
            let config = AdaptorConfig::new()
                .with_client(store.clone())
                .with_lifetime(0);
            assert!(matches!(config.validate(), Err(AdaptorError::Config(_))));

            let config = config
                .with_lifetime(10)
                .with_error_handler(Arc::new(TreatAsMiss));
            assert!(config.validate().is_ok());
            assert!(format!("{:?}", config).contains("error_handler: true"));

            store.shutdown().await.unwrap();
        });
    }
}
