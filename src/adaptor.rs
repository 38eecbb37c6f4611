/// the cache adaptor: namespaced keys, json payloads and store error recovery
/// in front of any `StoreClient`.
///
use log::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::client::StoreClient;
use crate::config::AdaptorConfig;
use crate::error::{AdaptorError, Result};
use crate::handler::{ErrorHandler, Operation};
use crate::key;

/// Translates get/set/del on structured keys into store calls on flat keys.
///
/// Configuration is fixed at construction. Clones share the client and the
/// error handler, and concurrent calls are not ordered relative to each other.
#[derive(Clone)]
pub struct CacheAdaptor {
    client: Arc<dyn StoreClient>,
    namespace: Option<String>,
    lifetime: u32,
    error_handler: Option<Arc<dyn ErrorHandler>>,
}

impl CacheAdaptor {
    /// build an adaptor; fails when the client is missing or the lifetime is zero
    pub fn new(config: AdaptorConfig) -> Result<CacheAdaptor> {
        config.validate()?;

        let AdaptorConfig {
            client,
            options,
            error_handler,
        } = config;
        let client =
            client.ok_or_else(|| AdaptorError::Config("a store client is required".to_string()))?;

        info!(
            "cache adaptor created, namespace: {:?}, lifetime: {}s, error handler: {}",
            options.namespace,
            options.lifetime,
            error_handler.is_some()
        );

        Ok(CacheAdaptor {
            client,
            namespace: options.namespace,
            lifetime: options.lifetime,
            error_handler,
        })
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// the expiration, in seconds, applied to every write
    pub fn lifetime(&self) -> u32 {
        self.lifetime
    }

    pub fn has_error_handler(&self) -> bool {
        self.error_handler.is_some()
    }

    /// the flat store key for a structured key
    pub fn namespaced<S: AsRef<str>>(&self, key: &[S]) -> String {
        key::namespaced(self.namespace(), key)
    }

    /// serialize and store the value under the key for the configured lifetime
    ///
    /// A store error the error handler recovers from resolves as `Ok(())`;
    /// whatever value the handler returned is dropped.
    pub async fn set<S, T>(&self, key: &[S], value: &T) -> Result<()>
    where
        S: AsRef<str>,
        T: Serialize + ?Sized,
    {
        let flat = self.namespaced(key);
        let payload = serde_json::to_string(value).map_err(|source| AdaptorError::Serialize {
            key: flat.clone(),
            source,
        })?;

        debug!("set key: {}, lifetime: {}", flat, self.lifetime);
        match self.client.set(&flat, payload, self.lifetime).await {
            Ok(()) => Ok(()),
            Err(e) => self.on_error(e, Operation::Set, &flat).map(|_| ()),
        }
    }

    /// read the value for the key; `None` is a miss
    pub async fn get<S, T>(&self, key: &[S]) -> Result<Option<T>>
    where
        S: AsRef<str>,
        T: DeserializeOwned,
    {
        let flat = self.namespaced(key);

        debug!("get key: {}", flat);
        let payload = match self.client.get(&flat).await {
            Ok(payload) => payload,
            Err(e) => {
                return match self.on_error(e, Operation::Get, &flat)? {
                    None | Some(Value::Null) => Ok(None),
                    Some(value) => serde_json::from_value(value)
                        .map(Some)
                        .map_err(|source| AdaptorError::Deserialize { key: flat, source }),
                };
            }
        };

        match payload {
            Some(text) if !text.is_empty() => serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| AdaptorError::Deserialize { key: flat, source }),
            _ => {
                debug!("miss for key: {}", flat);
                Ok(None)
            }
        }
    }

    /// remove the key from the store
    ///
    /// As with `set`, a recovered store error resolves as `Ok(())` and the
    /// handler's value is dropped.
    pub async fn del<S: AsRef<str>>(&self, key: &[S]) -> Result<()> {
        let flat = self.namespaced(key);

        debug!("del key: {}", flat);
        match self.client.del(&flat).await {
            Ok(()) => Ok(()),
            Err(e) => self.on_error(e, Operation::Del, &flat).map(|_| ()),
        }
    }

    // the single recovery path for store errors, shared by set, get and del
    fn on_error(&self, error: anyhow::Error, operation: Operation, key: &str) -> Result<Option<Value>> {
        match &self.error_handler {
            Some(handler) => {
                info!("{} {} failed, calling error handler: {}", operation, key, error);
                handler
                    .recover(error, operation, key)
                    .map_err(AdaptorError::Recovery)
            }
            None => {
                error!("{} {} failed: {}", operation, key, error);
                Err(AdaptorError::Store(error))
            }
        }
    }
}

impl fmt::Debug for CacheAdaptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheAdaptor")
            .field("namespace", &self.namespace)
            .field("lifetime", &self.lifetime)
            .field("error_handler", &self.error_handler.is_some())
            .finish()
    }
}
