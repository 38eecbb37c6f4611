#![doc = include_str!("../README.md")]

pub mod adaptor;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod key;
pub mod logging;
pub mod store;
pub mod worker;

pub use adaptor::CacheAdaptor;
pub use client::StoreClient;
pub use config::{AdaptorConfig, AdaptorOptions, DEFAULT_LIFETIME};
pub use error::{AdaptorError, Result};
pub use handler::{ErrorHandler, Escalate, Operation, TreatAsMiss};

/// the current app version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
