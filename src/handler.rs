/// store error recovery
///
/// When the store reports an error the adaptor hands it to an `ErrorHandler`
/// together with the operation and the flat key. Returning `Ok` recovers the
/// call; returning `Err` fails the call with the new error.
use anyhow::Result;
use log::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// the adaptor operations, named the way handlers and logs see them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Set,
    Get,
    Del,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Set => "set",
            Operation::Get => "get",
            Operation::Del => "del",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recovery strategy for store errors.
///
/// The recovered value is what a failed `get` returns: `Some` is converted to
/// the caller's type, `None` reads as a miss. `set` and `del` discard it.
/// This runs inline in the failed call and must not block.
pub trait ErrorHandler: Send + Sync {
    fn recover(&self, error: anyhow::Error, operation: Operation, key: &str) -> Result<Option<Value>>;
}

impl<F> ErrorHandler for F
where
    F: Fn(anyhow::Error, Operation, &str) -> Result<Option<Value>> + Send + Sync,
{
    fn recover(&self, error: anyhow::Error, operation: Operation, key: &str) -> Result<Option<Value>> {
        self(error, operation, key)
    }
}

/// log and swallow every store error; failed reads become misses
#[derive(Debug, Default, Clone, Copy)]
pub struct TreatAsMiss;

impl ErrorHandler for TreatAsMiss {
    fn recover(&self, error: anyhow::Error, operation: Operation, key: &str) -> Result<Option<Value>> {
        warn!("{} {} failed, recovered as miss: {}", operation, key, error);
        Ok(None)
    }
}

/// fail the call with the operation and key attached to the store error
#[derive(Debug, Default, Clone, Copy)]
pub struct Escalate;

impl ErrorHandler for Escalate {
    fn recover(&self, error: anyhow::Error, operation: Operation, key: &str) -> Result<Option<Value>> {
        error!("{} {} failed: {}", operation, key, error);
        Err(error.context(format!("cache {} failed for key {}", operation, key)))
    }
}
