/// store worker support structs
///
use serde::{Deserialize, Serialize};

pub type JsonString = String;

/// status value for a healthy worker
pub const OK: &str = "ok";
/// status value for a worker that no longer answers its channel
pub const DOWN: &str = "down";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerState {
    #[default]
    Idle,
    Broken,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStatus {
    pub worker_id: String,
    pub status: String,
    pub state: WorkerState,
    pub uptime: String,
    pub entries: usize,
    pub error_count: u16,
}

impl WorkerStatus {
    pub fn new(
        worker_id: String,
        status: String,
        state: WorkerState,
        uptime: String,
        entries: usize,
        error_count: u16,
    ) -> WorkerStatus {
        WorkerStatus {
            worker_id,
            status,
            state,
            uptime,
            entries,
            error_count,
        }
    }

    /// the status reported for a worker whose channel is closed
    pub fn down(worker_id: String) -> WorkerStatus {
        WorkerStatus::new(
            worker_id,
            DOWN.to_string(),
            WorkerState::Shutdown,
            String::new(),
            0,
            0,
        )
    }

    pub fn is_ok(&self) -> bool {
        self.status == OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_to_json() {
        let status = WorkerStatus::new(
            "abc123".to_string(),
            OK.to_string(),
            WorkerState::Idle,
            "0 days, 00:00:01".to_string(),
            3,
            0,
        );

        let js = serde_json::to_string(&status).expect("status should serialize");
        assert!(js.starts_with(r#"{"worker_id":"abc123","status":"ok","state":"Idle""#));

        let back: WorkerStatus = serde_json::from_str(&js).expect("status should parse");
        assert_eq!(back, status);
        assert!(back.is_ok());
    }

    #[test]
    fn down_status() {
        let status = WorkerStatus::down("w1".to_string());
        assert!(!status.is_ok());
        assert_eq!(status.state, WorkerState::Shutdown);
        assert_eq!(status.entries, 0);
    }
}
