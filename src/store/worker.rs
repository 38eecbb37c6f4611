use anyhow::{anyhow, Result};
use async_channel::{bounded, Receiver, Sender};
use domain_keys::keys::RouteKey;
use hashbrown::HashMap;
use log::*;
use service_uptime::Uptime;
use std::time::{Duration, Instant};

use crate::worker::{JsonString, WorkerState, WorkerStatus, OK};

/// the number of pending requests a worker will queue before senders wait
pub const MAILBOX_SIZE: usize = 250;

/// expired entries are swept from the shard after this many writes
pub const SWEEP_INTERVAL: u32 = 100;

/// a stored payload and the instant it stops being visible; lifetime 0 never expires
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires: Option<Instant>,
}

impl Entry {
    fn new(value: String, lifetime: u32) -> Entry {
        let expires = match lifetime {
            0 => None,
            secs => Some(Instant::now() + Duration::from_secs(u64::from(secs))),
        };

        Entry { value, expires }
    }

    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires, Some(at) if at <= now)
    }
}

// drop every expired entry; returns the number removed
fn sweep(shard: &mut HashMap<String, Entry>) -> usize {
    let now = Instant::now();
    let before = shard.len();
    shard.retain(|_, e| !e.is_expired(now));

    before - shard.len()
}

#[derive(Debug, Clone)]
pub enum Command {
    Set(String, String, u32, Sender<Option<String>>),
    Get(String, Sender<Option<String>>),
    Remove(String, Sender<Option<String>>),
    Len(Sender<usize>),
    Status(Sender<JsonString>), // request the worker's status
    Shutdown(Sender<()>),       // acknowledged once the mailbox is closed
}

// the handler loop
pub async fn handler(id: String, rx: Receiver<Command>) -> Result<()> {
    let uptime = Uptime::new();
    let mut state = WorkerState::Idle;
    let mut error_count = 0u16;
    let mut writes = 0u32;

    let mut shard: HashMap<String, Entry> = HashMap::new();

    while let Ok(cmd) = rx.recv().await {
        match cmd {
            Command::Set(key, value, lifetime, tx) => {
                debug!("worker: {}, set key: {}, lifetime: {}", id, key, lifetime);
                let previous = shard
                    .insert(key, Entry::new(value, lifetime))
                    .filter(|e| !e.is_expired(Instant::now()))
                    .map(|e| e.value);

                writes += 1;
                if writes >= SWEEP_INTERVAL {
                    writes = 0;
                    let removed = sweep(&mut shard);
                    debug!("worker: {}, swept {} expired entries", id, removed);
                }

                error_count += send_response(previous, tx).await;
            }
            Command::Get(key, tx) => {
                debug!("worker: {}, get key: {}", id, key);
                let now = Instant::now();
                let found = match shard.get(&key) {
                    Some(entry) if entry.is_expired(now) => {
                        shard.remove(&key);
                        None
                    }
                    Some(entry) => Some(entry.value.clone()),
                    None => None,
                };

                error_count += send_response(found, tx).await;
            }
            Command::Remove(key, tx) => {
                debug!("worker: {}, remove key: {}", id, key);
                let removed = shard
                    .remove(&key)
                    .filter(|e| !e.is_expired(Instant::now()))
                    .map(|e| e.value);

                error_count += send_response(removed, tx).await;
            }
            Command::Len(tx) => {
                sweep(&mut shard);
                error_count += send_response(shard.len(), tx).await;
            }
            Command::Status(tx) => {
                sweep(&mut shard);
                let status = WorkerStatus::new(
                    id.to_string(),
                    OK.to_string(),
                    state.clone(),
                    uptime.to_string(),
                    shard.len(),
                    error_count,
                );

                let msg = match serde_json::to_string(&status) {
                    Ok(js) => js,
                    Err(e) => {
                        format!(r#"{}"status":"json parse error: {:?}"{}"#, "{", e, "}\n")
                    }
                };

                info!("status response: {}", msg);
                error_count += send_response(msg, tx).await;
            }
            Command::Shutdown(tx) => {
                state = WorkerState::Shutdown;
                info!("worker id: {}, state: {:?}", id, state);
                rx.close();
                send_response((), tx).await;
                break;
            }
        }

        // a reply the caller never read
        if error_count > 0 && state == WorkerState::Idle {
            state = WorkerState::Broken;
            warn!("worker id: {}, state: {:?}", id, state);
        }
    }

    rx.close();

    Ok(())
}

// returns the number of errors to add to the worker's count
async fn send_response<T>(msg: T, tx: Sender<T>) -> u16 {
    if let Err(e) = tx.send(msg).await {
        error!("error sending response: {}", e);
        1u16
    } else {
        0u16
    }
}

/// A handle to one background shard of the in-memory store.
#[derive(Debug, Clone)]
pub struct Worker {
    id: String,
    uptime: Uptime,
    request_tx: Sender<Command>,
}

impl Worker {
    /// create and start a new worker.
    pub async fn new() -> Worker {
        let uptime = Uptime::new();
        let id = RouteKey::create();
        let wid = id.clone();

        info!("starting up worker, id: {}", id);

        let (request_tx, request_receiver) = bounded(MAILBOX_SIZE);

        // run the handler loop as a background task
        async_std::task::spawn(async move {
            match handler(id.clone(), request_receiver).await {
                Ok(()) => info!("worker handler exit for worker id: {}", id),
                Err(e) => error!("worker exit with error: {:?}", e),
            }
        });

        Worker {
            id: wid,
            uptime,
            request_tx,
        }
    }

    /// return the worker's id
    pub fn id(&self) -> String {
        self.id.to_string()
    }

    pub fn get_uptime_seconds(&self) -> u64 {
        self.uptime.get_uptime_seconds()
    }

    pub fn is_running(&self) -> bool {
        !self.request_tx.is_closed()
    }

    /// store the value; returns the previous live value, if any
    pub async fn set(&self, key: &str, value: String, lifetime: u32) -> Result<Option<String>> {
        let (tx, rx) = bounded(1);
        self.request(Command::Set(key.to_string(), value, lifetime, tx))
            .await?;
        self.response(rx).await
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let (tx, rx) = bounded(1);
        self.request(Command::Get(key.to_string(), tx)).await?;
        self.response(rx).await
    }

    pub async fn remove(&self, key: &str) -> Result<Option<String>> {
        let (tx, rx) = bounded(1);
        self.request(Command::Remove(key.to_string(), tx)).await?;
        self.response(rx).await
    }

    /// the number of live entries held by this worker
    pub async fn len(&self) -> Result<usize> {
        let (tx, rx) = bounded(1);
        self.request(Command::Len(tx)).await?;
        self.response(rx).await
    }

    pub async fn status(&self) -> Result<WorkerStatus> {
        let (tx, rx) = bounded(1);
        self.request(Command::Status(tx)).await?;
        let js = self.response(rx).await?;
        let status = serde_json::from_str(&js)?;

        Ok(status)
    }

    /// stop the worker; returns once its mailbox is closed
    pub async fn shutdown(&self) -> Result<()> {
        let (tx, rx) = bounded(1);
        self.request(Command::Shutdown(tx)).await?;
        self.response(rx).await
    }

    async fn request(&self, cmd: Command) -> Result<()> {
        self.request_tx
            .send(cmd)
            .await
            .map_err(|_| anyhow!("worker {} is not accepting requests", self.id))
    }

    async fn response<T>(&self, rx: Receiver<T>) -> Result<T> {
        rx.recv()
            .await
            .map_err(|_| anyhow!("worker {} dropped the response channel", self.id))
    }
}
