use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::worker::Worker;
use crate::client::StoreClient;
use crate::worker::WorkerStatus;

/// A pool of store workers; each flat key is owned by exactly one worker.
#[derive(Debug)]
pub struct Supervisor {
    pool_size: usize,
    workers: Vec<Worker>,
}

impl Supervisor {
    /// start `pool_size` workers; a pool needs at least one
    pub async fn new(pool_size: usize) -> Result<Supervisor> {
        if pool_size == 0 {
            return Err(anyhow!("the worker pool size must be at least 1"));
        }

        let mut workers = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            workers.push(Worker::new().await);
        }

        info!("supervisor started with {} workers", pool_size);

        Ok(Supervisor { pool_size, workers })
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// the worker that owns this key
    pub fn route(&self, key: &str) -> &Worker {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let idx = (hasher.finish() % self.workers.len() as u64) as usize;

        &self.workers[idx]
    }

    /// the status of each worker; workers that do not answer are reported as down
    pub async fn status(&self) -> Vec<WorkerStatus> {
        let mut list = Vec::with_capacity(self.workers.len());
        for worker in self.workers.iter() {
            let status = match worker.status().await {
                Ok(status) => status,
                Err(e) => {
                    warn!("status request failed: {}", e);
                    WorkerStatus::down(worker.id())
                }
            };
            list.push(status);
        }

        list
    }

    /// the total number of live entries across the pool
    pub async fn len(&self) -> usize {
        let mut total = 0;
        for worker in self.workers.iter() {
            match worker.len().await {
                Ok(sz) => total += sz,
                Err(e) => warn!("len request failed: {}", e),
            }
        }

        total
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// stop every running worker; each has closed its mailbox when this returns
    pub async fn shutdown(&self) -> Result<()> {
        for worker in self.workers.iter() {
            if worker.is_running() {
                worker.shutdown().await?;
            }
        }

        info!("supervisor shutdown {} workers", self.workers.len());

        Ok(())
    }
}

#[async_trait]
impl StoreClient for Supervisor {
    async fn set(&self, key: &str, value: String, lifetime: u32) -> Result<()> {
        self.route(key).set(key, value, lifetime).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.route(key).get(key).await
    }

    async fn del(&self, key: &str) -> Result<()> {
        self.route(key).remove(key).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new() {
        async_std::task::block_on(async move {
            let supervisor = Supervisor::new(3).await.unwrap();
            assert_eq!(supervisor.pool_size(), 3);
            assert_eq!(supervisor.workers().len(), 3);
            assert!(supervisor.is_empty().await);

            assert!(supervisor.shutdown().await.is_ok());
            assert!(supervisor.workers().iter().all(|w| !w.is_running()));

            // stopped workers are reported down, and a second shutdown is a no-op
            let status = supervisor.status().await;
            assert!(status.iter().all(|s| !s.is_ok()));
            assert!(supervisor.shutdown().await.is_ok());
        });
    }

    #[test]
    fn empty_pool() {
        async_std::task::block_on(async move {
            assert!(Supervisor::new(0).await.is_err());
        });
    }

    #[test]
    fn route_is_stable() {
        async_std::task::block_on(async move {
            let supervisor = Supervisor::new(4).await.unwrap();
            let first = supervisor.route("app:user:1").id();
            for _ in 0..10 {
                assert_eq!(supervisor.route("app:user:1").id(), first);
            }

            assert!(supervisor.shutdown().await.is_ok());
        });
    }

    #[test]
    fn store_client() {
        async_std::task::block_on(async move {
            let supervisor = Supervisor::new(2).await.unwrap();

            supervisor.set("k", "\"v\"".to_string(), 60).await.unwrap();
            assert_eq!(supervisor.get("k").await.unwrap().as_deref(), Some("\"v\""));
            assert_eq!(supervisor.len().await, 1);

            supervisor.del("k").await.unwrap();
            assert_eq!(supervisor.get("k").await.unwrap(), None);

            // deleting a missing key is not an error
            assert!(supervisor.del("k").await.is_ok());

            assert!(supervisor.shutdown().await.is_ok());
        });
    }
}
