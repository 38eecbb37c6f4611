/// integration tests to ensure store workers are created and respond to commands
///
use cache_adaptor::store::Supervisor;
use cache_adaptor::worker::{WorkerState, OK};
use cache_adaptor::StoreClient;

#[test]
fn single_worker() {
    async_std::task::block_on(async move {
        let supervisor = Supervisor::new(1)
            .await
            .expect("should create the supervisor");

        assert_eq!(supervisor.pool_size(), 1);
        assert_eq!(supervisor.workers().len(), 1);

        let status = supervisor.status().await;
        assert_eq!(status.len(), 1);
        for sts in status.iter() {
            assert_eq!(sts.worker_id.len(), 16);
            assert_eq!(sts.status, OK);
            assert_eq!(sts.state, WorkerState::Idle);
            assert!(sts.uptime.starts_with("0 days, 00:00"));
            assert_eq!(sts.error_count, 0);
        }

        assert_eq!(supervisor.len().await, 0);

        supervisor.set("a", "1".to_string(), 0).await.unwrap();
        assert_eq!(supervisor.get("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(supervisor.len().await, 1);

        assert!(supervisor.shutdown().await.is_ok());
    });
}

#[test]
fn worker_pool() {
    async_std::task::block_on(async move {
        let supervisor = Supervisor::new(4)
            .await
            .expect("should create the supervisor");

        let count = 50;
        for n in 0..count {
            let key = format!("key:{}", n);
            supervisor.set(&key, n.to_string(), 60).await.unwrap();
        }
        assert_eq!(supervisor.len().await, count);

        // the per-worker counts add up to the pool total
        let status = supervisor.status().await;
        assert_eq!(status.len(), 4);
        assert_eq!(status.iter().map(|s| s.entries).sum::<usize>(), count);

        for n in 0..count {
            let key = format!("key:{}", n);
            let v = supervisor.get(&key).await.unwrap();
            assert_eq!(v, Some(n.to_string()));
        }

        supervisor.del("key:7").await.unwrap();
        supervisor.del("key:8").await.unwrap();
        assert_eq!(supervisor.len().await, count - 2);
        assert_eq!(supervisor.get("key:7").await.unwrap(), None);

        assert!(supervisor.shutdown().await.is_ok());
    });
}
