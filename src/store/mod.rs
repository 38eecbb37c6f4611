/// in-memory implementation of the store client contract.
/// use cases:
/// * a local store for development and tests, standing in for memcached
/// * a process-local level 1 cache behind the same adaptor interface
///
/// The supervisor owns a pool of workers; each worker is a background task
/// holding one shard of the keyspace behind a bounded command channel.
///
pub mod supervisor;
pub mod worker;

pub use supervisor::Supervisor;
