pub mod kv;
pub mod kv_repo;
pub mod lock;
pub mod memory_repo;
