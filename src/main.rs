use std::net::SocketAddr;

use axum::Router;
use clap::Parser;
use tasker::{
    application::task_service::TaskServiceImpl,
    config::{Config, StorageBackend},
    domain::repository::TaskRepository,
    http::{routes::tasks, routing},
    infrastructure::{
        kv::{KeyValueStore, MemoryStore, RedisStore},
        kv_repo::KvTaskRepository,
        lock::KvLock,
        memory_repo::InMemoryTaskRepository,
    },
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::parse();
    telemetry::init(config.app_env, &config.log_level)?;

    if config.lock_updates_ignored() {
        tracing::warn!(storage = ?config.storage, "--lock-updates has no effect on this backend");
    }
    let router = match config.storage {
        StorageBackend::Memory => build_app(InMemoryTaskRepository::new()),
        StorageBackend::KvMemory => {
            build_app(kv_repository(MemoryStore::new(), config.lock_updates))
        }
        StorageBackend::Redis => {
            let store = RedisStore::connect(&config.redis_url()).await?;
            build_app(kv_repository(store, config.lock_updates))
        }
    };
    tracing::info!(
        storage = ?config.storage,
        lock_updates = config.lock_updates,
        "repository ready"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.app_port));
    tracing::info!(%addr, "listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("api stopped");
    Ok(())
}

fn kv_repository<S: KeyValueStore + Clone>(store: S, lock_updates: bool) -> KvTaskRepository<S> {
    let repo = KvTaskRepository::new(store.clone());
    if lock_updates { repo.with_update_lock(KvLock::new(store)) } else { repo }
}

fn build_app<R: TaskRepository + Clone>(repo: R) -> Router {
    let service = TaskServiceImpl::new(repo);
    routing::app(tasks::router(tasks::AppState { service }))
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}
