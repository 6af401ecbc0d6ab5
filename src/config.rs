use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AppEnv {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    /// Task list behind a process-local lock.
    Memory,
    /// Key/value repository over the in-process store.
    KvMemory,
    Redis,
}

impl StorageBackend {
    /// Whether the repository runs over a key/value store, where `--lock-updates` applies.
    pub fn is_key_value(self) -> bool { !matches!(self, StorageBackend::Memory) }
}

/// Process settings. Every flag falls back to its environment variable, which
/// may also come from a `.env` file.
#[derive(Debug, Clone, Parser)]
#[command(name = "tasker", about = "Task tracking HTTP service")]
pub struct Config {
    /// Port the HTTP server binds on all interfaces.
    #[arg(long, env = "APP_PORT", default_value_t = 8070)]
    pub app_port: u16,

    /// `prod` switches log output to JSON.
    #[arg(long, env = "APP_ENV", value_enum, default_value_t = AppEnv::Dev)]
    pub app_env: AppEnv,

    /// Default log filter; `RUST_LOG` takes precedence when set.
    #[arg(long, env = "LOG_LEVEL", default_value = "debug")]
    pub log_level: String,

    #[arg(
        long = "storage",
        env = "STORAGE_BACKEND",
        value_enum,
        default_value_t = StorageBackend::Memory
    )]
    pub storage: StorageBackend,

    #[arg(long, env = "REDIS_HOST", default_value = "localhost")]
    pub redis_host: String,

    #[arg(long, env = "REDIS_PORT", default_value_t = 6379)]
    pub redis_port: u16,

    #[arg(long, env = "REDIS_PASSWORD", default_value = "", hide_env_values = true)]
    pub redis_password: String,

    /// Serialize updates and deletes of a task through the advisory lock.
    /// Only key/value backends have one.
    #[arg(long, env = "LOCK_UPDATES")]
    pub lock_updates: bool,
}

impl Config {
    /// `--lock-updates` was asked for on a backend that has no lock.
    pub fn lock_updates_ignored(&self) -> bool { self.lock_updates && !self.storage.is_key_value() }

    pub fn redis_url(&self) -> String {
        if self.redis_password.is_empty() {
            format!("redis://{}:{}/", self.redis_host, self.redis_port)
        } else {
            format!("redis://:{}@{}:{}/", self.redis_password, self.redis_host, self.redis_port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "tasker",
            "--app-port", "9000",
            "--app-env", "prod",
            "--log-level", "info",
            "--storage", "redis",
            "--redis-host", "cache",
            "--redis-port", "6380",
            "--redis-password", "secret",
            "--lock-updates",
        ])
        .unwrap();
        assert_eq!(config.app_port, 9000);
        assert_eq!(config.app_env, AppEnv::Prod);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.storage, StorageBackend::Redis);
        assert!(config.lock_updates);
        assert_eq!(config.redis_url(), "redis://:secret@cache:6380/");
    }

    #[test]
    fn kv_memory_backend() {
        let config = Config::try_parse_from(["tasker", "--storage", "kv-memory"]).unwrap();
        assert_eq!(config.storage, StorageBackend::KvMemory);
        assert!(config.storage.is_key_value());
        assert!(StorageBackend::Redis.is_key_value());
        assert!(!StorageBackend::Memory.is_key_value());
    }

    #[test]
    fn lock_updates_only_apply_to_key_value_backends() {
        let config = Config::try_parse_from(["tasker", "--storage", "memory", "--lock-updates"]);
        assert!(config.unwrap().lock_updates_ignored());
        let config = Config::try_parse_from(["tasker", "--storage", "kv-memory", "--lock-updates"]);
        assert!(!config.unwrap().lock_updates_ignored());
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(Config::try_parse_from(["tasker", "--storage", "sqlite"]).is_err());
    }

    #[test]
    fn redis_url_without_password() {
        let args = ["tasker", "--redis-host", "h", "--redis-port", "1", "--redis-password", ""];
        let config = Config::try_parse_from(args).unwrap();
        assert_eq!(config.redis_url(), "redis://h:1/");
    }
}
