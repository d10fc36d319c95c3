/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Hold reservation TTL in seconds (default: `120`).
    pub hold_ttl_secs: u64,
    /// Row-lock wait bound applied per transaction, in milliseconds
    /// (default: `5000`).
    pub lock_timeout_ms: u64,
    /// How many times an engine call is attempted when it hits a transient
    /// conflict (default: `3`).
    pub tx_retry_attempts: u32,
    /// Expiry reaper cadence in seconds (default: `60`).
    pub reaper_interval_secs: u64,
    /// Expiry reaper scan chunk size (default: `100`).
    pub reaper_page_size: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
    /// | `HOLD_TTL_SECS`         | `120`                   |
    /// | `LOCK_TIMEOUT_MS`       | `5000`                  |
    /// | `TX_RETRY_ATTEMPTS`     | `3`                     |
    /// | `REAPER_INTERVAL_SECS`  | `60`                    |
    /// | `REAPER_PAGE_SIZE`      | `100`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_parse("SHUTDOWN_TIMEOUT_SECS", 30),
            hold_ttl_secs: env_parse("HOLD_TTL_SECS", 120),
            lock_timeout_ms: env_parse("LOCK_TIMEOUT_MS", 5000),
            tx_retry_attempts: env_parse("TX_RETRY_ATTEMPTS", 3),
            reaper_interval_secs: env_parse("REAPER_INTERVAL_SECS", 60),
            reaper_page_size: env_parse("REAPER_PAGE_SIZE", 100),
        }
    }
}

/// Parse an env var, panicking on malformed values so misconfiguration
/// fails fast at startup.
fn env_parse<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{var} must be a valid value: {e}")),
        Err(_) => default,
    }
}
