/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `7051`).
    pub port: u16,
    /// Browser origins allowed to call the API, from comma-separated
    /// `CORS_ORIGINS`. Empty means no cross-origin access.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Run `SeedLedger` once before serving (default: `false`).
    pub seed_on_startup: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `7051`                     |
    /// | `CORS_ORIGINS`         | (none)                     |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SEED_ON_STARTUP`      | `false`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "7051".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let seed_on_startup: bool = std::env::var("SEED_ON_STARTUP")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("SEED_ON_STARTUP must be 'true' or 'false'");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            seed_on_startup,
        }
    }
}
