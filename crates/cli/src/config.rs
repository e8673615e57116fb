/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for a locally-running worker.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Worker base URL (default: `http://127.0.0.1:7860`).
    pub server_url: String,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `EASEL_SERVER_URL`           | `http://127.0.0.1:7860` |
    /// | `EASEL_REQUEST_TIMEOUT_SECS` | `30`                    |
    pub fn from_env() -> Self {
        let server_url =
            std::env::var("EASEL_SERVER_URL").unwrap_or_else(|_| "http://127.0.0.1:7860".into());

        let request_timeout_secs: u64 = std::env::var("EASEL_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("EASEL_REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            server_url,
            request_timeout_secs,
        }
    }
}
