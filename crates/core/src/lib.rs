pub mod client;
pub mod domain;
pub mod router;
pub mod store;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub api_url: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                api_url: std::env::var("API_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_api_url(&self) -> anyhow::Result<&str> {
            self.api_url.as_deref().context("API_URL is required")
        }
    }

}
