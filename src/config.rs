use std::env;

/// Runtime configuration. The base URL of the listing API is the only
/// environment surface.
pub struct Config {
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            base_url: env::var("ESTATE_BASE_URL")?,
        })
    }
}
