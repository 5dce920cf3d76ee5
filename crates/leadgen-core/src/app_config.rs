#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub discovery_model: String,
    pub enrichment_model: String,
    pub request_timeout_secs: u64,
    pub enrich_batch_size: usize,
    pub discovery_limit: u32,
    pub default_latitude: f64,
    pub default_longitude: f64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("gemini_api_key", &"[redacted]")
            .field("gemini_base_url", &self.gemini_base_url)
            .field("discovery_model", &self.discovery_model)
            .field("enrichment_model", &self.enrichment_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("enrich_batch_size", &self.enrich_batch_size)
            .field("discovery_limit", &self.discovery_limit)
            .field("default_latitude", &self.default_latitude)
            .field("default_longitude", &self.default_longitude)
            .finish()
    }
}
