use crate::SearchRadius;

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

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// URL template of the rendering collaborator, with `{zip}` and
    /// `{radius}` placeholders. `None` disables live lookups.
    pub results_url: Option<String>,
    /// Page URL that relative links on rendered results resolve against.
    /// Defaults to the request URL when unset.
    pub page_base_url: Option<String>,
    pub lookup_timeout_secs: u64,
    pub user_agent: String,
    pub default_radius: SearchRadius,
}
