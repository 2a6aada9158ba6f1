use std::fmt;
use std::str::FromStr;

use envconfig::Envconfig;

#[derive(Envconfig, Clone, Debug)]
pub struct Config {
    #[envconfig(
        from = "LOKI_PUSH_URL",
        default = "https://logs-prod-020.grafana.net/loki/api/v1/push"
    )]
    pub push_url: String,

    pub grafana_user_id: Option<String>,

    pub grafana_token: Option<String>,

    #[envconfig(from = "ENVIRONMENT", default = "development")]
    pub environment: Environment,

    #[envconfig(from = "APP_NAME", default = "recipe-scraper")]
    pub app_name: String,
}

impl Config {
    /// Credentials are only attached when a user id is configured.
    pub fn credentials(&self) -> Option<Credentials> {
        self.grafana_user_id.as_ref().map(|user_id| Credentials {
            user_id: user_id.to_owned(),
            token: self.grafana_token.clone(),
        })
    }
}

/// Basic auth pair for the push endpoint. The user id doubles as the tenant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: String,
    pub token: Option<String>,
}

/// The environment the application runs in. Only `Development` changes behavior:
/// every other value ships logs and is used verbatim as the `environment` label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Other(String),
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Other(name) => name,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct EnvironmentIsEmptyError;

impl fmt::Display for EnvironmentIsEmptyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "environment must not be empty")
    }
}

impl FromStr for Environment {
    type Err = EnvironmentIsEmptyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        match s.to_ascii_lowercase().as_ref() {
            "" => Err(EnvironmentIsEmptyError),
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            _ => Ok(Environment::Other(s.to_owned())),
        }
    }
}
