use crate::utils::error::{MenuError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_sites_file")]
    pub sites_file: String,
    #[serde(default)]
    pub server: ServerSettings,
    pub auth: AuthSettings,
    pub api: ApiSettings,
    #[serde(default)]
    pub fetch: FetchSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    pub url: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_scope")]
    pub scope: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    pub url: String,
    pub activity_endpoint: String,
    #[serde(default = "default_channel_id")]
    pub channel_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchSettings {
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

fn default_sites_file() -> String {
    "sites.json".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_endpoint() -> String {
    "/api/messages".to_string()
}

fn default_scope() -> String {
    "https://graph.microsoft.com/.default".to_string()
}

fn default_channel_id() -> String {
    "skype".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            endpoint: default_endpoint(),
        }
    }
}

// 不要把 client_secret 印進日誌
impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("url", &self.url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("scope", &self.scope)
            .finish()
    }
}

impl FetchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS))
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}

impl Settings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MenuError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MenuError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 驗證設定的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("sites_file", &self.sites_file)?;

        validation::validate_endpoint_path("server.endpoint", &self.server.endpoint)?;
        validation::validate_non_empty_string("server.bind_address", &self.server.bind_address)?;

        validation::validate_url("auth.url", &self.auth.url)?;
        require_credential("auth.client_id", &self.auth.client_id)?;
        require_credential("auth.client_secret", &self.auth.client_secret)?;

        validation::validate_url("api.url", &self.api.url)?;
        validation::validate_endpoint_path("api.activity_endpoint", &self.api.activity_endpoint)?;
        if !self
            .api
            .activity_endpoint
            .contains(crate::adapters::activity::CONVERSATION_ID_PLACEHOLDER)
        {
            return Err(MenuError::InvalidConfigValueError {
                field: "api.activity_endpoint".to_string(),
                value: self.api.activity_endpoint.clone(),
                reason: "must contain the <conversationId> placeholder".to_string(),
            });
        }

        if let Some(timeout) = self.fetch.timeout_seconds {
            validation::validate_range("fetch.timeout_seconds", timeout, 1, 300)?;
        }

        Ok(())
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// 環境變數未設定時 `${VAR}` 會原樣保留，視為缺少設定
fn require_credential(field: &str, value: &str) -> Result<()> {
    if unresolved_placeholder(value) {
        return Err(MenuError::MissingConfigError {
            field: field.to_string(),
        });
    }
    validation::validate_non_empty_string(field, value)
}

fn unresolved_placeholder(value: &str) -> bool {
    value
        .find("${")
        .is_some_and(|start| value[start..].contains('}'))
}

/// 替換環境變數 (例如 ${BOT_SECRET})，未設定的保留原樣
pub fn substitute_env_vars(content: &str) -> String {
    use regex::Regex;
    use std::sync::OnceLock;

    static ENV_VAR: OnceLock<Regex> = OnceLock::new();
    let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}
