pub mod cli;

pub use cli::ServerArgs;

use crate::utils::error::{Result, VocalisError};
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub metronome: MetronomeSettings,
    #[serde(default)]
    pub plans: PlanSettings,
    #[serde(default)]
    pub email: EmailSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetronomeSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_metronome_url")]
    pub api_url: String,
    #[serde(default = "default_rate_card_name")]
    pub rate_card_name: String,
    /// Custom pricing unit for Vocalis credits.
    #[serde(default = "default_credit_type_id")]
    pub credit_type_id: String,
    pub webhook_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSettings {
    #[serde(default = "default_creator_dollars")]
    pub creator_dollars: u32,
    #[serde(default = "default_pro_dollars")]
    pub pro_dollars: u32,
    #[serde(default = "default_trial_credits")]
    pub trial_credits: u64,
    #[serde(default = "default_trial_days")]
    pub trial_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSettings {
    /// "log" or "resend"
    #[serde(default = "default_email_provider")]
    pub provider: String,
    #[serde(default = "default_from_address")]
    pub from_address: String,
    pub resend_api_key: Option<String>,
    #[serde(default = "default_resend_api_url")]
    pub resend_api_url: String,
    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,
    #[serde(default = "default_docs_url")]
    pub docs_url: String,
    #[serde(default)]
    pub send_welcome_on_signup: bool,
}

fn default_app_name() -> String {
    "Vocalis SaaS".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_database_path() -> String {
    "data/vocalis.sqlite".to_string()
}
fn default_metronome_url() -> String {
    "https://api.metronome.com".to_string()
}
fn default_rate_card_name() -> String {
    "Vocalis 2025".to_string()
}
fn default_credit_type_id() -> String {
    "21984655-5f0c-4161-973e-bdc5d2ecd530".to_string()
}
fn default_creator_dollars() -> u32 {
    49
}
fn default_pro_dollars() -> u32 {
    199
}
fn default_trial_credits() -> u64 {
    50_000
}
fn default_trial_days() -> u32 {
    14
}
fn default_email_provider() -> String {
    "log".to_string()
}
fn default_from_address() -> String {
    "hello@vocalis.ai".to_string()
}
fn default_resend_api_url() -> String {
    "https://api.resend.com".to_string()
}
fn default_dashboard_url() -> String {
    "http://localhost:8000/dashboard".to_string()
}
fn default_docs_url() -> String {
    "https://docs.vocalis.ai".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            debug: false,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: default_database_path(),
        }
    }
}

impl Default for MetronomeSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_metronome_url(),
            rate_card_name: default_rate_card_name(),
            credit_type_id: default_credit_type_id(),
            webhook_secret: None,
        }
    }
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            creator_dollars: default_creator_dollars(),
            pro_dollars: default_pro_dollars(),
            trial_credits: default_trial_credits(),
            trial_days: default_trial_days(),
        }
    }
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            provider: default_email_provider(),
            from_address: default_from_address(),
            resend_api_key: None,
            resend_api_url: default_resend_api_url(),
            dashboard_url: default_dashboard_url(),
            docs_url: default_docs_url(),
            send_welcome_on_signup: false,
        }
    }
}

impl Settings {
    /// 從 TOML 檔案載入配置；檔案不存在時回退到預設值
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            tracing::info!(
                "Config file not found at {}, using defaults",
                path.as_ref().display()
            );
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(VocalisError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| VocalisError::InvalidConfigValueError {
            field: "toml_parsing".to_string(),
            value: String::new(),
            reason: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${METRONOME_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_settings(&self) -> Result<()> {
        validate_url("metronome.api_url", &self.metronome.api_url)?;
        validate_url("email.resend_api_url", &self.email.resend_api_url)?;
        validate_positive_number("server.port", self.server.port as usize, 1)?;
        validate_positive_number("plans.trial_days", self.plans.trial_days as usize, 1)?;

        if self.plans.creator_dollars == 0 || self.plans.pro_dollars == 0 {
            return Err(VocalisError::InvalidConfigValueError {
                field: "plans".to_string(),
                value: format!(
                    "creator={}, pro={}",
                    self.plans.creator_dollars, self.plans.pro_dollars
                ),
                reason: "Plan prices must be positive".to_string(),
            });
        }

        let valid_providers = ["log", "resend"];
        if !valid_providers.contains(&self.email.provider.as_str()) {
            return Err(VocalisError::InvalidConfigValueError {
                field: "email.provider".to_string(),
                value: self.email.provider.clone(),
                reason: format!(
                    "Unsupported provider. Valid providers: {}",
                    valid_providers.join(", ")
                ),
            });
        }

        if self.email.provider == "resend" && self.email.resend_api_key.is_none() {
            return Err(VocalisError::MissingConfigError {
                field: "email.resend_api_key".to_string(),
            });
        }

        Ok(())
    }

    /// An unresolved `${VAR}` placeholder means the key was never provided.
    pub fn metering_configured(&self) -> bool {
        !self.metronome.api_key.is_empty() && !self.metronome.api_key.starts_with("${")
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        self.validate_settings()
    }
}
