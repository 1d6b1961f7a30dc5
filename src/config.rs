use crate::core::error::SahayakError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AmazonQSettings {
    pub application_id: Option<String>,
    pub access_token: Option<String>,
    pub base_url: Option<String>,
}

impl AmazonQSettings {
    pub fn is_configured(&self) -> bool {
        self.application_id.is_some() && self.access_token.is_some()
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BedrockSettings {
    pub bearer_token: Option<String>,
    pub base_url: Option<String>,
}

impl BedrockSettings {
    pub fn is_configured(&self) -> bool {
        self.bearer_token.is_some()
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ApiKeySettings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl ApiKeySettings {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub amazon_q: AmazonQSettings,
    #[serde(default)]
    pub bedrock: BedrockSettings,
    #[serde(default)]
    pub groq: ApiKeySettings,
    #[serde(default)]
    pub gemini: ApiKeySettings,
    #[serde(default = "default_region")]
    pub aws_region: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            amazon_q: AmazonQSettings::default(),
            bedrock: BedrockSettings::default(),
            groq: ApiKeySettings::default(),
            gemini: ApiKeySettings::default(),
            aws_region: default_region(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sahayak")
            .join("config.yaml")
    }

    /// Optional YAML file overlaid with environment credentials. Missing
    /// file is not an error; the environment alone can configure everything.
    pub fn load() -> Result<Config, SahayakError> {
        let path = Self::config_path();
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Config::default()
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Config, SahayakError> {
        let contents = fs::read_to_string(path)?;
        serde_yml::from_str(&contents)
            .map_err(|e| SahayakError::Config(format!("parse {}: {}", path.display(), e)))
    }

    /// Environment variables fill any credential the file did not provide.
    pub fn apply_env(&mut self) {
        fill(&mut self.amazon_q.application_id, "AWS_Q_APPLICATION_ID");
        fill(&mut self.amazon_q.access_token, "AWS_Q_ACCESS_TOKEN");
        fill(&mut self.bedrock.bearer_token, "AWS_BEARER_TOKEN_BEDROCK");
        fill(&mut self.groq.api_key, "GROQ_API_KEY");
        fill(&mut self.gemini.api_key, "GEMINI_API_KEY");

        if let Ok(region) = env::var("AWS_REGION")
            && !region.is_empty()
        {
            self.aws_region = region;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn fill(slot: &mut Option<String>, var: &str) {
    if slot.is_none()
        && let Ok(value) = env::var(var)
        && !value.is_empty()
    {
        *slot = Some(value);
    }
}
