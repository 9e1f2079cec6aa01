use crate::error::{CompareError, Result};
use serde::{Deserialize, Serialize};
use skv_compare_common::RetryOptions;
use std::path::PathBuf;
use std::time::Duration;

/// プロキシ転送先
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/api/compare";

/// 死活確認先
pub const DEFAULT_HEALTH_URL: &str = "http://localhost:5000";

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: String,
    pub health_url: String,
    pub bind: String,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.into(),
            health_url: DEFAULT_HEALTH_URL.into(),
            bind: DEFAULT_BIND.into(),
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

impl Config {
    /// 設定ファイルを読み込み、環境変数で上書き
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CompareError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("skv-compare").join("config.json"))
    }

    /// 環境変数を優先（SKV_BACKEND_URL / SKV_HEALTH_URL / SKV_BIND）
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SKV_BACKEND_URL") {
            self.backend_url = url;
        }
        if let Some(url) = lookup("SKV_HEALTH_URL") {
            self.health_url = url;
        }
        if let Some(bind) = lookup("SKV_BIND") {
            self.bind = bind;
        }
        self
    }

    pub fn retry_options(&self) -> RetryOptions {
        RetryOptions {
            max_retries: self.max_retries,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    pub fn set_backend_url(&mut self, url: String) -> Result<()> {
        self.backend_url = url;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend_url, "http://localhost:5000/api/compare");
        assert_eq!(config.retry_options(), RetryOptions::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"max_retries": 5}"#)
            .expect("デシリアライズ失敗");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.bind, DEFAULT_BIND);
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default().with_env_overrides(|key| match key {
            "SKV_BACKEND_URL" => Some("https://backend.example/api/compare".into()),
            _ => None,
        });
        assert_eq!(config.backend_url, "https://backend.example/api/compare");
        assert_eq!(config.health_url, DEFAULT_HEALTH_URL);
    }
}
