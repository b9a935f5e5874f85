use serde::{Deserialize, Serialize};
use std::path::Path;
use anyhow::{Context, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config/settings.toml";
const ENV_PREFIX: &str = "RESEARCHHUB";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: String,
    /// 全局超时，单个请求不覆盖
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// 为空时会话只保存在内存中
    pub database_path: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AuthConfig {
    /// 收到 401 时自动清除本地 token
    pub logout_on_unauthorized: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiConfig {
    pub carousel_interval_secs: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// 默认值 < 配置文件 < 环境变量（RESEARCHHUB__BACKEND__BASE_URL 之类）
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(
                config::File::new(&path.to_string_lossy(), config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("读取配置失败: {}", path.display()))?;

        let config: AppConfig = settings.try_deserialize()?;
        anyhow::ensure!(
            config.ui.carousel_interval_secs >= 1,
            "ui.carousel_interval_secs 至少为 1 秒"
        );
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                base_url: "http://localhost:8000".to_string(),
                timeout_secs: 120,
                user_agent: "researchhub-cli/0.1".to_string(),
            },
            storage: StorageConfig {
                database_path: "./data/researchhub.db".to_string(),
            },
            auth: AuthConfig {
                logout_on_unauthorized: true,
            },
            ui: UiConfig {
                carousel_interval_secs: 5,
            },
        }
    }
}
