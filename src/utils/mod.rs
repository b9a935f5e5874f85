pub mod logger;
pub mod scheduler;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// 本地表单校验失败，未发出网络请求
    #[error("{0}")]
    Validation(String),

    #[error("未登录，请先执行 login")]
    NotAuthenticated,

    /// 后端返回 401
    #[error("认证失败: {}", .message.as_deref().unwrap_or("unauthorized"))]
    Unauthorized { message: Option<String> },

    #[error("后端返回错误 {status}: {}", .message.as_deref().unwrap_or("no detail"))]
    Backend { status: u16, message: Option<String> },

    #[error("网络请求错误: {0}")]
    Network(#[from] reqwest::Error),

    #[error("本地存储错误: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serde(#[from] serde_json::Error),
}

impl GatewayError {
    pub fn is_validation(&self) -> bool {
        matches!(self, GatewayError::Validation(_))
    }

    /// 后端 `detail` 字段（如果有）
    pub fn detail(&self) -> Option<&str> {
        match self {
            GatewayError::Unauthorized { message } | GatewayError::Backend { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// 面向用户的提示：校验信息原样显示，其次是后端 detail，最后是静态兜底文案
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            GatewayError::Validation(msg) => msg.clone(),
            GatewayError::NotAuthenticated => "Please log in first".to_string(),
            other => other
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
