use tracing::{info, warn};

use crate::gateway::{Gateway, RegisterRequest};

const AUTH_FAILED: &str = "Authentication failed. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// 登录 / 注册表单
pub struct LoginView {
    gateway: Gateway,
    pub mode: AuthMode,
    pub form: RegisterRequest,
    pub loading: bool,
    pub error: Option<String>,
}

impl LoginView {
    pub fn new(gateway: Gateway, mode: AuthMode) -> Self {
        Self {
            gateway,
            mode,
            form: RegisterRequest::default(),
            loading: false,
            error: None,
        }
    }

    /// 成功时 token 已写入会话
    pub async fn submit(&mut self) -> bool {
        self.error = None;
        self.loading = true;

        let result = match self.mode {
            AuthMode::Login => {
                self.gateway
                    .login(&self.form.username, &self.form.password)
                    .await
            }
            AuthMode::Register => self.gateway.register(&self.form).await,
        };
        self.loading = false;

        match result {
            Ok(_) => {
                info!("认证成功: {}", self.form.username);
                true
            }
            Err(e) => {
                warn!("认证失败: {}", e);
                self.error = Some(e.user_message(AUTH_FAILED));
                false
            }
        }
    }
}
