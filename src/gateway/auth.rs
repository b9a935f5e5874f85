use reqwest::Method;
use tracing::{debug, info};

use super::models::{Credentials, RegisterRequest, TokenResponse};
use super::validation::{validate_credentials, validate_registration};
use super::Gateway;
use crate::utils::GatewayResult;

impl Gateway {
    /// 注册新用户，成功后写入会话
    pub async fn register(&self, request: &RegisterRequest) -> GatewayResult<String> {
        validate_registration(request)?;

        info!("注册用户: {}", request.username);
        let req = self.request(Method::POST, "/auth/register").json(request);
        let token: TokenResponse = self.send(req).await?;

        self.store_token(token).await
    }

    /// 登录，表单以 urlencoded 提交
    pub async fn login(&self, username: &str, password: &str) -> GatewayResult<String> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        validate_credentials(&credentials)?;

        info!("登录用户: {}", username);
        let req = self.request(Method::POST, "/auth/login").form(&credentials);
        let token: TokenResponse = self.send(req).await?;

        self.store_token(token).await
    }

    /// 只清本地会话，不访问后端
    pub async fn logout(&self) -> GatewayResult<()> {
        self.session().clear_token().await?;
        info!("已登出");
        Ok(())
    }

    async fn store_token(&self, token: TokenResponse) -> GatewayResult<String> {
        debug!("token 类型: {}", token.token_type.as_deref().unwrap_or("bearer"));
        self.session().set_token(&token.access_token).await?;
        Ok(token.access_token)
    }
}
