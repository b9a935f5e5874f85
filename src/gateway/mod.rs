//! 后端 REST 接口的类型化封装。
//!
//! 每个操作都是一次性的 HTTP 调用：不重试、不去重、不单独设置超时。
//! 需要认证的调用从注入的 [`Session`] 读取 token。

pub mod auth;
pub mod chat;
pub mod models;
pub mod papers;
pub mod validation;
pub mod workspaces;

#[cfg(test)]
pub mod mock;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::session::Session;
use crate::utils::{GatewayError, GatewayResult};

use models::ErrorBody;

pub use models::{ChatMessage, Paper, RegisterRequest, Role, Workspace};

#[derive(Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
    session: Session,
    logout_on_unauthorized: bool,
}

impl Gateway {
    pub fn new(config: &AppConfig, session: Session) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.backend.timeout_secs))
            .user_agent(config.backend.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.backend.base_url.trim_end_matches('/').to_string(),
            session,
            logout_on_unauthorized: config.auth.logout_on_unauthorized,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 不带认证头的请求（注册、登录）
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!("{} {}", method, path);
        self.client.request(method, self.url(path))
    }

    /// 带 `Authorization: Bearer` 的请求；未登录时直接在本地失败
    fn authed(&self, method: Method, path: &str) -> GatewayResult<RequestBuilder> {
        let token = self
            .session
            .current_token()
            .ok_or(GatewayError::NotAuthenticated)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> GatewayResult<T> {
        let response = self.check(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// 只关心成功与否的调用，响应体丢弃
    async fn send_ack(&self, request: RequestBuilder) -> GatewayResult<()> {
        self.check(request.send().await?).await?;
        Ok(())
    }

    async fn check(&self, response: Response) -> GatewayResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message());

        if status == StatusCode::UNAUTHORIZED {
            warn!("后端拒绝认证: {}", message.as_deref().unwrap_or("unauthorized"));
            if self.logout_on_unauthorized && self.session.is_authenticated() {
                self.session.clear_token().await?;
                warn!("本地 token 已失效，已自动登出");
            }
            return Err(GatewayError::Unauthorized { message });
        }

        warn!("后端返回错误 {}: {}", status, message.as_deref().unwrap_or(&body));
        Err(GatewayError::Backend {
            status: status.as_u16(),
            message,
        })
    }
}
