use reqwest::Method;
use tracing::info;

use super::models::{ChatMessage, ChatReply, ChatRequest};
use super::validation::require_text;
use super::Gateway;
use crate::utils::GatewayResult;

impl Gateway {
    /// 工作区内没有论文时由后端报错
    pub async fn send_chat_message(&self, workspace_id: i64, text: &str) -> GatewayResult<String> {
        require_text(text, "Please enter a message")?;

        let req = self
            .authed(Method::POST, "/chat")?
            .json(&ChatRequest { workspace_id, message: text });
        let reply: ChatReply = self.send(req).await?;
        Ok(reply.response)
    }

    pub async fn get_chat_history(&self, workspace_id: i64) -> GatewayResult<Vec<ChatMessage>> {
        let req = self.authed(Method::GET, &format!("/chat/history/{}", workspace_id))?;
        self.send(req).await
    }

    /// 不可恢复；调用方负责先取得用户确认
    pub async fn clear_chat_history(&self, workspace_id: i64) -> GatewayResult<()> {
        let req = self.authed(Method::DELETE, &format!("/chat/history/{}", workspace_id))?;
        self.send_ack(req).await?;

        info!("工作区 {} 的聊天记录已清空", workspace_id);
        Ok(())
    }
}
