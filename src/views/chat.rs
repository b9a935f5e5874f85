use tracing::{info, warn};

use super::EmptyState;
use crate::gateway::{ChatMessage, Gateway, Workspace};

pub const CLEAR_PROMPT: &str =
    "Are you sure you want to clear all chat history for this workspace? This cannot be undone.";
const SEND_FAILED: &str = "Failed to send message. Make sure you have papers in this workspace.";
const CLEAR_FAILED: &str = "Failed to clear chat history. Please try again.";

/// 与工作区论文对话
pub struct ChatView {
    gateway: Gateway,
    pub workspaces: Vec<Workspace>,
    pub selected: Option<i64>,
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub loading: bool,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl ChatView {
    pub fn new(gateway: Gateway) -> Self {
        let selected = gateway.session().selected_workspace();
        Self {
            gateway,
            workspaces: Vec::new(),
            selected,
            messages: Vec::new(),
            input: String::new(),
            loading: false,
            notice: None,
            error: None,
        }
    }

    /// 加载工作区列表；没有有效选中时默认第一个
    pub async fn load(&mut self) -> bool {
        match self.gateway.list_workspaces().await {
            Ok(list) => self.workspaces = list,
            Err(e) => {
                warn!("加载工作区失败: {}", e);
                self.error = Some(e.user_message("Failed to load workspaces"));
                return false;
            }
        }

        let valid = self
            .selected
            .filter(|id| self.workspaces.iter().any(|w| w.id == *id));
        self.selected = valid.or_else(|| self.workspaces.first().map(|w| w.id));
        self.load_history().await
    }

    /// 记录加载成功后才切换工作区
    pub async fn select(&mut self, id: i64) -> bool {
        self.error = None;
        let history = match self.gateway.get_chat_history(id).await {
            Ok(history) => history,
            Err(e) => {
                warn!("加载聊天记录失败: {}", e);
                self.error = Some(e.user_message("Failed to load chat history"));
                return false;
            }
        };
        if let Err(e) = self.gateway.session().select_workspace(id).await {
            self.error = Some(e.user_message("Failed to remember workspace"));
            return false;
        }
        self.selected = Some(id);
        self.messages = history;
        true
    }

    pub async fn load_history(&mut self) -> bool {
        let Some(id) = self.selected else {
            self.messages.clear();
            return true;
        };
        match self.gateway.get_chat_history(id).await {
            Ok(history) => {
                self.messages = history;
                true
            }
            Err(e) => {
                warn!("加载聊天记录失败: {}", e);
                self.error = Some(e.user_message("Failed to load chat history"));
                false
            }
        }
    }

    /// 成功时追加一条记录并清空输入；失败时消息和输入保持不变
    pub async fn send(&mut self) -> bool {
        self.error = None;
        let Some(id) = self.selected else {
            self.error = Some("Please select a workspace first".to_string());
            return false;
        };

        self.loading = true;
        let result = self.gateway.send_chat_message(id, &self.input).await;
        self.loading = false;

        match result {
            Ok(response) => {
                self.messages.push(ChatMessage {
                    message: std::mem::take(&mut self.input),
                    response,
                });
                true
            }
            Err(e) => {
                if !e.is_validation() {
                    warn!("发送消息失败: {}", e);
                }
                self.error = Some(e.user_message(SEND_FAILED));
                false
            }
        }
    }

    /// 只有 `confirm` 返回 true 才会调用后端
    pub async fn clear<F>(&mut self, confirm: F) -> bool
    where
        F: FnOnce(&str) -> bool,
    {
        self.notice = None;
        self.error = None;
        let Some(id) = self.selected else {
            return false;
        };
        if !confirm(CLEAR_PROMPT) {
            info!("已取消清空聊天记录");
            return false;
        }

        match self.gateway.clear_chat_history(id).await {
            Ok(()) => {
                self.messages.clear();
                self.notice = Some("Chat history cleared successfully!".to_string());
                true
            }
            Err(e) => {
                warn!("清空聊天记录失败: {}", e);
                self.error = Some(CLEAR_FAILED.to_string());
                false
            }
        }
    }

    pub fn workspace_name(&self) -> &str {
        self.selected
            .and_then(|id| self.workspaces.iter().find(|w| w.id == id))
            .map(|w| w.name.as_str())
            .unwrap_or("Select Workspace")
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.workspaces.is_empty() {
            Some(EmptyState::NoWorkspaces)
        } else if self.messages.is_empty() {
            Some(EmptyState::NoMessages)
        } else {
            None
        }
    }
}
