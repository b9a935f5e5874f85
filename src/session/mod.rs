//! 会话上下文：当前 bearer token 与选中的工作区。
//!
//! 显式注入给 [`crate::gateway::Gateway`] 和各个视图，不依赖全局状态。
//! 有 [`LocalStore`] 时写穿到本地存储，进程重启后仍保持登录。

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

use crate::storage::models::StoredEntry;
use crate::storage::LocalStore;
use crate::utils::GatewayResult;

pub const TOKEN_KEY: &str = "token";
pub const SELECTED_WORKSPACE_KEY: &str = "selected_workspace";

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    selected_workspace: Option<i64>,
}

#[derive(Clone)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
    store: Option<LocalStore>,
}

impl Session {
    /// 纯内存会话
    pub fn in_memory() -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            store: None,
        }
    }

    /// 从本地存储恢复会话
    pub async fn restore(store: LocalStore) -> GatewayResult<Self> {
        let token = store.get(TOKEN_KEY).await?;
        let selected_workspace = store
            .get(SELECTED_WORKSPACE_KEY)
            .await?
            .and_then(|v| v.parse::<i64>().ok());

        if token.is_some() {
            info!("已恢复登录状态");
        }

        Ok(Self {
            state: Arc::new(RwLock::new(SessionState { token, selected_workspace })),
            store: Some(store),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn current_token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    /// 先写存储再改内存，写失败时两边保持一致
    pub async fn set_token(&self, token: &str) -> GatewayResult<()> {
        if let Some(store) = &self.store {
            store.set(TOKEN_KEY, token).await?;
        }
        self.write().token = Some(token.to_string());
        Ok(())
    }

    /// 清除 token，同时清掉选中的工作区
    pub async fn clear_token(&self) -> GatewayResult<()> {
        if let Some(store) = &self.store {
            store.remove(TOKEN_KEY).await?;
            store.remove(SELECTED_WORKSPACE_KEY).await?;
        }
        let mut state = self.write();
        state.token = None;
        state.selected_workspace = None;
        Ok(())
    }

    pub fn selected_workspace(&self) -> Option<i64> {
        self.read().selected_workspace
    }

    pub async fn select_workspace(&self, id: i64) -> GatewayResult<()> {
        if let Some(store) = &self.store {
            store.set(SELECTED_WORKSPACE_KEY, &id.to_string()).await?;
        }
        self.write().selected_workspace = Some(id);
        Ok(())
    }

    /// 内存会话没有持久化条目
    pub async fn stored_entries(&self) -> GatewayResult<Vec<StoredEntry>> {
        match &self.store {
            Some(store) => store.entries().await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn clear_selected_workspace(&self) -> GatewayResult<()> {
        if let Some(store) = &self.store {
            store.remove(SELECTED_WORKSPACE_KEY).await?;
        }
        self.write().selected_workspace = None;
        Ok(())
    }
}
