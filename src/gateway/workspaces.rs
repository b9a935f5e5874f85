use reqwest::Method;
use tracing::info;

use super::models::{CreateWorkspaceRequest, Workspace};
use super::validation::require_text;
use super::Gateway;
use crate::utils::GatewayResult;

impl Gateway {
    /// 按后端返回顺序（即创建顺序）
    pub async fn list_workspaces(&self) -> GatewayResult<Vec<Workspace>> {
        let req = self.authed(Method::GET, "/workspaces")?;
        self.send(req).await
    }

    pub async fn create_workspace(&self, name: &str) -> GatewayResult<Workspace> {
        require_text(name, "Workspace name must not be empty")?;

        let req = self
            .authed(Method::POST, "/workspaces")?
            .json(&CreateWorkspaceRequest { name });
        let workspace: Workspace = self.send(req).await?;

        info!("已创建工作区 [{}] {}", workspace.id, workspace.name);
        Ok(workspace)
    }
}
