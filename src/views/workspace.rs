use std::path::Path;
use tracing::warn;

use super::EmptyState;
use crate::gateway::{Gateway, Paper, Workspace};
use crate::utils::GatewayError;

const SELECT_FIRST: &str = "Please select a workspace first";

/// 工作区浏览：列表、选中工作区的论文、PDF 上传
pub struct WorkspaceView {
    gateway: Gateway,
    pub workspaces: Vec<Workspace>,
    pub selected: Option<i64>,
    pub papers: Vec<Paper>,
    pub new_name: String,
    pub uploading: bool,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl WorkspaceView {
    pub fn new(gateway: Gateway) -> Self {
        let selected = gateway.session().selected_workspace();
        Self {
            gateway,
            workspaces: Vec::new(),
            selected,
            papers: Vec::new(),
            new_name: String::new(),
            uploading: false,
            notice: None,
            error: None,
        }
    }

    fn fail(&mut self, err: GatewayError, fallback: &str) -> bool {
        if !err.is_validation() {
            warn!("{}: {}", fallback, err);
        }
        self.error = Some(err.user_message(fallback));
        false
    }

    pub async fn load(&mut self) -> bool {
        self.error = None;
        match self.gateway.list_workspaces().await {
            Ok(list) => {
                self.workspaces = list;
                // 会话里记住的工作区可能已不存在
                if let Some(id) = self.selected {
                    if self.workspaces.iter().any(|w| w.id == id) {
                        return self.load_papers().await;
                    }
                    self.selected = None;
                    if let Err(e) = self.gateway.session().clear_selected_workspace().await {
                        warn!("清除失效的工作区选择失败: {}", e);
                    }
                }
                true
            }
            Err(e) => self.fail(e, "Failed to load workspaces"),
        }
    }

    pub async fn create(&mut self) -> bool {
        self.error = None;
        match self.gateway.create_workspace(&self.new_name).await {
            Ok(_) => {
                self.new_name.clear();
                self.load().await
            }
            Err(e) => self.fail(e, "Failed to create workspace"),
        }
    }

    /// 论文加载成功后才提交选择；失败时视图和会话保持原样
    pub async fn select(&mut self, id: i64) -> bool {
        self.error = None;
        let papers = match self.gateway.list_papers(id).await {
            Ok(papers) => papers,
            Err(e) => return self.fail(e, "Failed to load papers"),
        };
        if let Err(e) = self.gateway.session().select_workspace(id).await {
            return self.fail(e, "Failed to remember workspace");
        }
        self.selected = Some(id);
        self.papers = papers;
        true
    }

    pub async fn load_papers(&mut self) -> bool {
        let Some(id) = self.selected else {
            self.papers.clear();
            return true;
        };
        match self.gateway.list_papers(id).await {
            Ok(papers) => {
                self.papers = papers;
                true
            }
            Err(e) => self.fail(e, "Failed to load papers"),
        }
    }

    pub async fn upload(&mut self, path: &Path) -> bool {
        self.notice = None;
        self.error = None;
        let Some(id) = self.selected else {
            self.error = Some(SELECT_FIRST.to_string());
            return false;
        };

        self.uploading = true;
        let result = self.gateway.upload_paper_file(path, id).await;
        self.uploading = false;

        match result {
            Ok(_) => {
                self.notice = Some("PDF uploaded successfully!".to_string());
                self.load_papers().await
            }
            Err(e) => self.fail(e, "Failed to upload PDF. Please try again."),
        }
    }

    pub fn selected_workspace(&self) -> Option<&Workspace> {
        let id = self.selected?;
        self.workspaces.iter().find(|w| w.id == id)
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.workspaces.is_empty() {
            Some(EmptyState::NoWorkspaces)
        } else if self.selected.is_some() && self.papers.is_empty() {
            Some(EmptyState::NoPapers)
        } else {
            None
        }
    }
}
