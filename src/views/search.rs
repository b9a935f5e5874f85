use tracing::{info, warn};

use super::EmptyState;
use crate::gateway::{Gateway, Paper};

const NO_MATCHES: &str = "No papers found. Try different keywords.";
const SEARCH_FAILED: &str = "Search failed. Please try again.";
const IMPORT_FAILED: &str = "Failed to import paper. Please try again.";
const NEED_WORKSPACE: &str = "Please create a workspace first!";

pub struct SearchView {
    gateway: Gateway,
    pub query: String,
    pub results: Vec<Paper>,
    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl SearchView {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            query: String::new(),
            results: Vec::new(),
            loading: false,
            error: None,
            notice: None,
        }
    }

    pub async fn search(&mut self) -> bool {
        self.error = None;
        self.loading = true;
        let result = self.gateway.search_papers(&self.query).await;
        self.loading = false;

        match result {
            Ok(papers) => {
                if papers.is_empty() {
                    self.error = Some(NO_MATCHES.to_string());
                }
                self.results = papers;
                true
            }
            Err(e) => {
                warn!("搜索失败: {}", e);
                self.error = Some(e.user_message(SEARCH_FAILED));
                false
            }
        }
    }

    /// 导入第 `index` 条结果。只有一个工作区时直接用它；
    /// 否则依次取显式指定、会话中选中、第一个工作区
    pub async fn import(&mut self, index: usize, workspace_id: Option<i64>) -> bool {
        self.notice = None;
        self.error = None;

        let Some(paper) = self.results.get(index).cloned() else {
            self.error = Some(format!("No search result #{}", index + 1));
            return false;
        };

        let workspaces = match self.gateway.list_workspaces().await {
            Ok(list) => list,
            Err(e) => {
                self.error = Some(e.user_message(IMPORT_FAILED));
                return false;
            }
        };
        let Some(first) = workspaces.first() else {
            self.error = Some(NEED_WORKSPACE.to_string());
            return false;
        };

        let target = if workspaces.len() == 1 {
            first.id
        } else {
            let selected = self
                .gateway
                .session()
                .selected_workspace()
                .filter(|id| workspaces.iter().any(|w| w.id == *id));
            workspace_id.or(selected).unwrap_or(first.id)
        };

        match self.gateway.import_paper(&paper, target).await {
            Ok(_) => {
                info!("已导入: {}", paper.title);
                self.notice = Some("Paper imported successfully!".to_string());
                true
            }
            Err(e) => {
                warn!("导入失败: {}", e);
                self.error = Some(IMPORT_FAILED.to_string());
                false
            }
        }
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.results.is_empty() && self.error.is_none() && !self.loading {
            Some(EmptyState::NoResults)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockBackend;

    #[tokio::test]
    async fn zero_matches_sets_guidance_message() {
        let backend = MockBackend::spawn().await;
        let mut view = SearchView::new(backend.logged_in_gateway("alice").await);
        assert_eq!(view.empty_state(), Some(EmptyState::NoResults));

        view.query = "obscure topic".to_string();
        assert!(view.search().await);
        assert!(view.results.is_empty());
        assert_eq!(view.error.as_deref(), Some(NO_MATCHES));
    }

    #[tokio::test]
    async fn import_needs_a_workspace() {
        let backend = MockBackend::spawn().await;
        let gateway = backend.logged_in_gateway("alice").await;
        let mut view = SearchView::new(gateway.clone());
        view.query = "transformer".to_string();
        assert!(view.search().await);
        assert_eq!(view.results.len(), 2);

        assert!(!view.import(0, None).await);
        assert_eq!(view.error.as_deref(), Some(NEED_WORKSPACE));

        let only = gateway.create_workspace("Only").await.unwrap();
        assert!(view.import(0, Some(12345)).await);
        assert_eq!(gateway.list_papers(only.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn import_prefers_explicit_then_selected_workspace() {
        let backend = MockBackend::spawn().await;
        let gateway = backend.logged_in_gateway("alice").await;
        let first = gateway.create_workspace("First").await.unwrap();
        let second = gateway.create_workspace("Second").await.unwrap();
        let third = gateway.create_workspace("Third").await.unwrap();

        let mut view = SearchView::new(gateway.clone());
        view.query = "transformer".to_string();
        view.search().await;

        assert!(view.import(0, None).await);
        assert_eq!(gateway.list_papers(first.id).await.unwrap().len(), 1);

        gateway.session().select_workspace(second.id).await.unwrap();
        assert!(view.import(1, None).await);
        assert_eq!(gateway.list_papers(second.id).await.unwrap().len(), 1);

        assert!(view.import(1, Some(third.id)).await);
        assert_eq!(gateway.list_papers(third.id).await.unwrap().len(), 1);

        assert!(!view.import(7, None).await);
    }
}
