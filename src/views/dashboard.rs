use tracing::warn;

use super::EmptyState;
use crate::gateway::Gateway;
use crate::utils::GatewayResult;

const PAPERS_PER_WORKSPACE: usize = 3;
const MAX_ACTIVITY: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub workspaces: usize,
    pub papers: usize,
    pub chats: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub workspace: String,
    pub title: String,
    pub date: String,
}

/// 汇总所有工作区的论文数、对话数与最近论文
pub struct DashboardView {
    gateway: Gateway,
    pub stats: Stats,
    pub recent: Vec<Activity>,
    pub loading: bool,
    pub error: Option<String>,
}

impl DashboardView {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            stats: Stats::default(),
            recent: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub async fn load(&mut self) -> bool {
        self.loading = true;
        let result = self.collect().await;
        self.loading = false;

        match result {
            Ok((stats, recent)) => {
                self.stats = stats;
                self.recent = recent;
                true
            }
            Err(e) => {
                warn!("加载仪表盘失败: {}", e);
                self.error = Some(e.user_message("Failed to load dashboard data"));
                false
            }
        }
    }

    async fn collect(&self) -> GatewayResult<(Stats, Vec<Activity>)> {
        let workspaces = self.gateway.list_workspaces().await?;
        let mut stats = Stats {
            workspaces: workspaces.len(),
            ..Stats::default()
        };
        let mut activity = Vec::new();

        for ws in &workspaces {
            let papers = self.gateway.list_papers(ws.id).await?;
            let chats = self.gateway.get_chat_history(ws.id).await?;
            stats.papers += papers.len();
            stats.chats += chats.len();

            activity.extend(papers.into_iter().take(PAPERS_PER_WORKSPACE).map(|p| Activity {
                workspace: ws.name.clone(),
                title: p.title,
                date: p.date,
            }));
        }

        activity.truncate(MAX_ACTIVITY);
        Ok((stats, activity))
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        self.recent.is_empty().then_some(EmptyState::NoActivity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockBackend;
    use crate::gateway::Paper;

    fn paper(n: usize) -> Paper {
        Paper {
            id: None,
            title: format!("Paper {}", n),
            authors: "Someone".to_string(),
            abstract_text: String::new(),
            date: "2023-03-01".to_string(),
            url: format!("http://arxiv.org/abs/2303.{:05}", n),
        }
    }

    #[tokio::test]
    async fn totals_and_capped_activity() {
        let backend = MockBackend::spawn().await;
        let gateway = backend.logged_in_gateway("alice").await;
        let a = gateway.create_workspace("A").await.unwrap();
        let b = gateway.create_workspace("B").await.unwrap();
        for n in 0..4 {
            gateway.import_paper(&paper(n), a.id).await.unwrap();
        }
        for n in 4..7 {
            gateway.import_paper(&paper(n), b.id).await.unwrap();
        }
        gateway.send_chat_message(a.id, "one").await.unwrap();
        gateway.send_chat_message(b.id, "two").await.unwrap();

        let mut view = DashboardView::new(gateway);
        assert!(view.load().await);
        assert_eq!(view.stats, Stats { workspaces: 2, papers: 7, chats: 2 });
        assert_eq!(view.recent.len(), 5);
        assert_eq!(view.recent[2].title, "Paper 2");
        assert_eq!(view.recent[3].workspace, "B");
        assert_eq!(view.empty_state(), None);
    }

    #[tokio::test]
    async fn fresh_account_has_no_activity() {
        let backend = MockBackend::spawn().await;
        let mut view = DashboardView::new(backend.logged_in_gateway("alice").await);
        assert!(view.load().await);
        assert_eq!(view.stats, Stats::default());
        assert_eq!(view.empty_state(), Some(EmptyState::NoActivity));
    }
}
