//! 各个页面的本地状态：输入、加载标志、结果和提示信息。
//!
//! 视图只做本地校验并调用 [`crate::gateway::Gateway`]，渲染交给命令行。

pub mod carousel;
pub mod chat;
pub mod dashboard;
pub mod format;
pub mod guard;
pub mod login;
pub mod search;
pub mod workspace;

use std::fmt;

pub use carousel::Carousel;
pub use chat::ChatView;
pub use dashboard::DashboardView;
pub use guard::{Navigation, Route, RouteGuard};
pub use login::{AuthMode, LoginView};
pub use search::SearchView;
pub use workspace::WorkspaceView;

/// 空结果不是错误，渲染为引导文字
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoWorkspaces,
    NoPapers,
    NoMessages,
    NoResults,
    NoActivity,
}

impl EmptyState {
    pub fn title(&self) -> &'static str {
        match self {
            EmptyState::NoWorkspaces => "No Workspaces Found",
            EmptyState::NoPapers => "No papers yet",
            EmptyState::NoMessages => "No messages yet.",
            EmptyState::NoResults => "No results yet. Try searching for papers.",
            EmptyState::NoActivity => "No activity yet",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            EmptyState::NoWorkspaces => {
                "Create a workspace first: researchhub workspaces create <name>"
            }
            EmptyState::NoPapers => {
                "Import papers from search or upload a PDF: researchhub workspaces upload <file.pdf>"
            }
            EmptyState::NoMessages => "Ask a question about the papers in this workspace.",
            EmptyState::NoResults => "Try different keywords: researchhub search <query>",
            EmptyState::NoActivity => "Start by searching for papers and importing them.",
        }
    }
}

impl fmt::Display for EmptyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n  {}", self.title(), self.guidance())
    }
}
