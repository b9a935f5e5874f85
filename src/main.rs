mod config;
mod gateway;
mod session;
mod storage;
mod utils;
mod views;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};

use config::{AppConfig, DEFAULT_CONFIG_PATH};
use gateway::{ChatMessage, Gateway, Paper, Role, Workspace};
use session::Session;
use storage::LocalStore;
use utils::logger;
use utils::scheduler::IntervalScheduler;
use views::format::ResponseFormatter;
use views::{
    AuthMode, Carousel, ChatView, DashboardView, EmptyState, LoginView, Navigation, Route,
    RouteGuard, SearchView, WorkspaceView,
};

#[derive(Parser)]
#[command(name = "researchhub")]
#[command(about = "ResearchHub AI 命令行客户端：论文搜索、工作区管理与 AI 问答", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 生成默认配置
    Init,
    /// 注册新账号
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        /// 例如 "PhD Candidate" 或 phd-candidate
        #[arg(long)]
        role: Role,
        #[arg(long)]
        institution: String,
    },
    /// 登录
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// 登出（清除本地 token）
    Logout,
    /// 显示登录状态与本地存储
    Status,
    /// 首页轮播
    Home {
        /// 起始幻灯片（从 1 开始）
        #[arg(long, default_value_t = 1)]
        slide: usize,
    },
    /// 工作区管理
    Workspaces {
        #[command(subcommand)]
        action: WorkspaceAction,
    },
    /// 搜索论文，可选导入
    Search {
        query: String,
        /// 导入第 N 条结果（从 1 开始）
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        import: Option<u64>,
        /// 导入目标工作区
        #[arg(short, long)]
        workspace: Option<i64>,
    },
    /// 与工作区论文对话
    Chat {
        #[command(subcommand)]
        action: ChatAction,
    },
    /// 统计概览
    Dashboard,
}

#[derive(Subcommand)]
enum WorkspaceAction {
    /// 列出工作区
    List,
    /// 创建工作区
    Create { name: String },
    /// 设为当前工作区
    Select { id: i64 },
    /// 列出工作区中的论文
    Papers {
        #[arg(short, long)]
        workspace: Option<i64>,
    },
    /// 上传 PDF
    Upload {
        file: PathBuf,
        #[arg(short, long)]
        workspace: Option<i64>,
    },
}

#[derive(Subcommand)]
enum ChatAction {
    /// 发送消息
    Send {
        message: String,
        #[arg(short, long)]
        workspace: Option<i64>,
    },
    /// 查看聊天记录
    History {
        #[arg(short, long)]
        workspace: Option<i64>,
    },
    /// 清空聊天记录（不可恢复）
    Clear {
        #[arg(short, long)]
        workspace: Option<i64>,
        /// 跳过确认
        #[arg(short, long)]
        yes: bool,
    },
}

impl Commands {
    fn route(&self) -> Route {
        match self {
            Commands::Init | Commands::Logout | Commands::Status | Commands::Home { .. } => Route::Home,
            Commands::Register { .. } | Commands::Login { .. } => Route::Login,
            Commands::Workspaces { .. } => Route::Workspace,
            Commands::Search { .. } => Route::Search,
            Commands::Chat { .. } => Route::Chat,
            Commands::Dashboard => Route::Dashboard,
        }
    }
}

/// 一次命令执行所需的上下文
struct App {
    config: AppConfig,
    gateway: Gateway,
    store: Option<LocalStore>,
}

impl App {
    async fn open() -> Result<Self> {
        let config = AppConfig::load()?;

        let (session, store) = if config.storage.database_path.is_empty() {
            warn!("未配置本地存储，登录状态不会保留");
            (Session::in_memory(), None)
        } else {
            let store = LocalStore::open(&config.storage.database_path)
                .await
                .with_context(|| format!("打开本地存储失败: {}", config.storage.database_path))?;
            (Session::restore(store.clone()).await?, Some(store))
        };

        let gateway = Gateway::new(&config, session)?;
        Ok(Self { config, gateway, store })
    }

    async fn close(&self) {
        if let Some(store) = &self.store {
            store.close().await;
        }
    }

    fn session(&self) -> &Session {
        self.gateway.session()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::init_logger();

    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        return init_command().await;
    }

    let app = App::open().await?;

    match RouteGuard::navigate(cli.command.route(), app.session()) {
        Navigation::Render(_) => {}
        Navigation::Redirect(Route::Login) => {
            println!("Please log in first: researchhub login -u <username> -p <password>");
            app.close().await;
            return Ok(());
        }
        Navigation::Redirect(_) => {
            println!("Already logged in. Run 'researchhub logout' to switch accounts.");
            app.close().await;
            return Ok(());
        }
    }

    match cli.command {
        Commands::Init => init_command().await?,
        Commands::Register {
            username,
            password,
            full_name,
            email,
            phone,
            role,
            institution,
        } => {
            let mut view = LoginView::new(app.gateway.clone(), AuthMode::Register);
            view.form = gateway::RegisterRequest {
                username,
                password,
                full_name,
                email,
                phone,
                role: Some(role),
                institution,
            };
            auth_command(view).await?;
        }
        Commands::Login { username, password } => {
            let mut view = LoginView::new(app.gateway.clone(), AuthMode::Login);
            view.form.username = username;
            view.form.password = password;
            auth_command(view).await?;
        }
        Commands::Logout => {
            app.gateway.logout().await?;
            println!("Logged out.");
        }
        Commands::Status => status_command(&app).await?,
        Commands::Home { slide } => home_command(&app, slide).await?,
        Commands::Workspaces { action } => workspaces_command(&app, action).await?,
        Commands::Search {
            query,
            import,
            workspace,
        } => search_command(&app, query, import, workspace).await?,
        Commands::Chat { action } => chat_command(&app, action).await?,
        Commands::Dashboard => dashboard_command(&app).await?,
    }

    app.close().await;
    Ok(())
}

async fn init_command() -> Result<()> {
    info!("初始化客户端配置...");

    tokio::fs::create_dir_all("config").await?;
    tokio::fs::create_dir_all("data").await?;

    if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() {
        info!("配置文件已存在，保持不变: {}", DEFAULT_CONFIG_PATH);
    } else {
        AppConfig::default().save(DEFAULT_CONFIG_PATH)?;
        info!("已生成配置文件: {}", DEFAULT_CONFIG_PATH);
    }

    let config = AppConfig::load()?;
    if !config.storage.database_path.is_empty() {
        LocalStore::open(&config.storage.database_path).await?;
        info!("本地存储已就绪: {}", config.storage.database_path);
    }

    info!("✅ 初始化完成！");
    info!("下一步:");
    info!("  1. 编辑 {} 设置 backend.base_url", DEFAULT_CONFIG_PATH);
    info!("  2. 运行 'researchhub register' 或 'researchhub login'");
    Ok(())
}

async fn auth_command(mut view: LoginView) -> Result<()> {
    if view.submit().await {
        println!("Welcome, {}!", view.form.username);
    } else if let Some(err) = &view.error {
        println!("{}", err);
    }
    Ok(())
}

async fn status_command(app: &App) -> Result<()> {
    println!("Backend: {}", app.gateway.base_url());
    if app.session().is_authenticated() {
        println!("Session: logged in");
    } else {
        println!("Session: not logged in");
    }
    match app.session().selected_workspace() {
        Some(id) => println!("Selected workspace: {}", id),
        None => println!("Selected workspace: none"),
    }
    if app.config.auth.logout_on_unauthorized {
        println!("An expired token logs you out automatically.");
    }

    let entries = app.session().stored_entries().await?;
    if !entries.is_empty() {
        println!("Local storage:");
        for entry in entries {
            // token 不回显
            let value = if entry.key == session::TOKEN_KEY { "<hidden>" } else { entry.value.as_str() };
            println!(
                "  {} = {} (updated {})",
                entry.key,
                value,
                entry.updated_at.as_deref().unwrap_or("-")
            );
        }
    }
    Ok(())
}

async fn home_command(app: &App, slide: usize) -> Result<()> {
    let mut start = Carousel::new();
    if !start.go_to(slide.saturating_sub(1)) {
        warn!("没有第 {} 张幻灯片，从第一张开始", slide);
    }
    let carousel = Arc::new(Mutex::new(start));
    print_slide(&carousel);
    if app.session().is_authenticated() {
        println!("Go to your dashboard: researchhub dashboard");
    } else {
        println!("Get started: researchhub register  |  researchhub login");
    }

    let mut scheduler = IntervalScheduler::new().await?;
    let ticker = Arc::clone(&carousel);
    let tick = Arc::new(move || {
        if let Ok(mut c) = ticker.lock() {
            c.advance();
        }
        print_slide(&ticker);
    });
    scheduler
        .every(Duration::from_secs(app.config.ui.carousel_interval_secs), tick)
        .await?;
    scheduler.run_until_ctrl_c().await?;
    Ok(())
}

fn print_slide(carousel: &Mutex<Carousel>) {
    if let Ok(c) = carousel.lock() {
        let slide = c.slide();
        println!();
        println!("  [{}/{}] {}", c.current() + 1, views::carousel::SLIDES.len(), slide.title);
        println!("        {}", slide.subtitle);
    }
}

async fn workspaces_command(app: &App, action: WorkspaceAction) -> Result<()> {
    let mut view = WorkspaceView::new(app.gateway.clone());

    match action {
        WorkspaceAction::List => {
            view.load().await;
            print_workspaces(&view.workspaces, view.selected);
        }
        WorkspaceAction::Create { name } => {
            view.new_name = name;
            if view.create().await {
                println!("Workspace created.");
                print_workspaces(&view.workspaces, view.selected);
            }
        }
        WorkspaceAction::Select { id } => {
            view.load().await;
            if !view.workspaces.iter().any(|w| w.id == id) {
                println!("Workspace {} not found.", id);
                return Ok(());
            }
            if view.select(id).await {
                if let Some(ws) = view.selected_workspace() {
                    println!("Selected workspace [{}] {}", ws.id, ws.name);
                }
                print_papers(&view.papers);
            }
        }
        WorkspaceAction::Papers { workspace } => {
            view.load().await;
            if let Some(id) = workspace {
                if !view.select(id).await {
                    print_messages(None, view.error.as_deref());
                    return Ok(());
                }
            }
            match view.empty_state() {
                Some(empty) => println!("{}", empty),
                None if view.selected.is_none() => println!("Please select a workspace first"),
                None => print_papers(&view.papers),
            }
        }
        WorkspaceAction::Upload { file, workspace } => {
            view.load().await;
            if let Some(id) = workspace {
                if !view.select(id).await {
                    print_messages(None, view.error.as_deref());
                    return Ok(());
                }
            }
            if view.upload(&file).await {
                print_papers(&view.papers);
            }
        }
    }

    print_messages(view.notice.as_deref(), view.error.as_deref());
    Ok(())
}

async fn search_command(
    app: &App,
    query: String,
    import: Option<u64>,
    workspace: Option<i64>,
) -> Result<()> {
    let mut view = SearchView::new(app.gateway.clone());
    view.query = query;

    if view.search().await && !view.results.is_empty() {
        println!("Found {} papers", view.results.len());
        for (i, paper) in view.results.iter().enumerate() {
            println!();
            println!("{:>3}. {}", i + 1, paper.title);
            print_paper_details(paper);
        }
    }
    if let Some(empty) = view.empty_state() {
        println!("{}", empty);
    }
    print_messages(None, view.error.as_deref());

    if let Some(n) = import {
        if view.results.is_empty() {
            return Ok(());
        }
        let index = usize::try_from(n - 1).context("结果序号过大")?;
        view.import(index, workspace).await;
        print_messages(view.notice.as_deref(), view.error.as_deref());
    }
    Ok(())
}

async fn chat_command(app: &App, action: ChatAction) -> Result<()> {
    let mut view = ChatView::new(app.gateway.clone());
    view.load().await;

    let workspace = match &action {
        ChatAction::Send { workspace, .. }
        | ChatAction::History { workspace }
        | ChatAction::Clear { workspace, .. } => *workspace,
    };
    if let Some(id) = workspace {
        if !view.select(id).await {
            print_messages(None, view.error.as_deref());
            return Ok(());
        }
    }

    if let Some(EmptyState::NoWorkspaces) = view.empty_state() {
        println!("{}", EmptyState::NoWorkspaces);
        return Ok(());
    }
    println!("Workspace: {}", view.workspace_name());

    let formatter = ResponseFormatter::new();
    match action {
        ChatAction::Send { message, .. } => {
            view.input = message;
            if view.send().await {
                if let Some(last) = view.messages.last() {
                    print_chat(&formatter, last);
                }
            }
        }
        ChatAction::History { .. } => match view.empty_state() {
            Some(empty) => println!("{}", empty),
            None => {
                for msg in &view.messages {
                    print_chat(&formatter, msg);
                }
            }
        },
        ChatAction::Clear { yes, .. } => {
            view.clear(|prompt| yes || confirm(prompt)).await;
        }
    }

    print_messages(view.notice.as_deref(), view.error.as_deref());
    Ok(())
}

async fn dashboard_command(app: &App) -> Result<()> {
    let mut view = DashboardView::new(app.gateway.clone());
    if !view.load().await {
        print_messages(None, view.error.as_deref());
        return Ok(());
    }

    println!("Dashboard");
    println!("  Workspaces: {}", view.stats.workspaces);
    println!("  Papers:     {}", view.stats.papers);
    println!("  AI chats:   {}", view.stats.chats);
    println!();
    println!("Recent activity");
    match view.empty_state() {
        Some(empty) => println!("{}", empty),
        None => {
            for item in &view.recent {
                let date = if item.date.is_empty() { "-" } else { item.date.as_str() };
                println!("  [{}] {} ({})", item.workspace, item.title, date);
            }
        }
    }
    Ok(())
}

/// 从标准输入读取 y/N
fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn print_workspaces(workspaces: &[Workspace], selected: Option<i64>) {
    if workspaces.is_empty() {
        println!("{}", EmptyState::NoWorkspaces);
        return;
    }
    for ws in workspaces {
        let marker = if Some(ws.id) == selected { "*" } else { " " };
        println!("{} [{}] {}", marker, ws.id, ws.name);
    }
}

fn print_papers(papers: &[Paper]) {
    if papers.is_empty() {
        println!("{}", EmptyState::NoPapers);
        return;
    }
    for paper in papers {
        println!();
        match paper.id {
            Some(id) => println!("[{}] {}", id, paper.title),
            None => println!("{}", paper.title),
        }
        print_paper_details(paper);
    }
}

fn print_paper_details(paper: &Paper) {
    println!("     Authors: {}", paper.authors);
    if let Some(date) = paper.published() {
        println!("     Published: {}", date.format("%B %-d, %Y"));
    }
    if !paper.url.is_empty() {
        println!("     {}", paper.url);
    }
    if !paper.abstract_text.is_empty() {
        let preview: String = paper.abstract_text.chars().take(240).collect();
        let ellipsis = if paper.abstract_text.chars().count() > 240 { "..." } else { "" };
        println!("     {}{}", preview, ellipsis);
    }
}

fn print_chat(formatter: &ResponseFormatter, msg: &ChatMessage) {
    println!();
    println!("You: {}", msg.message);
    println!("AI:  {}", formatter.to_terminal(&msg.response));
}

fn print_messages(notice: Option<&str>, error: Option<&str>) {
    if let Some(notice) = notice {
        println!("{}", notice);
    }
    if let Some(error) = error {
        println!("Error: {}", error);
    }
}
