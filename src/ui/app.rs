//! TUI 应用主循环
//!
//! 进入全屏/原始模式；视图存活期间挂载轮播器，后台拉取内容，每帧读取轮播快照、API 状态与内容渲染。
//! 退出时先卸载轮播器（取消其定时器），再恢复终端。

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::content::{ApiStatus, ContentClient, QueryKey, QueryKind};
use crate::rotator::{MountedRotator, RoleRotator};
use crate::ui::event::{AppEvent, EventHandler};
use crate::ui::render::draw;
use crate::ui::state::{load_content, ContentState, PortfolioView};

/// 渲染节拍，小于最短的删除步长
const FRAME: Duration = Duration::from_millis(25);

/// 运行 TUI：启用原始模式与全屏，循环 poll 事件 + 渲染，退出时恢复终端
pub async fn run_app(
    title: String,
    rotator: RoleRotator,
    client: Arc<ContentClient>,
    status_rx: watch::Receiver<ApiStatus>,
) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, title, rotator, client, status_rx).await;

    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    title: String,
    rotator: RoleRotator,
    client: Arc<ContentClient>,
    status_rx: watch::Receiver<ApiStatus>,
) -> anyhow::Result<()> {
    let mounted = MountedRotator::mount(rotator);
    let (content_tx, content_rx) = watch::channel(ContentState::default());
    let content_tx = Arc::new(content_tx);
    let mut loader = spawn_loader(client.clone(), content_tx.clone());
    let events = EventHandler::new(FRAME);

    let outcome = loop {
        match events.poll() {
            Ok(Some(AppEvent::Quit)) => break Ok(()),
            Ok(Some(AppEvent::Refresh)) => {
                tracing::info!("refreshing content");
                loader.abort();
                refresh_shown_content(&client).await;
                loader = spawn_loader(client.clone(), content_tx.clone());
            }
            Ok(None) => {}
            Err(e) => break Err(e),
        }

        let snapshot = mounted.snapshot();
        let view = PortfolioView {
            fallback_name: title.clone(),
            role_text: snapshot.display_text,
            phase: snapshot.phase,
            content: content_rx.borrow().clone(),
            api_status: status_rx.borrow().clone(),
        };
        if let Err(e) = terminal.draw(|f| draw(f, &view)) {
            break Err(e.into());
        }

        tokio::task::yield_now().await;
    };

    loader.abort();
    mounted.unmount().await;
    outcome
}

/// 只失效首页展示的查询（资料与各种过滤条件下的项目列表）
async fn refresh_shown_content(client: &ContentClient) {
    client.invalidate(&QueryKey::new(QueryKind::Profile)).await;
    let dropped = client.invalidate_kind(QueryKind::Projects).await;
    tracing::debug!(dropped, "project queries invalidated");
}

fn spawn_loader(
    client: Arc<ContentClient>,
    content_tx: Arc<watch::Sender<ContentState>>,
) -> JoinHandle<()> {
    tokio::spawn(async move { load_content(client, &content_tx).await })
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
