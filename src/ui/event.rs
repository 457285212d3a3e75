//! 事件处理
//!
//! 轮询 crossterm 键盘事件：q / Esc / Ctrl+C 退出，r 刷新内容，其余按键忽略。

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// 应用事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    Refresh,
}

/// 事件处理器：poll 等待不超过 frame，用作渲染节拍
pub struct EventHandler {
    frame: Duration,
}

impl EventHandler {
    pub fn new(frame: Duration) -> Self {
        Self { frame }
    }

    pub fn poll(&self) -> anyhow::Result<Option<AppEvent>> {
        if event::poll(self.frame)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(map_key(key));
                }
            }
        }
        Ok(None)
    }
}

pub fn map_key(key: KeyEvent) -> Option<AppEvent> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(AppEvent::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),
        KeyCode::Char('r') => Some(AppEvent::Refresh),
        _ => None,
    }
}
