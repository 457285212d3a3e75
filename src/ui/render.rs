//! 界面渲染
//!
//! 上方 Hero（姓名、打字机角色、标语），中间精选项目列表（按语言着色、描述截断），
//! 底部 API 状态与快捷键提示。

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::content::format::{
    category_label, format_date, language_color, parse_hex_color, truncate_text,
};
use crate::content::{ApiStatus, Project};
use crate::rotator::Phase;
use crate::ui::state::{Loadable, PortfolioView};

/// 打字光标
const CURSOR: &str = "▌";
/// 最多展示的项目数
const MAX_PROJECTS: usize = 6;

fn hex_to_color(hex: &str) -> Color {
    parse_hex_color(hex)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::Magenta)
}

fn status_color(status: &ApiStatus) -> Color {
    match status {
        ApiStatus::Connecting => Color::Yellow,
        ApiStatus::Connected { .. } => Color::Green,
        ApiStatus::Offline => Color::Red,
    }
}

/// Hero 区的行：姓名、角色（带光标）、标语或加载提示
pub fn hero_lines(view: &PortfolioView) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            view.display_name().to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw("I'm a "),
            Span::styled(
                view.role_text.clone(),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ),
            // 停顿时光标变暗
            Span::styled(
                CURSOR,
                if view.phase == Phase::Paused {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::Magenta)
                },
            ),
        ]),
        Line::from(Span::raw("")),
    ];

    let tagline = match &view.content.profile {
        Loadable::Loading => Span::styled("Loading profile…", Style::default().fg(Color::DarkGray)),
        Loadable::Ready(p) if !p.tagline.is_empty() => Span::styled(p.tagline.clone(), Style::default().fg(Color::Gray)),
        Loadable::Ready(p) => Span::styled(p.title.clone(), Style::default().fg(Color::Gray)),
        Loadable::Failed => Span::styled("Failed to load profile.", Style::default().fg(Color::Red)),
    };
    lines.push(Line::from(tagline));
    lines
}

fn project_lines(project: &Project, width: usize) -> Vec<Line<'static>> {
    let language = project.primary_language.clone().unwrap_or_default();
    let mut header = vec![
        Span::styled(
            format!("★ {:<4} ", project.stars_count),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            project.display_name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  [{}]", category_label(project.category.as_deref())),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if !language.is_empty() {
        header.push(Span::raw("  "));
        header.push(Span::styled(
            language.clone(),
            Style::default().fg(hex_to_color(language_color(&language))),
        ));
    }
    if let Some(updated) = project.github_updated_at.as_deref() {
        header.push(Span::styled(
            format!("  · {}", format_date(Some(updated))),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let description = project.description.as_deref().unwrap_or("No description");
    vec![
        Line::from(header),
        Line::from(Span::styled(
            format!("  {}", truncate_text(description, width.saturating_sub(2).max(8))),
            Style::default().fg(Color::Gray),
        )),
    ]
}

/// 项目区的行：加载中 / 失败 / 空列表 / 项目条目
pub fn projects_text(projects: &Loadable<Vec<Project>>, width: usize) -> Text<'static> {
    match projects {
        Loadable::Loading => Text::from(Line::from(Span::styled(
            "Loading projects…",
            Style::default().fg(Color::DarkGray),
        ))),
        Loadable::Failed => Text::from(Line::from(Span::styled(
            "Failed to load projects. Press r to retry.",
            Style::default().fg(Color::Red),
        ))),
        Loadable::Ready(list) if list.is_empty() => Text::from("No featured projects yet."),
        Loadable::Ready(list) => {
            let mut lines = Vec::new();
            for (idx, project) in list.iter().take(MAX_PROJECTS).enumerate() {
                if idx > 0 {
                    lines.push(Line::from(""));
                }
                lines.extend(project_lines(project, width));
            }
            Text::from(lines)
        }
    }
}

/// 绘制一帧
pub fn draw(f: &mut Frame, view: &PortfolioView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    let hero = Paragraph::new(Text::from(hero_lines(view)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(hero, chunks[0]);

    let content_width = chunks[1].width.saturating_sub(2) as usize;
    let projects = Paragraph::new(projects_text(&view.content.projects, content_width))
        .block(
            Block::default()
                .title(" Featured Projects ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(projects, chunks[1]);

    let hint = " r 刷新 │ q / Esc 退出 ";
    let status = Paragraph::new(Line::from(vec![
        Span::raw("Backend API: "),
        Span::styled(
            view.api_status.label(),
            Style::default().fg(status_color(&view.api_status)),
        ),
    ]))
    .block(
        Block::default()
            .title_bottom(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(status_color(&view.api_status))),
    );
    f.render_widget(status, chunks[2]);
}
