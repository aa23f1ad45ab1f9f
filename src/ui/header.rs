//! Header, status line and navigation bar

use crate::board::NoticeLevel;
use crate::components::keybindings::NavBarItem;
use crate::theme::{Colors, Styles, Theme, UiText};
use crate::types::{SceneId, SubsetId};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

/// Session summary shown next to the scene tabs
pub struct HeaderInfo<'a> {
    pub scene: SceneId,
    pub subset: &'a SubsetId,
    pub subsets: &'a [SubsetId],
    pub identifier: &'a str,
    pub picked: usize,
    pub remaining: usize,
}

/// Render the scene tabs and session summary
pub fn render_header(f: &mut Frame, area: Rect, info: &HeaderInfo<'_>) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(10)])
        .split(area);

    let titles: Vec<String> = SceneId::all().into_iter().map(SceneId::title).collect();
    let selected = SceneId::all()
        .iter()
        .position(|s| *s == info.scene)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border_active())
                .title(UiText::APP_TITLE)
                .title_style(Styles::title()),
        )
        .select(selected)
        .style(Styles::tab_inactive())
        .highlight_style(Styles::tab_active());
    f.render_widget(tabs, chunks[0]);

    let mut sets: Vec<Span> = vec![Span::styled("Set ", Styles::text_muted())];
    for subset in info.subsets {
        let style = if subset == info.subset {
            Styles::tab_active()
        } else {
            Styles::tab_inactive()
        };
        sets.push(Span::styled(format!(" {} ", subset), style));
    }
    sets.push(Span::styled("  Picked ", Styles::text_muted()));
    sets.push(Span::styled(info.picked.to_string(), Styles::text()));
    sets.push(Span::styled("  Left ", Styles::text_muted()));
    sets.push(Span::styled(info.remaining.to_string(), Styles::text()));
    sets.push(Span::styled("  Label ", Styles::text_muted()));
    if info.identifier.is_empty() {
        sets.push(Span::styled(UiText::NO_LABEL, Styles::text_muted()));
    } else {
        sets.push(Span::styled(info.identifier.to_string(), Styles::text()));
    }

    let summary = Paragraph::new(Line::from(sets)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border_active()),
    );
    f.render_widget(summary, chunks[1]);
}

/// Render the one-line status message
pub fn render_status(f: &mut Frame, area: Rect, message: &str, level: NoticeLevel) {
    let line = Line::from(Span::styled(format!(" {}", message), Theme::notice_style(level)));
    f.render_widget(Paragraph::new(line), area);
}

/// Render the navigation bar
pub fn render_nav_bar(f: &mut Frame, area: Rect, items: &[NavBarItem]) {
    let mut spans: Vec<Span> = Vec::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Styles::nav_hint()));
        }
        spans.push(Span::styled(item.key_display.clone(), Styles::nav_key()));
        spans.push(Span::styled(
            format!(" {}", item.action_label),
            Styles::text_secondary(),
        ));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).style(ratatui::style::Style::default().bg(Colors::BG_PRIMARY)),
        area,
    );
}
