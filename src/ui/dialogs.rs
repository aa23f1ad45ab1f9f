//! Dialog rendering module
//!
//! The reset confirmation and the session label input. Both draw on top of
//! the board, which stays visible behind them.

use crate::components::centered_rect;
use crate::theme::{Colors, Styles, UiConstants, UiText};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the reset confirmation dialog
pub fn render_reset_confirm(f: &mut Frame, parent: Rect, confirm_selected: bool) {
    let area = centered_rect(parent, 60, 9);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Colors::ERROR))
        .title(" Reset board? ")
        .title_style(
            Style::default()
                .fg(Colors::ERROR)
                .add_modifier(Modifier::BOLD),
        )
        .style(Styles::panel_bg_danger());

    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(2), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    f.render_widget(
        Paragraph::new(UiText::RESET_WARNING)
            .style(Styles::text())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        rows[0],
    );

    let (reset_style, cancel_style) = if confirm_selected {
        (Styles::button_danger(), Styles::button_inactive())
    } else {
        (Styles::button_inactive(), Styles::button_active())
    };
    let buttons = Line::from(vec![
        Span::styled(UiText::BTN_RESET, reset_style),
        Span::raw("    "),
        Span::styled(UiText::BTN_CANCEL, cancel_style),
    ]);
    f.render_widget(
        Paragraph::new(buttons).alignment(Alignment::Center),
        rows[2],
    );
}

/// Render the session label input with a visible cursor
pub fn render_identifier_input(f: &mut Frame, parent: Rect, input: &str) {
    let area = centered_rect(parent, UiConstants::INPUT_DIALOG_WIDTH, 5);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Styles::border_active())
        .title(format!(" {} ", UiText::IDENTIFIER_PROMPT))
        .title_style(Styles::title())
        .title_bottom(Line::from(" Enter: save | Esc: cancel ").right_aligned())
        .style(Styles::panel_bg());

    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    // Keep the tail of long labels in view
    let visible = inner.width.saturating_sub(2) as usize;
    let count = input.chars().count();
    let shown: String = input.chars().skip(count.saturating_sub(visible)).collect();
    let field = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw(" "),
            Span::styled(shown.clone(), Styles::text()),
        ])),
        field,
    );

    let cursor_x = field.x + 1 + shown.chars().count() as u16;
    f.set_cursor_position((cursor_x.min(field.x + field.width.saturating_sub(1)), field.y));
}
