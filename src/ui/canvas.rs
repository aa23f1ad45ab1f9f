//! Canvas rendering
//!
//! Cards live in pixel coordinates on a fixed-size canvas; the terminal shows
//! that canvas scaled into whatever cells are available. [`CanvasGeometry`]
//! does the conversion both ways so drawing and mouse hit-testing agree.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::catalog::Categories;
use crate::config_file::CanvasLayout;
use crate::theme::{Colors, Styles, Theme, UiConstants, UiText};
use crate::types::{Delta, Position};

/// Mapping between canvas pixels and terminal cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    pub area: Rect,
    pub layout: CanvasLayout,
}

impl CanvasGeometry {
    pub fn new(area: Rect, layout: CanvasLayout) -> Self {
        Self { area, layout }
    }

    /// Canvas pixels covered by one cell, horizontally and vertically
    pub fn pixels_per_cell(&self) -> (f64, f64) {
        (
            self.layout.width / f64::from(self.area.width.max(1)),
            self.layout.height / f64::from(self.area.height.max(1)),
        )
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.area.x
            && column < self.area.x + self.area.width
            && row >= self.area.y
            && row < self.area.y + self.area.height
    }

    /// Canvas position at the center of a cell
    pub fn to_pixel(&self, column: u16, row: u16) -> Position {
        let (px, py) = self.pixels_per_cell();
        Position::new(
            (f64::from(column.saturating_sub(self.area.x)) + 0.5) * px,
            (f64::from(row.saturating_sub(self.area.y)) + 0.5) * py,
        )
    }

    /// Pixel displacement for a cell offset
    pub fn cells_to_delta(&self, columns: i32, rows: i32) -> Delta {
        let (px, py) = self.pixels_per_cell();
        Delta::new(f64::from(columns) * px, f64::from(rows) * py)
    }

    /// Cell rectangle of a card at `position`, clipped to the canvas
    pub fn card_rect(&self, position: Position) -> Rect {
        let (px, py) = self.pixels_per_cell();
        let column = (position.x / px).round();
        let row = (position.y / py).round();
        let width = ((self.layout.card_width / px).round() as u16).max(UiConstants::MIN_CARD_WIDTH);
        let height =
            ((self.layout.card_height / py).round() as u16).max(UiConstants::MIN_CARD_HEIGHT);

        // Cards dragged off-canvas are pinned to the nearest edge
        let max_column = f64::from(self.area.width.saturating_sub(1));
        let max_row = f64::from(self.area.height.saturating_sub(1));
        let x = self.area.x + column.clamp(0.0, max_column) as u16;
        let y = self.area.y + row.clamp(0.0, max_row) as u16;

        Rect::new(x, y, width, height).intersection(self.area)
    }
}

/// One card as it should be drawn
#[derive(Debug, Clone)]
pub struct CardView<'a> {
    pub id: &'a str,
    pub text: &'a str,
    pub position: Position,
    pub selected: bool,
    pub highlighted: bool,
}

/// Everything the canvas needs for one frame
pub struct CanvasView<'a> {
    pub areas: &'a [String],
    pub identifier: &'a str,
    pub cards: Vec<CardView<'a>>,
    pub categories: &'a Categories,
    pub show_card_info: bool,
}

/// Tooltip text shown with card info enabled
pub fn card_info(categories: &Categories, id: &str) -> String {
    format!("ID: {} | Category: {}", id, categories.description(id))
}

/// Render the scene background and its cards, bottom card first
pub fn render_canvas(f: &mut Frame, geometry: &CanvasGeometry, view: &CanvasView<'_>) {
    let area = geometry.area;
    if area.width == 0 || area.height == 0 {
        return;
    }

    render_areas(f, area, view.areas);
    render_label_strip(f, area, view.identifier);

    if view.cards.is_empty() {
        let hint = Paragraph::new(UiText::EMPTY_SUBSET)
            .alignment(Alignment::Center)
            .style(Styles::text_muted());
        f.render_widget(hint, Rect::new(area.x, area.y + area.height / 2, area.width, 1));
        return;
    }

    for card in &view.cards {
        render_card(f, geometry, card, view.categories, view.show_card_info);
    }
}

fn render_areas(f: &mut Frame, area: Rect, labels: &[String]) {
    let usable = area.height.saturating_sub(UiConstants::LABEL_STRIP_HEIGHT);
    if labels.is_empty() || usable == 0 {
        return;
    }

    let count = labels.len() as u32;
    let offset = |i: u32| (u32::from(usable) * i / count) as u16;
    for (i, label) in labels.iter().enumerate() {
        let i = i as u32;
        let top = area.y + offset(i);
        let bottom = area.y + offset(i + 1);
        if bottom <= top {
            continue;
        }
        let band = Rect::new(area.x, top, area.width, bottom - top);
        let paragraph = Paragraph::new(Line::from(Span::styled(
            format!(" {}", label),
            Styles::area_label(),
        )))
        .style(Style::default().bg(Theme::area_band(i as usize)));
        f.render_widget(paragraph, band);
    }
}

fn render_label_strip(f: &mut Frame, area: Rect, identifier: &str) {
    let height = UiConstants::LABEL_STRIP_HEIGHT.min(area.height);
    let strip = Rect::new(area.x, area.y + area.height - height, area.width, height);
    let text = if identifier.is_empty() {
        Span::styled(UiText::NO_LABEL, Styles::text_muted())
    } else {
        Span::styled(identifier.to_string(), Styles::text())
    };
    f.render_widget(
        Paragraph::new(Line::from(text))
            .alignment(Alignment::Center)
            .style(Style::default().bg(Colors::LABEL_STRIP)),
        strip,
    );
}

fn render_card(
    f: &mut Frame,
    geometry: &CanvasGeometry,
    card: &CardView<'_>,
    categories: &Categories,
    show_card_info: bool,
) {
    let rect = geometry.card_rect(card.position);
    if rect.width < 2 || rect.height < 2 {
        return;
    }

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::card_border_style(
            categories.border_color(card.id),
            card.selected,
            card.highlighted,
        ))
        .style(Theme::card_style(categories.color(card.id)));
    if show_card_info {
        block = block.title(Line::from(card_info(categories, card.id)));
    }

    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(card.text)
            .alignment(Alignment::Center)
            .block(block),
        rect,
    );
}
