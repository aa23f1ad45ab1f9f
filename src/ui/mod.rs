//! User interface rendering module
//!
//! - `header` - scene tabs, session summary, status line and nav bar
//! - `canvas` - scaled scene canvas with its cards
//! - `dialogs` - reset confirmation and session label input

pub mod canvas;
mod dialogs;
mod header;

use crate::app::{AppMode, AppState};
use crate::board::Board;
use crate::catalog::Categories;
use crate::components::help_overlay::HelpOverlay;
use crate::components::keybindings::KeybindingContext;
use crate::config_file::BoardConfig;
use crate::persistence::KeyValueStore;
use crate::theme::{Styles, UiConstants};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, BorderType, Borders},
    Frame,
};

pub use canvas::{CanvasGeometry, CanvasView, CardView};
pub use header::HeaderInfo;

/// UI renderer for the application
#[derive(Debug, Default)]
pub struct UiRenderer;

impl UiRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render one frame; returns the screen area of the canvas so mouse
    /// events can be mapped back to canvas pixels
    pub fn render<S: KeyValueStore>(
        &self,
        f: &mut Frame,
        board: &Board<S>,
        state: &AppState,
        config: &BoardConfig,
        categories: &Categories,
        keybinding_ctx: &KeybindingContext,
    ) -> Rect {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(UiConstants::HEADER_HEIGHT),
                Constraint::Min(5),
                Constraint::Length(UiConstants::STATUS_HEIGHT),
                Constraint::Length(UiConstants::NAV_BAR_HEIGHT),
            ])
            .split(f.area());

        let subsets = board.subsets();
        header::render_header(
            f,
            chunks[0],
            &HeaderInfo {
                scene: board.active_scene(),
                subset: board.active_subset(),
                subsets: &subsets,
                identifier: board.identifier(),
                picked: board.picked_count(),
                remaining: board.unpicked_count(),
            },
        );

        let frame = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Styles::border_active())
            .title(format!(" {} ", board.active_scene().title()))
            .title_style(Styles::title());
        let canvas_area = frame.inner(chunks[1]);
        f.render_widget(frame, chunks[1]);

        let geometry = CanvasGeometry::new(canvas_area, *board.layout());
        let view = canvas_view(board, state, config, categories, &geometry);
        canvas::render_canvas(f, &geometry, &view);

        header::render_status(f, chunks[2], &state.status_message, state.status_level);
        header::render_nav_bar(f, chunks[3], &keybinding_ctx.get_nav_items(&state.mode));

        match state.mode {
            AppMode::Board => {}
            AppMode::ConfirmReset => {
                dialogs::render_reset_confirm(f, f.area(), state.confirm_selected)
            }
            AppMode::EditIdentifier => {
                dialogs::render_identifier_input(f, f.area(), &state.identifier_input)
            }
        }

        if state.help_visible {
            HelpOverlay::new(&state.mode, keybinding_ctx).render(f, f.area());
        }

        canvas_area
    }
}

/// Cards of the active (scene, subset), bottom first, with the drag in
/// progress applied as a visual offset
fn canvas_view<'a, S: KeyValueStore>(
    board: &'a Board<S>,
    state: &AppState,
    config: &'a BoardConfig,
    categories: &'a Categories,
    geometry: &CanvasGeometry,
) -> CanvasView<'a> {
    let scene = board.active_scene();
    let subset = board.active_subset();
    let cards = board
        .visible_cards()
        .into_iter()
        .map(|card| {
            let mut position = card.position(scene, subset);
            if let Some(drag) = state.drag.as_ref().filter(|d| d.card_id == card.id) {
                let (columns, rows) = drag.offset();
                let delta = geometry.cells_to_delta(columns, rows);
                position = position + board.layout().clamp_delta(position, delta);
            }
            CardView {
                id: &card.id,
                text: &card.text,
                position,
                selected: state.selected.as_deref() == Some(card.id.as_str()),
                highlighted: state.highlighted.as_deref() == Some(card.id.as_str()),
            }
        })
        .collect();

    CanvasView {
        areas: config.areas(scene),
        identifier: board.identifier(),
        cards,
        categories,
        show_card_info: state.show_card_info,
    }
}
