//! Application module
//!
//! Contains the event loop, key and mouse dispatch, and the glue between the
//! presentation state and the [`Board`].
//!
//! # Module Structure
//! - `state` - Presentation state types (AppState, AppMode, DragState)
//! - Main module - App struct and event loop

mod state;

pub use state::{AppMode, AppState, DragState};

use crate::board::{Board, Notice};
use crate::catalog::Categories;
use crate::components::keybindings::{KeyAction, KeybindingContext};
use crate::config_file::BoardConfig;
use crate::error::Result;
use crate::export;
use crate::persistence::KeyValueStore;
use crate::theme::UiConstants;
use crate::types::Delta;
use crate::ui::{CanvasGeometry, UiRenderer};
use chrono::Local;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{backend::Backend, Frame, Terminal};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Main application struct
pub struct App<S: KeyValueStore> {
    board: Board<S>,
    state: AppState,
    config: BoardConfig,
    categories: Categories,
    export_dir: PathBuf,
    ui_renderer: UiRenderer,
    /// Keybinding context for dispatch and navigation hints
    keybinding_context: KeybindingContext,
}

impl<S: KeyValueStore> App<S> {
    /// Create a new application instance
    pub fn new(
        mut board: Board<S>,
        config: BoardConfig,
        categories: Categories,
        export_dir: PathBuf,
    ) -> Self {
        info!("Creating new App instance");
        let mut state = AppState {
            show_card_info: config.show_card_info,
            ..AppState::default()
        };
        if let Some(notice) = board.take_notice() {
            state.apply_notice(notice);
        }

        Self {
            board,
            state,
            config,
            categories,
            export_dir,
            ui_renderer: UiRenderer::new(),
            keybinding_context: KeybindingContext::new(),
        }
    }

    pub fn board(&self) -> &Board<S> {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board<S> {
        &mut self.board
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Toggle help overlay visibility
    pub fn toggle_help(&mut self) {
        self.state.help_visible = !self.state.help_visible;
    }

    /// Run the main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("Starting main application loop");

        loop {
            terminal.draw(|f| self.draw(f))?;

            if crossterm::event::poll(Duration::from_millis(50))?
                && self.handle_event(crossterm::event::read()?)?
            {
                break;
            }
        }

        info!("Main loop finished");
        Ok(())
    }

    /// Render one frame and remember where the canvas ended up
    pub fn draw(&mut self, f: &mut Frame) {
        let canvas_area = self.ui_renderer.render(
            f,
            &self.board,
            &self.state,
            &self.config,
            &self.categories,
            &self.keybinding_context,
        );
        self.state.canvas_area = canvas_area;
    }

    /// Handle one terminal event; returns `true` when the user asked to quit
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        let quit = match event {
            Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
                self.handle_key_event(key_event)?
            }
            Event::Mouse(mouse_event) => {
                self.handle_mouse_event(mouse_event);
                false
            }
            Event::Resize(width, height) => {
                debug!("Terminal resized to {}x{}", width, height);
                false
            }
            _ => false,
        };

        if let Some(notice) = self.board.take_notice() {
            self.state.apply_notice(notice);
        }
        Ok(quit)
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<bool> {
        // Help overlay: ? or Esc dismisses it, everything else is swallowed
        if self.state.help_visible {
            if matches!(key_event.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.toggle_help();
            }
            return Ok(false);
        }

        let action = self
            .keybinding_context
            .action_for(&self.state.mode, &key_event);

        match action {
            Some(action) => {
                debug!("Key {:?} -> {} in {}", key_event.code, action, self.state.mode);
                self.perform(action)
            }
            None => {
                if self.state.mode == AppMode::EditIdentifier {
                    self.edit_identifier_input(key_event);
                }
                Ok(false)
            }
        }
    }

    fn perform(&mut self, action: KeyAction) -> Result<bool> {
        match (self.state.mode, action) {
            (_, KeyAction::Quit) => return Ok(true),
            (_, KeyAction::Help) => self.toggle_help(),

            (AppMode::Board, KeyAction::PickNext) => self.pick_next(),
            (AppMode::Board, KeyAction::UndoPick) => self.undo_last_pick(),
            (AppMode::Board, KeyAction::ToggleScene) => {
                let scene = self.board.toggle_scene();
                self.state.drag = None;
                self.state.set_status(format!("Showing {}", scene.title()));
            }
            (AppMode::Board, KeyAction::CycleSubset) => self.cycle_subset(true),
            (AppMode::Board, KeyAction::CycleSubsetBack) => self.cycle_subset(false),
            (AppMode::Board, KeyAction::EditIdentifier) => {
                self.state.identifier_input = self.board.identifier().to_string();
                self.state.mode = AppMode::EditIdentifier;
            }
            (AppMode::Board, KeyAction::ToggleCardInfo) => {
                self.state.show_card_info = !self.state.show_card_info;
            }
            (AppMode::Board, KeyAction::Export) => self.export(),
            (AppMode::Board, KeyAction::Reset) => {
                self.state.confirm_selected = false;
                self.state.mode = AppMode::ConfirmReset;
            }
            (AppMode::Board, KeyAction::SelectNext) => self.cycle_selection(true),
            (AppMode::Board, KeyAction::SelectPrevious) => self.cycle_selection(false),
            (AppMode::Board, KeyAction::ClearSelection) => {
                self.state.selected = None;
                self.state.highlighted = None;
            }
            (AppMode::Board, nudge) => {
                if let Some(delta) = nudge_delta(nudge) {
                    self.nudge_selected(delta);
                }
            }

            (AppMode::ConfirmReset, KeyAction::Toggle) => {
                self.state.confirm_selected = !self.state.confirm_selected;
            }
            (AppMode::ConfirmReset, KeyAction::Select) => {
                if self.state.confirm_selected {
                    self.reset();
                }
                self.state.mode = AppMode::Board;
            }
            (AppMode::ConfirmReset, KeyAction::Confirm) => {
                self.reset();
                self.state.mode = AppMode::Board;
            }
            (AppMode::ConfirmReset, KeyAction::Cancel) => {
                self.state.mode = AppMode::Board;
                self.state.set_status("Reset cancelled");
            }

            (AppMode::EditIdentifier, KeyAction::Confirm) => {
                let label = self.state.identifier_input.trim().to_string();
                self.board.set_identifier(label.clone());
                self.state.mode = AppMode::Board;
                if label.is_empty() {
                    self.state.set_status("Session label cleared");
                } else {
                    self.state.set_status(format!("Session label set to '{}'", label));
                }
            }
            (AppMode::EditIdentifier, KeyAction::Cancel) => {
                self.state.mode = AppMode::Board;
            }

            (mode, action) => debug!("Ignoring {} in {}", action, mode),
        }
        Ok(false)
    }

    fn pick_next(&mut self) {
        match self.board.pick_next() {
            Some(id) => {
                let text = self
                    .board
                    .store()
                    .card(&id)
                    .map(|c| c.text.clone())
                    .unwrap_or_default();
                self.state.highlighted = None;
                self.state.selected = Some(id.clone());
                self.state.set_status(format!("Picked {}: {}", id, text));
            }
            None => self.state.set_status(format!(
                "Every card of set '{}' is already on the table",
                self.board.active_subset()
            )),
        }
    }

    fn undo_last_pick(&mut self) {
        match self.board.undo_last_pick() {
            Some(outcome) => {
                if self.state.selected.as_deref() == Some(outcome.removed.as_str()) {
                    self.state.selected = None;
                }
                self.state.highlighted = outcome.highlight;
                self.state
                    .set_status(format!("Put card {} back", outcome.removed));
            }
            None => self.state.set_status("Nothing to put back"),
        }
    }

    fn cycle_subset(&mut self, forward: bool) {
        let subset = self.board.cycle_subset(forward).clone();
        self.state.clear_focus();
        self.state.set_status(format!("Card set '{}'", subset));
    }

    fn cycle_selection(&mut self, forward: bool) {
        let ids: Vec<String> = self
            .board
            .visible_cards()
            .iter()
            .map(|c| c.id.clone())
            .collect();
        if ids.is_empty() {
            self.state.selected = None;
            return;
        }

        let current = self
            .state
            .selected
            .as_ref()
            .and_then(|id| ids.iter().position(|c| c == id));
        let next = match (current, forward) {
            (None, true) => ids.len() - 1,
            (None, false) => 0,
            (Some(i), true) => (i + 1) % ids.len(),
            (Some(i), false) => (i + ids.len() - 1) % ids.len(),
        };
        self.state.selected = Some(ids[next].clone());
    }

    /// One complete drag of the selected card
    fn nudge_selected(&mut self, delta: Delta) {
        let Some(id) = self.state.selected.clone() else {
            self.state.set_status("Select a card with Tab first");
            return;
        };
        if self.board.drag_start(&id) {
            self.board.drag_end_clamped(&id, delta);
        } else {
            self.state.selected = None;
        }
    }

    fn export(&mut self) {
        let config = &self.config;
        let result = export::export_scenes(
            &self.board,
            &self.categories,
            |scene| config.areas(scene).to_vec(),
            &self.export_dir,
            Local::now(),
        );
        match result {
            Ok(paths) => self.state.set_status(format!(
                "Exported {} files to {}",
                paths.len(),
                self.export_dir.display()
            )),
            Err(e) => {
                warn!("Export failed: {}", e);
                self.state.apply_notice(Notice::warning(format!("Export failed: {}", e)));
            }
        }
    }

    fn reset(&mut self) {
        self.board.reset();
        self.state.clear_focus();
        self.state.set_status("Board reset");
    }

    fn edit_identifier_input(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.state.identifier_input.chars().count() < UiConstants::IDENTIFIER_MAX_LEN {
                    self.state.identifier_input.push(c);
                }
            }
            KeyCode::Backspace => {
                self.state.identifier_input.pop();
            }
            _ => {}
        }
    }

    /// Handle mouse input: press picks up the top-most card, release drops it
    pub fn handle_mouse_event(&mut self, mouse_event: MouseEvent) {
        if self.state.mode != AppMode::Board || self.state.help_visible {
            return;
        }

        let geometry = CanvasGeometry::new(self.state.canvas_area, *self.board.layout());
        let (column, row) = (mouse_event.column, mouse_event.row);

        match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if !geometry.contains(column, row) {
                    return;
                }
                let point = geometry.to_pixel(column, row);
                let Some(id) = self.board.card_at(point).map(|c| c.id.clone()) else {
                    return;
                };
                if self.board.drag_start(&id) {
                    self.state.selected = Some(id.clone());
                    self.state.drag = Some(DragState::new(id, column, row));
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(drag) = self.state.drag.as_mut() {
                    drag.current = (column, row);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(mut drag) = self.state.drag.take() {
                    drag.current = (column, row);
                    let (columns, rows) = drag.offset();
                    let delta = geometry.cells_to_delta(columns, rows);
                    self.board.drag_end_clamped(&drag.card_id, delta);
                }
            }
            _ => {}
        }
    }
}

fn nudge_delta(action: KeyAction) -> Option<Delta> {
    let (small, large) = (UiConstants::NUDGE_STEP, UiConstants::NUDGE_STEP_LARGE);
    let delta = match action {
        KeyAction::NudgeUp => Delta::new(0.0, -small),
        KeyAction::NudgeDown => Delta::new(0.0, small),
        KeyAction::NudgeLeft => Delta::new(-small, 0.0),
        KeyAction::NudgeRight => Delta::new(small, 0.0),
        KeyAction::NudgeUpLarge => Delta::new(0.0, -large),
        KeyAction::NudgeDownLarge => Delta::new(0.0, large),
        KeyAction::NudgeLeftLarge => Delta::new(-large, 0.0),
        KeyAction::NudgeRightLarge => Delta::new(large, 0.0),
        _ => return None,
    };
    Some(delta)
}
