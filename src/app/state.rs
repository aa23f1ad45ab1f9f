//! Application state definitions
//!
//! Presentation-only state: which dialog is open, which card is selected or
//! highlighted, and the drag in progress. Everything that must survive a
//! restart lives in the [`Board`](crate::board::Board) instead.

use ratatui::layout::Rect;
use strum::Display;

use crate::board::{Notice, NoticeLevel};

/// Application operating modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum AppMode {
    /// Board view: picking, dragging, scene and subset switching
    #[default]
    #[strum(to_string = "Board")]
    Board,
    /// Confirmation dialog before wiping the board
    #[strum(to_string = "Reset Confirmation")]
    ConfirmReset,
    /// Text input for the session label
    #[strum(to_string = "Session Label")]
    EditIdentifier,
}

/// Mouse drag in progress, tracked in terminal cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragState {
    pub card_id: String,
    pub start: (u16, u16),
    pub current: (u16, u16),
}

impl DragState {
    pub fn new(card_id: impl Into<String>, column: u16, row: u16) -> Self {
        Self {
            card_id: card_id.into(),
            start: (column, row),
            current: (column, row),
        }
    }

    /// Cell offset between the press and the current pointer
    pub fn offset(&self) -> (i32, i32) {
        (
            self.current.0 as i32 - self.start.0 as i32,
            self.current.1 as i32 - self.start.1 as i32,
        )
    }
}

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Current application mode
    pub mode: AppMode,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Draw id and category on every card
    pub show_card_info: bool,
    /// Card targeted by keyboard nudges
    pub selected: Option<String>,
    /// Card highlighted after an undo
    pub highlighted: Option<String>,
    /// Drag in progress
    pub drag: Option<DragState>,
    /// Buffer of the session label dialog
    pub identifier_input: String,
    /// Reset dialog button (true = "Reset board")
    pub confirm_selected: bool,
    /// Status message for user feedback
    pub status_message: String,
    pub status_level: NoticeLevel,
    /// Screen area of the canvas as of the last frame
    pub canvas_area: Rect,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Board,
            help_visible: false,
            show_card_info: false,
            selected: None,
            highlighted: None,
            drag: None,
            identifier_input: String::new(),
            confirm_selected: false,
            status_message: "Press f to pick a card, ? for help".to_string(),
            status_level: NoticeLevel::Info,
            canvas_area: Rect::default(),
        }
    }
}

impl AppState {
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_level = NoticeLevel::Info;
    }

    pub fn apply_notice(&mut self, notice: Notice) {
        self.status_message = notice.message;
        self.status_level = notice.level;
    }

    /// Forget selection, highlight and drag (after scene/subset changes)
    pub fn clear_focus(&mut self) {
        self.selected = None;
        self.highlighted = None;
        self.drag = None;
    }
}
