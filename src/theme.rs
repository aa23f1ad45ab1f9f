//! Centralized theme and styling for the TUI
//!
//! Single source of truth for the colors and styles used by the board,
//! its dialogs and the help overlay. Card colors come from the category
//! table at runtime and are converted here.
//!
//! # Usage
//! ```rust
//! use planboard::theme::{Colors, Styles, Theme};
//! use ratatui::style::Style;
//!
//! let style = Style::default().fg(Colors::PRIMARY);
//! let title_style = Styles::title();
//! let card_bg = Theme::hex_color("#F2F6FA");
//! ```

use ratatui::style::{Color, Modifier, Style};

use crate::board::NoticeLevel;

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// Core color palette for the application
pub struct Colors;

impl Colors {
    // -------------------------------------------------------------------------
    // Base Colors
    // -------------------------------------------------------------------------

    /// Primary dark background, used for dialogs
    pub const BG_PRIMARY: Color = Color::Rgb(20, 20, 30);

    /// Warning/danger dialog background
    pub const BG_DANGER: Color = Color::Rgb(30, 20, 20);

    /// Default foreground text color
    pub const FG_PRIMARY: Color = Color::White;

    /// Secondary/muted text color
    pub const FG_SECONDARY: Color = Color::Gray;

    /// Disabled/inactive text color
    pub const FG_MUTED: Color = Color::DarkGray;

    // -------------------------------------------------------------------------
    // Accent Colors
    // -------------------------------------------------------------------------

    /// Primary accent: borders, titles
    pub const PRIMARY: Color = Color::Cyan;

    /// Secondary accent: active tab, emphasis
    pub const SECONDARY: Color = Color::Yellow;

    // -------------------------------------------------------------------------
    // Semantic Colors
    // -------------------------------------------------------------------------

    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;

    // -------------------------------------------------------------------------
    // Board Colors
    // -------------------------------------------------------------------------

    /// Alternating background bands behind the scene areas
    pub const AREA_BAND: Color = Color::Rgb(28, 32, 44);
    pub const AREA_BAND_ALT: Color = Color::Rgb(36, 40, 54);

    /// Bottom strip carrying the session label
    pub const LABEL_STRIP: Color = Color::Rgb(16, 18, 24);

    /// Area label text
    pub const AREA_LABEL: Color = Color::Rgb(110, 118, 140);

    /// Text drawn on top of (light) card backgrounds
    pub const CARD_TEXT: Color = Color::Black;

    /// Border of the card highlighted after an undo
    pub const UNDO_HIGHLIGHT: Color = Color::LightRed;

    /// Border of the keyboard-selected card
    pub const SELECTION: Color = Color::Yellow;

    /// Selected item highlight
    pub const SELECTED_BG: Color = Color::Yellow;

    /// Selected item text (for contrast on yellow bg)
    pub const SELECTED_FG: Color = Color::Black;

    /// Navigation hint color
    pub const NAV_HINT: Color = Color::DarkGray;
}

// =============================================================================
// PRE-BUILT STYLES
// =============================================================================

/// Pre-built styles for common UI patterns
pub struct Styles;

impl Styles {
    pub fn text() -> Style {
        Style::default().fg(Colors::FG_PRIMARY)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(Colors::FG_SECONDARY)
    }

    /// Main title style (cyan, bold)
    pub fn title() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_active() -> Style {
        Style::default().fg(Colors::PRIMARY)
    }

    pub fn panel_bg() -> Style {
        Style::default().bg(Colors::BG_PRIMARY)
    }

    pub fn panel_bg_danger() -> Style {
        Style::default().bg(Colors::BG_DANGER)
    }

    /// Active scene tab
    pub fn tab_active() -> Style {
        Style::default()
            .fg(Colors::SELECTED_FG)
            .bg(Colors::SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive() -> Style {
        Style::default().fg(Colors::FG_SECONDARY)
    }

    pub fn area_label() -> Style {
        Style::default()
            .fg(Colors::AREA_LABEL)
            .add_modifier(Modifier::BOLD)
    }

    /// Active/selected button
    pub fn button_active() -> Style {
        Style::default()
            .fg(Colors::SELECTED_FG)
            .bg(Colors::FG_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn button_inactive() -> Style {
        Style::default().fg(Colors::FG_PRIMARY)
    }

    /// Danger button (selected)
    pub fn button_danger() -> Style {
        Style::default()
            .fg(Colors::FG_PRIMARY)
            .bg(Colors::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    /// Key label in the navigation bar
    pub fn nav_key() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn nav_hint() -> Style {
        Style::default().fg(Colors::NAV_HINT)
    }
}

// =============================================================================
// THEME CONTEXT
// =============================================================================

/// Theme context providing semantic style lookups
pub struct Theme;

impl Theme {
    /// Style for a status-line notice
    pub fn notice_style(level: NoticeLevel) -> Style {
        match level {
            NoticeLevel::Info => Style::default().fg(Colors::SUCCESS),
            NoticeLevel::Warning => Style::default()
                .fg(Colors::WARNING)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Parse `#RRGGBB` or `#RGB` into a terminal color
    pub fn hex_color(hex: &str) -> Option<Color> {
        let digits = hex.trim().strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => {
                let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
                let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
                let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
                Some(Color::Rgb(r, g, b))
            }
            3 => {
                let mut channels = digits.chars().map(|c| {
                    let v = c.to_digit(16).unwrap_or(0) as u8;
                    v * 17
                });
                Some(Color::Rgb(
                    channels.next()?,
                    channels.next()?,
                    channels.next()?,
                ))
            }
            _ => None,
        }
    }

    /// Card body style from a category background color
    pub fn card_style(background: &str) -> Style {
        Style::default()
            .fg(Colors::CARD_TEXT)
            .bg(Self::hex_color(background).unwrap_or(Colors::FG_SECONDARY))
    }

    /// Card border style; selection wins over the undo highlight, which wins
    /// over the category border color
    pub fn card_border_style(border: &str, selected: bool, highlighted: bool) -> Style {
        if selected {
            Style::default()
                .fg(Colors::SELECTION)
                .add_modifier(Modifier::BOLD)
        } else if highlighted {
            Style::default()
                .fg(Colors::UNDO_HIGHLIGHT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Self::hex_color(border).unwrap_or(Colors::FG_MUTED))
        }
    }

    /// Band background for the n-th area of a scene
    pub fn area_band(index: usize) -> Color {
        if index % 2 == 0 {
            Colors::AREA_BAND
        } else {
            Colors::AREA_BAND_ALT
        }
    }
}

// =============================================================================
// UI CONSTANTS
// =============================================================================

/// UI dimension and layout constants
pub struct UiConstants;

impl UiConstants {
    /// Header height (scene tabs and session summary)
    pub const HEADER_HEIGHT: u16 = 3;

    /// Status line height
    pub const STATUS_HEIGHT: u16 = 1;

    /// Nav bar height
    pub const NAV_BAR_HEIGHT: u16 = 1;

    /// Rows of the bottom strip showing the session label
    pub const LABEL_STRIP_HEIGHT: u16 = 1;

    /// Smallest card drawn, in cells
    pub const MIN_CARD_WIDTH: u16 = 6;
    pub const MIN_CARD_HEIGHT: u16 = 3;

    /// Identifier input dialog width
    pub const INPUT_DIALOG_WIDTH: u16 = 50;

    /// Maximum identifier length accepted from the keyboard
    pub const IDENTIFIER_MAX_LEN: usize = 64;

    /// Keyboard nudge steps in canvas pixels
    pub const NUDGE_STEP: f64 = 10.0;
    pub const NUDGE_STEP_LARGE: f64 = 50.0;
}

// =============================================================================
// TEXT CONSTANTS
// =============================================================================

/// Common UI text strings
pub struct UiText;

impl UiText {
    pub const APP_TITLE: &'static str = " Planboard ";
    pub const BTN_RESET: &'static str = "[ Reset board ]";
    pub const BTN_CANCEL: &'static str = "[ Cancel ]";
    pub const RESET_WARNING: &'static str =
        "This removes every placement, the stacking order and the session label.";
    pub const IDENTIFIER_PROMPT: &'static str = "Session label";
    pub const NO_LABEL: &'static str = "(no label)";
    pub const EMPTY_SUBSET: &'static str = "No cards picked yet. Press f to pick one.";
}
