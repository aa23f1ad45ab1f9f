//! Reusable UI components
//!
//! - `keybindings` - mode-aware key registry (dispatch, nav bar, help)
//! - `help_overlay` - floating help window

pub mod help_overlay;
pub mod keybindings;

use ratatui::layout::Rect;

/// Rectangle of at most `width` x `height` centered in `parent`
pub fn centered_rect(parent: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(parent.width);
    let height = height.min(parent.height);
    Rect::new(
        parent.x + (parent.width - width) / 2,
        parent.y + (parent.height - height) / 2,
        width,
        height,
    )
}
