//! Keybinding system for context-aware keyboard shortcuts
//!
//! Provides a registry of keybindings that change based on the current
//! application mode. The same registry drives key dispatch, the navigation
//! bar and the help overlay, so the three can never disagree.

use crate::app::AppMode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use strum::Display;

/// Actions that can be triggered by keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum KeyAction {
    PickNext,
    UndoPick,
    ToggleScene,
    CycleSubset,
    CycleSubsetBack,
    EditIdentifier,
    ToggleCardInfo,
    Export,
    Reset,
    SelectNext,
    SelectPrevious,
    ClearSelection,
    NudgeUp,
    NudgeDown,
    NudgeLeft,
    NudgeRight,
    NudgeUpLarge,
    NudgeDownLarge,
    NudgeLeftLarge,
    NudgeRightLarge,
    Toggle,
    Select,
    Confirm,
    Cancel,
    Help,
    Quit,
}

/// A keybinding definition
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: KeyAction,
    pub display: String,
    pub description: String,
}

impl Keybinding {
    /// Create a new keybinding with no modifiers
    pub fn new(key: KeyCode, action: KeyAction, display: &str, description: &str) -> Self {
        Self::with_modifiers(key, KeyModifiers::NONE, action, display, description)
    }

    /// Create a keybinding with modifiers
    pub fn with_modifiers(
        key: KeyCode,
        modifiers: KeyModifiers,
        action: KeyAction,
        display: &str,
        description: &str,
    ) -> Self {
        Self {
            key,
            modifiers,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    /// Whether a key event triggers this binding.
    ///
    /// Shift is ignored for characters since terminals report `?` as
    /// Shift+`?` on some layouts and plain `?` on others.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let modifiers = match event.code {
            KeyCode::Char(_) | KeyCode::BackTab => event.modifiers.difference(KeyModifiers::SHIFT),
            _ => event.modifiers,
        };
        self.key == event.code && self.modifiers == modifiers
    }
}

/// Context-aware keybinding registry
pub struct KeybindingContext {
    /// Mode-specific keybindings
    mode_bindings: HashMap<AppMode, Vec<Keybinding>>,
    /// Global keybindings (available in all modes but text input)
    global_bindings: Vec<Keybinding>,
}

impl Default for KeybindingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingContext {
    /// Create a new keybinding context with default bindings
    pub fn new() -> Self {
        let mut ctx = Self {
            mode_bindings: HashMap::new(),
            global_bindings: Vec::new(),
        };
        ctx.register_defaults();
        ctx
    }

    fn register_defaults(&mut self) {
        self.global_bindings = vec![
            Keybinding::new(KeyCode::Char('?'), KeyAction::Help, "?", "Help"),
            Keybinding::new(KeyCode::Char('q'), KeyAction::Quit, "Q", "Quit"),
            Keybinding::with_modifiers(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
                KeyAction::Quit,
                "Ctrl+C",
                "Quit",
            ),
        ];

        let shift = KeyModifiers::SHIFT;
        self.mode_bindings.insert(
            AppMode::Board,
            vec![
                Keybinding::new(KeyCode::Char('f'), KeyAction::PickNext, "F", "Pick next card"),
                Keybinding::new(KeyCode::Char('d'), KeyAction::UndoPick, "D", "Put last card back"),
                Keybinding::new(KeyCode::Char('g'), KeyAction::ToggleScene, "G", "Switch table"),
                Keybinding::new(KeyCode::Char('s'), KeyAction::CycleSubset, "S", "Next card set"),
                Keybinding::new(KeyCode::Char('S'), KeyAction::CycleSubsetBack, "Shift+S", "Previous card set"),
                Keybinding::new(KeyCode::Char('i'), KeyAction::EditIdentifier, "I", "Edit session label"),
                Keybinding::new(KeyCode::Char('t'), KeyAction::ToggleCardInfo, "T", "Toggle card info"),
                Keybinding::new(KeyCode::Char('e'), KeyAction::Export, "E", "Export layout"),
                Keybinding::new(KeyCode::Char('r'), KeyAction::Reset, "R", "Reset board"),
                Keybinding::new(KeyCode::Tab, KeyAction::SelectNext, "Tab", "Select next card"),
                Keybinding::new(KeyCode::BackTab, KeyAction::SelectPrevious, "Shift+Tab", "Select previous card"),
                Keybinding::new(KeyCode::Esc, KeyAction::ClearSelection, "Esc", "Clear selection"),
                Keybinding::new(KeyCode::Up, KeyAction::NudgeUp, "Arrows", "Move selected card"),
                Keybinding::new(KeyCode::Down, KeyAction::NudgeDown, "Arrows", "Move selected card"),
                Keybinding::new(KeyCode::Left, KeyAction::NudgeLeft, "Arrows", "Move selected card"),
                Keybinding::new(KeyCode::Right, KeyAction::NudgeRight, "Arrows", "Move selected card"),
                Keybinding::with_modifiers(KeyCode::Up, shift, KeyAction::NudgeUpLarge, "Shift+Arrows", "Move selected card further"),
                Keybinding::with_modifiers(KeyCode::Down, shift, KeyAction::NudgeDownLarge, "Shift+Arrows", "Move selected card further"),
                Keybinding::with_modifiers(KeyCode::Left, shift, KeyAction::NudgeLeftLarge, "Shift+Arrows", "Move selected card further"),
                Keybinding::with_modifiers(KeyCode::Right, shift, KeyAction::NudgeRightLarge, "Shift+Arrows", "Move selected card further"),
            ],
        );

        self.mode_bindings.insert(
            AppMode::ConfirmReset,
            vec![
                Keybinding::new(KeyCode::Left, KeyAction::Toggle, "Left", "Toggle selection"),
                Keybinding::new(KeyCode::Right, KeyAction::Toggle, "Right", "Toggle selection"),
                Keybinding::new(KeyCode::Tab, KeyAction::Toggle, "Tab", "Toggle selection"),
                Keybinding::new(KeyCode::Enter, KeyAction::Select, "Enter", "Choose highlighted button"),
                Keybinding::new(KeyCode::Char('y'), KeyAction::Confirm, "Y", "Reset now"),
                Keybinding::new(KeyCode::Char('n'), KeyAction::Cancel, "N", "Keep board"),
                Keybinding::new(KeyCode::Esc, KeyAction::Cancel, "Esc", "Cancel"),
            ],
        );

        self.mode_bindings.insert(
            AppMode::EditIdentifier,
            vec![
                Keybinding::new(KeyCode::Enter, KeyAction::Confirm, "Enter", "Save label"),
                Keybinding::new(KeyCode::Esc, KeyAction::Cancel, "Esc", "Cancel"),
            ],
        );
    }

    /// Get keybindings for a specific mode (includes global bindings)
    pub fn get_bindings(&self, mode: &AppMode) -> Vec<&Keybinding> {
        let mut bindings: Vec<&Keybinding> = Vec::new();

        if let Some(mode_bindings) = self.mode_bindings.get(mode) {
            bindings.extend(mode_bindings.iter());
        }

        // Typing a label must not trigger shortcuts
        if *mode != AppMode::EditIdentifier {
            bindings.extend(self.global_bindings.iter());
        }

        bindings
    }

    /// Resolve a key event to an action in the given mode
    pub fn action_for(&self, mode: &AppMode, event: &KeyEvent) -> Option<KeyAction> {
        self.get_bindings(mode)
            .into_iter()
            .find(|b| b.matches(event))
            .map(|b| b.action)
    }

    /// Get navigation bar items for display
    pub fn get_nav_items(&self, mode: &AppMode) -> Vec<NavBarItem> {
        let bindings = self.get_bindings(mode);

        let priority_actions = match mode {
            AppMode::Board => vec![
                KeyAction::PickNext,
                KeyAction::UndoPick,
                KeyAction::ToggleScene,
                KeyAction::CycleSubset,
                KeyAction::NudgeUp,
                KeyAction::Export,
                KeyAction::Help,
                KeyAction::Quit,
            ],
            AppMode::ConfirmReset => vec![
                KeyAction::Toggle,
                KeyAction::Select,
                KeyAction::Confirm,
                KeyAction::Cancel,
            ],
            AppMode::EditIdentifier => vec![KeyAction::Confirm, KeyAction::Cancel],
        };

        let mut items: Vec<NavBarItem> = Vec::new();
        for action in priority_actions {
            if let Some(binding) = bindings.iter().find(|b| b.action == action) {
                let item = NavBarItem {
                    key_display: binding.display.clone(),
                    action_label: short_label(action, &binding.description),
                };
                if !items.contains(&item) {
                    items.push(item);
                }
            }
        }

        items
    }

    /// Get full help content for a mode (for help overlay)
    pub fn get_help_content(&self, mode: &AppMode) -> Vec<HelpSection> {
        let groups: [(&str, fn(KeyAction) -> bool); 5] = [
            ("Cards", |a| {
                matches!(
                    a,
                    KeyAction::PickNext | KeyAction::UndoPick | KeyAction::ToggleCardInfo
                )
            }),
            ("Board", |a| {
                matches!(
                    a,
                    KeyAction::ToggleScene
                        | KeyAction::CycleSubset
                        | KeyAction::CycleSubsetBack
                        | KeyAction::EditIdentifier
                        | KeyAction::Export
                        | KeyAction::Reset
                )
            }),
            ("Moving cards", |a| {
                matches!(
                    a,
                    KeyAction::SelectNext
                        | KeyAction::SelectPrevious
                        | KeyAction::ClearSelection
                        | KeyAction::NudgeUp
                        | KeyAction::NudgeDown
                        | KeyAction::NudgeLeft
                        | KeyAction::NudgeRight
                        | KeyAction::NudgeUpLarge
                        | KeyAction::NudgeDownLarge
                        | KeyAction::NudgeLeftLarge
                        | KeyAction::NudgeRightLarge
                )
            }),
            ("Dialog", |a| {
                matches!(
                    a,
                    KeyAction::Toggle | KeyAction::Select | KeyAction::Confirm | KeyAction::Cancel
                )
            }),
            ("General", |a| matches!(a, KeyAction::Help | KeyAction::Quit)),
        ];

        let bindings = self.get_bindings(mode);
        let mut sections = Vec::new();
        for (title, belongs) in groups {
            let mut items: Vec<(String, String)> = Vec::new();
            for binding in bindings.iter().filter(|b| belongs(b.action)) {
                let item = (binding.display.clone(), binding.description.clone());
                if !items.contains(&item) {
                    items.push(item);
                }
            }
            if !items.is_empty() {
                sections.push(HelpSection {
                    title: title.to_string(),
                    items,
                });
            }
        }

        if *mode == AppMode::Board {
            sections.push(HelpSection {
                title: "Mouse".to_string(),
                items: vec![("Drag".to_string(), "Move a card; it comes to the front".to_string())],
            });
        }

        sections
    }
}

fn short_label(action: KeyAction, description: &str) -> String {
    match action {
        KeyAction::PickNext => "Pick".to_string(),
        KeyAction::UndoPick => "Undo".to_string(),
        KeyAction::ToggleScene => "Table".to_string(),
        KeyAction::CycleSubset => "Set".to_string(),
        KeyAction::NudgeUp => "Move".to_string(),
        KeyAction::Export => "Export".to_string(),
        _ => description.to_string(),
    }
}

/// Navigation bar item for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBarItem {
    pub key_display: String,
    pub action_label: String,
}

/// Help section for the help overlay
#[derive(Debug, Clone)]
pub struct HelpSection {
    pub title: String,
    pub items: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_board_shortcuts_resolve() {
        let ctx = KeybindingContext::new();
        let board = AppMode::Board;
        assert_eq!(ctx.action_for(&board, &key(KeyCode::Char('f'))), Some(KeyAction::PickNext));
        assert_eq!(ctx.action_for(&board, &key(KeyCode::Char('d'))), Some(KeyAction::UndoPick));
        assert_eq!(ctx.action_for(&board, &key(KeyCode::Char('g'))), Some(KeyAction::ToggleScene));
        assert_eq!(ctx.action_for(&board, &key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_shifted_question_mark_opens_help() {
        let ctx = KeybindingContext::new();
        let event = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT);
        assert_eq!(ctx.action_for(&AppMode::Board, &event), Some(KeyAction::Help));
    }

    #[test]
    fn test_shift_arrow_is_large_nudge() {
        let ctx = KeybindingContext::new();
        let event = KeyEvent::new(KeyCode::Left, KeyModifiers::SHIFT);
        assert_eq!(ctx.action_for(&AppMode::Board, &event), Some(KeyAction::NudgeLeftLarge));
        assert_eq!(
            ctx.action_for(&AppMode::Board, &key(KeyCode::Left)),
            Some(KeyAction::NudgeLeft)
        );
    }

    #[test]
    fn test_text_input_suppresses_shortcuts() {
        let ctx = KeybindingContext::new();
        let mode = AppMode::EditIdentifier;
        assert_eq!(ctx.action_for(&mode, &key(KeyCode::Char('f'))), None);
        assert_eq!(ctx.action_for(&mode, &key(KeyCode::Char('q'))), None);
        assert_eq!(ctx.action_for(&mode, &key(KeyCode::Enter)), Some(KeyAction::Confirm));
    }

    #[test]
    fn test_nav_items_are_deduplicated() {
        let ctx = KeybindingContext::new();
        let items = ctx.get_nav_items(&AppMode::Board);
        assert_eq!(items[0].key_display, "F");
        assert_eq!(items.iter().filter(|i| i.key_display == "Arrows").count(), 1);
    }

    #[test]
    fn test_help_has_mouse_section_on_board_only() {
        let ctx = KeybindingContext::new();
        let board = ctx.get_help_content(&AppMode::Board);
        assert!(board.iter().any(|s| s.title == "Mouse"));
        let dialog = ctx.get_help_content(&AppMode::ConfirmReset);
        assert!(!dialog.iter().any(|s| s.title == "Mouse"));
    }
}
