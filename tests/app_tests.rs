//! Tests for the Interactive Application
//!
//! Drives [`App`] with synthetic terminal events and renders it into a
//! ratatui test backend.
//!
//! These tests verify:
//! - AppState default initialization
//! - Key dispatch for picking, undo, scene toggle, reset and label editing
//! - Mouse drags translated from cells into canvas pixels
//! - Frame rendering

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use planboard::app::{App, AppMode, AppState};
use planboard::board::{Board, NoticeLevel};
use planboard::catalog::{Catalog, Categories};
use planboard::config_file::{BoardConfig, CanvasLayout};
use planboard::persistence::{KeyValueStore, MemoryStore, IDENTIFIER_KEY};
use planboard::types::{Position, SceneId};
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tempfile::TempDir;

fn test_app(export_dir: &std::path::Path) -> App<MemoryStore> {
    let board = Board::open(
        Catalog::builtin().unwrap(),
        CanvasLayout::default(),
        MemoryStore::new(),
    );
    App::new(
        board,
        BoardConfig::default(),
        Categories::builtin().unwrap(),
        export_dir.to_path_buf(),
    )
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn press(app: &mut App<MemoryStore>, code: KeyCode) -> bool {
    app.handle_event(key(code)).unwrap()
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

// =============================================================================
// AppState Default Tests
// =============================================================================

#[test]
fn test_app_state_default_mode_is_board() {
    let state = AppState::default();
    assert_eq!(state.mode, AppMode::Board);
    assert!(!state.help_visible);
    assert!(state.selected.is_none());
    assert!(state.drag.is_none());
}

#[test]
fn test_app_state_default_has_hint_message() {
    let state = AppState::default();
    assert!(state.status_message.contains("pick"));
    assert_eq!(state.status_level, NoticeLevel::Info);
}

#[test]
fn test_app_mode_display() {
    assert_eq!(AppMode::Board.to_string(), "Board");
    assert_eq!(AppMode::ConfirmReset.to_string(), "Reset Confirmation");
    assert_eq!(AppMode::EditIdentifier.to_string(), "Session Label");
}

// =============================================================================
// Key Dispatch Tests
// =============================================================================

#[test]
fn test_f_picks_and_selects_next_card() {
    let dir = TempDir::new().unwrap();
    let mut app = test_app(dir.path());

    press(&mut app, KeyCode::Char('f'));

    assert_eq!(app.board().picked_count(), 1);
    assert_eq!(app.state().selected.as_deref(), Some("101"));
    assert!(app.state().status_message.contains("101"));
}

#[test]
fn test_d_puts_last_card_back_and_highlights_previous() {
    let dir = TempDir::new().unwrap();
    let mut app = test_app(dir.path());

    press(&mut app, KeyCode::Char('f'));
    press(&mut app, KeyCode::Char('f'));
    press(&mut app, KeyCode::Char('d'));

    assert_eq!(app.board().picked_count(), 1);
    assert_eq!(app.state().highlighted.as_deref(), Some("101"));
    assert!(app.state().selected.is_none());
}

#[test]
fn test_g_toggles_scene() {
    let dir = TempDir::new().unwrap();
    let mut app = test_app(dir.path());

    press(&mut app, KeyCode::Char('g'));
    assert_eq!(app.board().active_scene(), SceneId::Two);
    press(&mut app, KeyCode::Char('g'));
    assert_eq!(app.board().active_scene(), SceneId::One);
}

#[test]
fn test_arrow_nudges_selected_card() {
    let dir = TempDir::new().unwrap();
    let mut app = test_app(dir.path());

    press(&mut app, KeyCode::Char('f'));
    press(&mut app, KeyCode::Left);

    assert_eq!(app.board().position("101"), Some(Position::new(480.0, 710.0)));
}

#[test]
fn test_reset_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    let mut app = test_app(dir.path());
    press(&mut app, KeyCode::Char('f'));

    press(&mut app, KeyCode::Char('r'));
    assert_eq!(app.state().mode, AppMode::ConfirmReset);
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.state().mode, AppMode::Board);
    assert_eq!(app.board().picked_count(), 1);

    // Enter on the default (Cancel) button keeps the board
    press(&mut app, KeyCode::Char('r'));
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.board().picked_count(), 1);

    press(&mut app, KeyCode::Char('r'));
    press(&mut app, KeyCode::Char('y'));
    assert_eq!(app.state().mode, AppMode::Board);
    assert_eq!(app.board().picked_count(), 0);
}

#[test]
fn test_identifier_dialog_sets_label() {
    let dir = TempDir::new().unwrap();
    let mut app = test_app(dir.path());

    press(&mut app, KeyCode::Char('i'));
    assert_eq!(app.state().mode, AppMode::EditIdentifier);

    // Letters that are shortcuts on the board are plain text here
    for c in "fog q".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    press(&mut app, KeyCode::Backspace);
    press(&mut app, KeyCode::Char('x'));
    let quit = press(&mut app, KeyCode::Enter);

    assert!(!quit);
    assert_eq!(app.state().mode, AppMode::Board);
    assert_eq!(app.board().identifier(), "fog x");
    assert_eq!(app.board().picked_count(), 0);
    assert_eq!(
        app.board().storage().get(IDENTIFIER_KEY).unwrap().as_deref(),
        Some("fog x")
    );
}

#[test]
fn test_help_overlay_swallows_keys() {
    let dir = TempDir::new().unwrap();
    let mut app = test_app(dir.path());

    press(&mut app, KeyCode::Char('?'));
    assert!(app.state().help_visible);
    press(&mut app, KeyCode::Char('f'));
    assert_eq!(app.board().picked_count(), 0);
    press(&mut app, KeyCode::Esc);
    assert!(!app.state().help_visible);
}

#[test]
fn test_q_quits() {
    let dir = TempDir::new().unwrap();
    let mut app = test_app(dir.path());
    assert!(press(&mut app, KeyCode::Char('q')));
    assert!(app
        .handle_event(Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)))
        .unwrap());
}

#[test]
fn test_key_release_is_ignored() {
    let dir = TempDir::new().unwrap();
    let mut app = test_app(dir.path());
    let mut release = KeyEvent::new(KeyCode::Char('f'), KeyModifiers::NONE);
    release.kind = KeyEventKind::Release;

    app.handle_event(Event::Key(release)).unwrap();
    assert_eq!(app.board().picked_count(), 0);
}

#[test]
fn test_export_writes_into_export_dir() {
    let dir = TempDir::new().unwrap();
    let mut app = test_app(dir.path());
    press(&mut app, KeyCode::Char('f'));
    press(&mut app, KeyCode::Char('e'));

    let files = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(files, 2);
    assert!(app.state().status_message.starts_with("Exported 2 files"));
}

#[test]
fn test_storage_failure_surfaces_as_warning() {
    let dir = TempDir::new().unwrap();
    let mut app = test_app(dir.path());
    app.board_mut().storage_mut().set_fail_writes(true);

    press(&mut app, KeyCode::Char('f'));

    assert_eq!(app.board().picked_count(), 1);
    assert_eq!(app.state().status_level, NoticeLevel::Warning);
    assert!(app.state().status_message.contains("not being saved"));
}

// =============================================================================
// Mouse Tests
// =============================================================================

#[test]
fn test_mouse_drag_moves_card() {
    let dir = TempDir::new().unwrap();
    let mut app = test_app(dir.path());
    // 120x40 cells over a 1200x800 canvas: 10x20 pixels per cell
    app.state_mut().canvas_area = Rect::new(0, 3, 120, 40);
    press(&mut app, KeyCode::Char('f'));
    press(&mut app, KeyCode::Char('f'));

    // 101 and 102 both sit at (490, 710); the later one is painted on top
    app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 55, 40))
        .unwrap();
    let grabbed = app.state().drag.as_ref().map(|d| d.card_id.clone()).unwrap();
    assert_eq!(grabbed, "102");

    app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 52, 35))
        .unwrap();
    app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 50, 30))
        .unwrap();

    assert!(app.state().drag.is_none());
    assert_eq!(app.board().position(&grabbed), Some(Position::new(440.0, 510.0)));
    let top = app.board().visible_cards().last().map(|c| c.id.clone());
    assert_eq!(top, Some(grabbed));
}

#[test]
fn test_mouse_outside_canvas_is_ignored() {
    let dir = TempDir::new().unwrap();
    let mut app = test_app(dir.path());
    app.state_mut().canvas_area = Rect::new(0, 3, 120, 40);
    press(&mut app, KeyCode::Char('f'));

    app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 55, 1))
        .unwrap();
    assert!(app.state().drag.is_none());
}

// =============================================================================
// Rendering Tests
// =============================================================================

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    buffer
        .content()
        .chunks(buffer.area.width as usize)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_draw_renders_scene_and_records_canvas_area() {
    let dir = TempDir::new().unwrap();
    let mut app = test_app(dir.path());
    press(&mut app, KeyCode::Char('f'));

    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
    terminal.draw(|f| app.draw(f)).unwrap();

    let text = buffer_text(&terminal);
    assert!(text.contains("Table 1"));
    assert!(text.contains("Bread"));
    let area = app.state().canvas_area;
    assert!(area.width > 0 && area.height > 0);
    assert!(area.y >= 3);
}

#[test]
fn test_draw_shows_reset_dialog() {
    let dir = TempDir::new().unwrap();
    let mut app = test_app(dir.path());
    press(&mut app, KeyCode::Char('r'));

    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
    terminal.draw(|f| app.draw(f)).unwrap();

    assert!(buffer_text(&terminal).contains("Reset"));
}
