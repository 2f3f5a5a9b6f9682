// Host-side tests for the keyboard command map.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod keymap {
    include!("../src/keymap.rs");
}

use keymap::*;

#[test]
fn plain_keys_map_to_viewer_commands() {
    assert_eq!(command_for_key("d", false), Some(Command::ToggleDebug));
    assert_eq!(command_for_key("V", false), Some(Command::ToggleViewMode));
    assert_eq!(command_for_key("p", false), Some(Command::ToggleDrawing));
    assert_eq!(command_for_key("Delete", false), Some(Command::DeleteSelected));
    assert_eq!(command_for_key("Backspace", false), Some(Command::DeleteSelected));
    assert_eq!(command_for_key("o", false), Some(Command::AllOffExceptDaylight));
    assert_eq!(command_for_key("a", false), Some(Command::PresetAll));
    assert_eq!(command_for_key("Escape", false), Some(Command::StopEditing));
    assert_eq!(command_for_key("x", false), None);
}

#[test]
fn ctrl_chords_override_plain_keys() {
    assert_eq!(command_for_key("d", true), Some(Command::DuplicateSelected));
    assert_eq!(command_for_key("S", true), Some(Command::Save));
    assert_eq!(command_for_key("e", true), Some(Command::Export));
    assert_eq!(command_for_key("v", true), None);
    assert_eq!(command_for_key("Escape", true), None);
}

#[test]
fn only_hotspot_edits_need_debug() {
    assert!(needs_debug(Command::ToggleDrawing));
    assert!(needs_debug(Command::DeleteSelected));
    assert!(needs_debug(Command::DuplicateSelected));
    assert!(!needs_debug(Command::ToggleDebug));
    assert!(!needs_debug(Command::ToggleViewMode));
    assert!(!needs_debug(Command::Save));
}
