/// Viewer commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleDebug,
    ToggleViewMode,
    ToggleDrawing,
    DeleteSelected,
    DuplicateSelected,
    Save,
    Export,
    AllOffExceptDaylight,
    PresetAll,
    StopEditing,
}

/// Map a `KeyboardEvent.key` plus the Ctrl/Cmd state to a command.
#[inline]
pub fn command_for_key(key: &str, ctrl: bool) -> Option<Command> {
    if ctrl {
        return match key {
            "d" | "D" => Some(Command::DuplicateSelected),
            "s" | "S" => Some(Command::Save),
            "e" | "E" => Some(Command::Export),
            _ => None,
        };
    }
    match key {
        "d" | "D" => Some(Command::ToggleDebug),
        "v" | "V" => Some(Command::ToggleViewMode),
        "p" | "P" => Some(Command::ToggleDrawing),
        "Delete" | "Backspace" => Some(Command::DeleteSelected),
        "o" | "O" => Some(Command::AllOffExceptDaylight),
        "a" | "A" => Some(Command::PresetAll),
        "Escape" => Some(Command::StopEditing),
        _ => None,
    }
}

/// Commands that only make sense while editing hotspots.
#[inline]
pub fn needs_debug(cmd: Command) -> bool {
    matches!(
        cmd,
        Command::ToggleDrawing | Command::DeleteSelected | Command::DuplicateSelected
    )
}
