use crossterm::event::KeyCode;

use crate::market::generator::Regime;

/// Capacity step applied by the +/- keys, mirroring the window-size spinner
/// of the desktop build this replaced.
pub const CAPACITY_STEP: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    ToggleFeed,
    ToggleTheme,
    ToggleBench,
    CapacityUp,
    CapacityDown,
    ResetGenerator,
    ClearWindow,
    ForceRegime(Regime),
}

pub fn parse_main_command(key_code: &KeyCode) -> Option<UiCommand> {
    match key_code {
        KeyCode::Char('+') | KeyCode::Char('=') => Some(UiCommand::CapacityUp),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(UiCommand::CapacityDown),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            's' => Some(UiCommand::ToggleFeed),
            't' => Some(UiCommand::ToggleTheme),
            'b' => Some(UiCommand::ToggleBench),
            'r' => Some(UiCommand::ResetGenerator),
            'c' => Some(UiCommand::ClearWindow),
            'u' => Some(UiCommand::ForceRegime(Regime::Upward)),
            'd' => Some(UiCommand::ForceRegime(Regime::Downward)),
            'f' => Some(UiCommand::ForceRegime(Regime::Flat)),
            _ => None,
        },
        _ => None,
    }
}
