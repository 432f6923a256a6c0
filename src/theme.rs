use crate::{console::Tone, machine::MachineState};
use ratatui::style::{Color, Modifier, Style};

// Deep blue ocean palette, terminal edition

// Text colors
pub const TEXT_PRIMARY: Color = Color::Rgb(137, 207, 240); // #89CFF0 - Baby mint blue
pub const TEXT_SECONDARY: Color = Color::Rgb(48, 213, 200); // #30D5C8 - Turquoise mint
pub const TEXT_MUTED: Color = Color::Rgb(98, 114, 164); // #6272A4 - Grey-blue

// Status colors
pub const STATUS_RUNNING: Color = Color::Rgb(80, 250, 123); // #50FA7B - Green
pub const STATUS_STOPPED: Color = Color::Rgb(255, 85, 85); // #FF5555 - Red
pub const STATUS_WARNING: Color = Color::Rgb(241, 250, 140); // #F1FA8C - Yellow
pub const STATUS_UNKNOWN: Color = Color::Rgb(98, 114, 164); // #6272A4 - Grey-blue

// Border & selection
pub const BORDER_DEFAULT: Color = Color::Rgb(36, 55, 95); // #24375F - Subtle blue
pub const BORDER_FOCUS: Color = Color::Rgb(48, 213, 200); // #30D5C8 - Turquoise focus
pub const SELECTION_BG: Color = Color::Rgb(26, 67, 191); // #1A43BF - Deep blue

pub fn state_style(state: MachineState) -> Style {
    let color = match state {
        MachineState::Running => STATUS_RUNNING,
        MachineState::ShutOff => STATUS_STOPPED,
        MachineState::Unknown => STATUS_UNKNOWN,
    };
    Style::default().fg(color)
}

pub fn tone_style(tone: Tone) -> Style {
    let color = match tone {
        Tone::Info => TEXT_SECONDARY,
        Tone::Success => STATUS_RUNNING,
        Tone::Warning => STATUS_WARNING,
        Tone::Error => STATUS_STOPPED,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub fn title() -> Style {
    Style::default().fg(TEXT_SECONDARY).add_modifier(Modifier::BOLD)
}

pub fn column_header() -> Style {
    Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn border() -> Style {
    Style::default().fg(BORDER_DEFAULT)
}

pub fn border_focus() -> Style {
    Style::default().fg(BORDER_FOCUS)
}

pub fn selection() -> Style {
    Style::default().bg(SELECTION_BG).add_modifier(Modifier::BOLD)
}
