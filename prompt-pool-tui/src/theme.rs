//! Colour palette for the list screen.

use crate::events::PushStatus;
use crate::notifications::NotificationLevel;
use ratatui::style::Color;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub title_fg: Color,
    pub title_bg: Color,
    pub status: Color,
    pub selected_title: Color,
    pub selected_desc: Color,
    pub text: Color,
    pub text_dim: Color,
    pub error: Color,
    pub warning: Color,
}

impl Palette {
    pub fn prompt_pool() -> Self {
        Self {
            title_fg: Color::Rgb(0xFF, 0xFD, 0xF5),
            title_bg: Color::Rgb(0x25, 0xA0, 0x65),
            status: Color::Rgb(0x04, 0xB5, 0x75),
            selected_title: Color::Rgb(0xEE, 0x6F, 0xF8),
            selected_desc: Color::Rgb(0xAD, 0x58, 0xB4),
            text: Color::Rgb(0xDD, 0xDD, 0xDD),
            text_dim: Color::Rgb(0x77, 0x77, 0x77),
            error: Color::Rgb(0xFF, 0x5F, 0x87),
            warning: Color::Rgb(0xFF, 0xD7, 0x00),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::prompt_pool()
    }
}

pub fn notification_color(level: NotificationLevel, palette: &Palette) -> Color {
    match level {
        NotificationLevel::Info => palette.status,
        NotificationLevel::Error => palette.error,
    }
}

pub fn push_status_color(status: PushStatus, palette: &Palette) -> Color {
    match status {
        PushStatus::Connected => palette.text_dim,
        PushStatus::Reconnecting { .. } => palette.warning,
    }
}
