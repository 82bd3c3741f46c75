//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::Priority;

/// Border and selection accent for the active column.
pub const ACCENT: Color = Color::Rgb(0, 95, 135);
/// Used for high priority
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Used for medium priority
pub const AMBER: Color = Color::Rgb(215, 135, 0);
/// Used for low priority
pub const SLATE: Color = Color::Rgb(96, 125, 139);

/// Card accent colour for a priority.
pub fn priority_color(p: Priority) -> Color {
    match p {
        Priority::High => DARK_RED,
        Priority::Medium => AMBER,
        Priority::Low => SLATE,
    }
}
