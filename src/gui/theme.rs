//! Colors shared by the GUI widgets

use iced::Color;

pub const TEXT_SECONDARY: Color = Color::from_rgb(0.616, 0.639, 0.667);
pub const SUCCESS: Color = Color::from_rgb(0.063, 0.725, 0.506); // Emerald
pub const DANGER: Color = Color::from_rgb(0.937, 0.267, 0.267); // Red
