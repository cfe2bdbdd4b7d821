//! Progress bar component

use crate::gui::app::Message;
use iced::widget::{column, progress_bar as iced_progress_bar, text};
use iced::Element;

/// Create a progress bar (0-100) with a caption underneath
pub fn progress_bar<'a>(percent: f32, caption: &str) -> Element<'a, Message> {
    let bar = iced_progress_bar(0.0..=100.0, percent.clamp(0.0, 100.0));

    column![
        bar,
        text(caption.to_string())
            .size(12)
            .style(crate::gui::theme::TEXT_SECONDARY),
    ]
    .spacing(6)
    .into()
}
