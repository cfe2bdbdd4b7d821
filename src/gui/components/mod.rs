//! GUI components

pub mod progress_bar;

// Re-export for convenience
pub use progress_bar::progress_bar;
