pub mod models;
pub mod recume;
pub mod traits;

pub use models::{Report, VideoRecord};
pub use recume::RecuMeExtractor;
pub use traits::Extractor;
