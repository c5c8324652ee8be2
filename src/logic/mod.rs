pub mod camera;
pub mod catalog;
pub mod daily;
pub mod recognition;
pub mod season_matcher;

pub use camera::CameraCapture;
pub use catalog::{CatalogService, ALL_CATEGORIES};
pub use daily::DailyService;
pub use recognition::RecognitionService;
