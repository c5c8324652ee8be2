pub mod detail;
pub mod encyclopedia;
pub mod identify;
pub mod today;

pub use detail::DetailScreen;
pub use encyclopedia::EncyclopediaScreen;
pub use identify::IdentifyScreen;
pub use today::TodayScreen;
