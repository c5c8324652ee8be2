pub mod input;
pub mod plant_card;

pub use input::{InputWidget, SelectWidget};
pub use plant_card::PlantCard;
