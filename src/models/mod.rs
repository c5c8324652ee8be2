pub mod plant;
pub mod recognition;
pub mod season;

pub use plant::*;
pub use recognition::*;
pub use season::*;
