pub mod baidu;

pub use baidu::PlantApiClient;
