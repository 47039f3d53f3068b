pub mod generator;
pub mod house;
pub mod network;
pub mod types;

pub use generator::*;
pub use house::*;
pub use network::*;
pub use types::*;
