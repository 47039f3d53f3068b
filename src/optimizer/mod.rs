//! Assignment optimization
//!
//! - `cost`: the objective (dispersion + lambda * surcharge)
//! - `hill_climb`: randomized hill climbing with an injected random source
//! - `descent`: deterministic sequential descent

pub mod cost;
pub mod descent;
pub mod hill_climb;
pub mod types;

pub use cost::*;
pub use descent::*;
pub use hill_climb::*;
pub use types::*;
