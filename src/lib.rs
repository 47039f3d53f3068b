//! House-to-generator assignment model, its cost function and two local
//! search strategies that rebalance the assignment.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod optimizer;
pub mod persistence;
pub mod report;
pub mod telemetry;

pub use domain::{ConsumptionClass, Generator, GeneratorId, House, HouseId, Network};
pub use error::{LoadError, NetworkError, NetworkResult};
pub use optimizer::{
    run_descent_search, run_random_search, CostBreakdown, CostModel, HillClimber,
    NetworkOptimizer, SearchReport, SearchStrategy, SequentialDescent, TiePolicy,
};
