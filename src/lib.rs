pub mod config;
pub mod simulation;
pub mod runtime;

pub use simulation::*;
pub use config::*;
