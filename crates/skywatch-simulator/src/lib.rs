pub mod config;
pub mod profile;
pub mod run;
pub mod state;

pub use profile::ConditionProfile;
pub use run::run_simulator;
pub use state::StationState;
