pub mod args;
pub mod orchestrator;
pub mod rate;
