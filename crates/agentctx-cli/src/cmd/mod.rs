pub mod agents;
pub mod status;
pub mod update;
