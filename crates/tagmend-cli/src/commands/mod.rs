pub mod audit;
pub mod boundaries;
pub mod remediate;
