#![forbid(unsafe_code)]

pub mod planner;
mod store;

pub use planner::{PlannedQuery, plan};
pub use store::*;
