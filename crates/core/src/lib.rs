#![forbid(unsafe_code)]

pub mod aggregate;
pub mod model;
pub mod nav;
pub mod present;

pub use aggregate::*;
pub use model::*;
pub use nav::{Choice, FaqQuestion, NavError, NavRequest, Page, QueryPlan, Selection};
pub use present::*;
