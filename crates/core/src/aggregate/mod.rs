#![forbid(unsafe_code)]

mod arrests;
mod daywise;
mod faq;
mod frequency;

pub use arrests::*;
pub use daywise::*;
pub use faq::*;
pub use frequency::*;
