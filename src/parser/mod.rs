pub mod days;
pub mod months;
pub mod names;
pub mod pipeline;

pub use pipeline::{scan_selectors, selectors, Pipeline, Strategy};
