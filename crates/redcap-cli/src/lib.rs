//! CLI library components for the data dictionary generator.

pub mod logging;
pub mod pipeline;
