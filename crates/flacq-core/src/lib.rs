pub mod config;
pub mod logging;

pub mod extractor;
pub mod filename;
pub mod job;
pub mod platform;
pub mod queue;
pub mod runner;
