pub mod app;
pub mod config;
pub mod input_loader;
pub mod logging;
pub mod report;
