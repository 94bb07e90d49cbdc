pub mod config;
pub mod display;
pub mod dto;
pub mod errors;
pub mod event;
pub mod importer;
pub mod report;
pub mod resolution;
pub mod types;
