//! Data models for the fluency pipeline.

pub mod alignment;
pub mod analysis;
pub mod config;
pub mod history;
pub mod session;
pub mod words;
