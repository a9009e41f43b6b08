//! Core business logic: indicator extraction and portfolio aggregation

pub mod analytics;
pub mod asset;
pub mod config;
pub mod document;
pub mod error;
pub mod indicators;
pub mod input;
pub mod log;
pub mod number;
pub mod render;

