//! Data models for LV extraction.

pub mod config;
pub mod metadata;
pub mod page;
pub mod position;
