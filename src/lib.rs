//! Career Coach: rule-based career coaching core.

pub mod classify;
pub mod cli;
pub mod coach;
pub mod config;
pub mod error;
pub mod profile;
pub mod recommend;
pub mod session;
pub mod store;
