//! Core types and rules for the digital register API
//!
//! This crate contains domain types shared across all other crates, the
//! process settings, and the pagination rules that reconcile search hits with
//! register rows.

mod cart;
mod config;
mod constants;
mod env_config;
mod error;
mod pagination;
mod postcode;
mod title;
mod user_search;

pub use cart::*;
pub use config::*;
pub use constants::*;
pub use env_config::*;
pub use error::*;
pub use pagination::*;
pub use postcode::*;
pub use title::*;
pub use user_search::*;
