//! Configuration for sprite builds.
//!
//! Provides types and parsing for `svgsprite.toml` run parameters.

pub mod loader;
pub mod schema;

pub use schema::*;
