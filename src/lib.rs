//! svgsprite - build-time CSS preprocessor for SVG icon sprites
//!
//! This library provides functionality to:
//! - Scan stylesheets for `.svg` image-url rules and sprite directives
//! - Merge referenced icons into composite SVG sprite sheets
//! - Rewrite stylesheets so each rule addresses its icon by URL fragment

pub mod assembler;
pub mod builder;
pub mod cli;
pub mod config;
pub mod messages;
pub mod models;
pub mod paths;
pub mod resolver;
pub mod resource;
pub mod rewriter;
pub mod scanner;
