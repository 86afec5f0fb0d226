//! Journeygen: Incremental Narrative Dataset Generation
//!
//! Builds a long, schema-constrained narrative dataset by asking a text-generation
//! service for one half-month window at a time, carrying a short digest of each
//! window into the next prompt, and writing the stitched journey only when every
//! window succeeded.

pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod init;
pub mod journey;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod planner;
pub mod prompt;
pub mod provider;
pub mod schema;
pub mod summarizer;
