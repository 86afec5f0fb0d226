//! Property-based tests for planning, normalization, and summarization

mod planning;
mod summarization;
