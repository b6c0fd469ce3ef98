//! Test Module
//!
//! Crate-level test suite for the transcript analysis engine.
//!
//! ## Test Categories
//! - `analysis_tests`: individual analysis components
//! - `pipeline_tests`: end-to-end transcripts through the engine
//! - `property_tests`: invariants over arbitrary input (proptest)
//! - `actor_tests`: the asynchronous analysis handle

pub mod actor_tests;
pub mod pipeline_tests;
