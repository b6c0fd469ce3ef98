//! Transcript Insights Core
//!
//! Turns a raw voice transcript into sentiment, action items, topics and
//! personal insights, entirely on-device.

pub mod actors;
pub mod analysis;
pub mod config;
pub mod error;

#[cfg(test)]
mod tests;

pub use actors::AnalysisHandle;
pub use analysis::{AnalysisEngine, AnalysisResult, EngineStats, Priority, QuickSentiment};
pub use config::{EngineConfig, ProcessOptions};
pub use error::{ActorError, AnalysisError};
