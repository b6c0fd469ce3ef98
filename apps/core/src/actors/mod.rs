//! Asynchronous front door to the analysis engine.
//!
//! A single actor owns the engine. Analyses run on the blocking pool so the
//! mailbox keeps draining; registrations are applied in mailbox order.

pub mod analysis;
pub mod messages;

pub use analysis::AnalysisHandle;
pub use messages::AnalysisMessage;
