use tokio::sync::oneshot;

use crate::analysis::{AnalysisResult, EngineStats, Priority, QuickSentiment};
use crate::config::ProcessOptions;
use crate::error::AnalysisError;

/// Messages that can be sent to the analysis actor.
#[derive(Debug)]
pub enum AnalysisMessage {
    /// Run the full pipeline over one transcript.
    Process {
        text: String,
        options: ProcessOptions,
        /// A channel to send the finished result back.
        responder: oneshot::Sender<AnalysisResult>,
    },
    /// Context-free sentiment for live feedback.
    QuickSentiment {
        text: String,
        responder: oneshot::Sender<QuickSentiment>,
    },
    /// Register an additional action pattern.
    AddCustomPattern {
        name: String,
        regex: String,
        priority: Priority,
        category: String,
        description: String,
        responder: oneshot::Sender<Result<(), AnalysisError>>,
    },
    /// Extend the sentiment vocabularies.
    AddCustomWords {
        positive: Vec<String>,
        negative: Vec<String>,
        responder: oneshot::Sender<Result<usize, AnalysisError>>,
    },
    /// Engine introspection.
    Stats {
        responder: oneshot::Sender<EngineStats>,
    },
    /// Stop the actor loop.
    Shutdown,
}
