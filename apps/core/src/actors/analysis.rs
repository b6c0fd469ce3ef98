use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, instrument};

use crate::actors::messages::AnalysisMessage;
use crate::analysis::{AnalysisEngine, AnalysisResult, EngineStats, Priority, QuickSentiment};
use crate::config::ProcessOptions;
use crate::error::ActorError;

const MAILBOX_CAPACITY: usize = 32;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A handle to the analysis actor.
///
/// Cloning the handle is cheap; every clone talks to the same engine. The
/// actor stops once every handle is dropped or [`AnalysisHandle::shutdown`]
/// is called.
#[derive(Clone)]
pub struct AnalysisHandle {
    sender: mpsc::Sender<AnalysisMessage>,
    request_timeout: Duration,
}

impl AnalysisHandle {
    /// Spawns an actor that owns `engine` and returns a handle to it, using
    /// the default request timeout. Must be called inside a tokio runtime.
    pub fn new(engine: AnalysisEngine) -> Self {
        Self::with_timeout(engine, DEFAULT_TIMEOUT)
    }

    /// Spawns an actor that owns `engine` and returns a handle to it.
    ///
    /// # Arguments
    ///
    /// * `engine` - The engine to serve. Construction cost is paid by the caller.
    /// * `request_timeout` - How long each request waits for its answer.
    pub fn with_timeout(engine: AnalysisEngine, request_timeout: Duration) -> Self {
        let (sender, receiver) = mpsc::channel(MAILBOX_CAPACITY);
        let runner = AnalysisRunner {
            receiver,
            engine: Arc::new(engine),
            in_flight: JoinSet::new(),
        };
        tokio::spawn(async move { runner.run().await });
        Self {
            sender,
            request_timeout,
        }
    }

    async fn request<T>(
        &self,
        msg: AnalysisMessage,
        recv: oneshot::Receiver<T>,
    ) -> Result<T, ActorError> {
        self.sender
            .send(msg)
            .await
            .map_err(|e| ActorError::Closed(e.to_string()))?;
        timeout(self.request_timeout, recv)
            .await?
            .map_err(|e| ActorError::Closed(e.to_string()))
    }

    /// Runs the full pipeline over one transcript.
    ///
    /// # Arguments
    ///
    /// * `text` - The raw transcript.
    /// * `options` - Per-call switches.
    ///
    /// # Returns
    ///
    /// The [`AnalysisResult`], computed against the patterns and words that
    /// were registered before this request was queued. Fails only if the
    /// actor is gone or the request timed out.
    #[instrument(skip(self, text, options), fields(len = text.len()))]
    pub async fn process_text(
        &self,
        text: String,
        options: ProcessOptions,
    ) -> Result<AnalysisResult, ActorError> {
        let (send, recv) = oneshot::channel();
        let msg = AnalysisMessage::Process {
            text,
            options,
            responder: send,
        };
        self.request(msg, recv).await
    }

    /// Analyzes several transcripts concurrently.
    ///
    /// # Returns
    ///
    /// One result per input, in input order.
    pub async fn process_batch(
        &self,
        texts: Vec<String>,
        options: ProcessOptions,
    ) -> Vec<Result<AnalysisResult, ActorError>> {
        let requests = texts
            .into_iter()
            .map(|text| self.process_text(text, options.clone()));
        join_all(requests).await
    }

    /// Context-free sentiment for live feedback.
    pub async fn quick_sentiment(&self, text: String) -> Result<QuickSentiment, ActorError> {
        let (send, recv) = oneshot::channel();
        let msg = AnalysisMessage::QuickSentiment {
            text,
            responder: send,
        };
        self.request(msg, recv).await
    }

    /// Registers an action pattern.
    ///
    /// The actor waits for every analysis queued before this call to finish,
    /// applies the pattern, and only then serves later requests. Earlier
    /// requests never see it; later ones always do.
    ///
    /// # Arguments
    ///
    /// * `name` - Unique pattern name.
    /// * `regex` - Pattern source, compiled case-insensitively.
    /// * `priority` - Priority given to fragments it matches.
    /// * `category` - Category reported in the action detection.
    /// * `description` - Free-form description.
    ///
    /// # Returns
    ///
    /// `ActorError::Rejected` when the engine refuses the pattern.
    #[instrument(skip(self, regex, description))]
    pub async fn add_custom_pattern(
        &self,
        name: String,
        regex: String,
        priority: Priority,
        category: String,
        description: String,
    ) -> Result<(), ActorError> {
        let (send, recv) = oneshot::channel();
        let msg = AnalysisMessage::AddCustomPattern {
            name,
            regex,
            priority,
            category,
            description,
            responder: send,
        };
        Ok(self.request(msg, recv).await??)
    }

    /// Extends the sentiment vocabularies, ordered against analyses the same
    /// way as [`AnalysisHandle::add_custom_pattern`].
    ///
    /// # Returns
    ///
    /// How many words were added.
    pub async fn add_custom_words(
        &self,
        positive: Vec<String>,
        negative: Vec<String>,
    ) -> Result<usize, ActorError> {
        let (send, recv) = oneshot::channel();
        let msg = AnalysisMessage::AddCustomWords {
            positive,
            negative,
            responder: send,
        };
        Ok(self.request(msg, recv).await??)
    }

    pub async fn stats(&self) -> Result<EngineStats, ActorError> {
        let (send, recv) = oneshot::channel();
        self.request(AnalysisMessage::Stats { responder: send }, recv)
            .await
    }

    /// Asks the actor to stop after the messages already queued. Analyses
    /// already running still deliver their results.
    pub async fn shutdown(&self) -> Result<(), ActorError> {
        self.sender
            .send(AnalysisMessage::Shutdown)
            .await
            .map_err(|e| ActorError::Closed(e.to_string()))
    }
}

// --- Actor Runner ---
struct AnalysisRunner {
    receiver: mpsc::Receiver<AnalysisMessage>,
    engine: Arc<AnalysisEngine>,
    /// Analyses handed to the blocking pool and not yet joined.
    in_flight: JoinSet<()>,
}

impl AnalysisRunner {
    async fn run(mut self) {
        info!("Analysis actor started");
        while let Some(msg) = self.receiver.recv().await {
            if matches!(msg, AnalysisMessage::Shutdown) {
                break;
            }
            self.handle_message(msg).await;
        }
        self.drain_in_flight().await;
        info!("Analysis actor stopped");
    }

    /// Waits for every analysis dispatched so far.
    async fn drain_in_flight(&mut self) {
        while let Some(joined) = self.in_flight.join_next().await {
            if let Err(e) = joined {
                error!("Analysis task failed: {}", e);
            }
        }
    }

    async fn handle_message(&mut self, msg: AnalysisMessage) {
        // Reap finished analyses so the set stays small.
        while let Some(joined) = self.in_flight.try_join_next() {
            if let Err(e) = joined {
                error!("Analysis task failed: {}", e);
            }
        }

        match msg {
            AnalysisMessage::Process {
                text,
                options,
                responder,
            } => {
                // Analyses overlap; the mailbox keeps draining while they run.
                let engine = Arc::clone(&self.engine);
                self.in_flight.spawn_blocking(move || {
                    let result = engine.process_text(&text, &options);
                    if responder.send(result).is_err() {
                        debug!("Caller dropped before the analysis finished");
                    }
                });
            }
            AnalysisMessage::QuickSentiment { text, responder } => {
                let _ = responder.send(self.engine.quick_sentiment(&text));
            }
            AnalysisMessage::AddCustomPattern {
                name,
                regex,
                priority,
                category,
                description,
                responder,
            } => {
                self.drain_in_flight().await;
                let engine = Arc::clone(&self.engine);
                let outcome = tokio::task::spawn_blocking(move || {
                    engine.add_custom_pattern(&name, &regex, priority, &category, &description)
                })
                .await;
                match outcome {
                    Ok(result) => {
                        if let Err(e) = &result {
                            error!("Custom pattern rejected: {}", e);
                        }
                        let _ = responder.send(result);
                    }
                    Err(e) => error!("Pattern registration task failed: {}", e),
                }
            }
            AnalysisMessage::AddCustomWords {
                positive,
                negative,
                responder,
            } => {
                self.drain_in_flight().await;
                let engine = Arc::clone(&self.engine);
                let outcome = tokio::task::spawn_blocking(move || {
                    engine.add_custom_words(&positive, &negative)
                })
                .await;
                match outcome {
                    Ok(result) => {
                        let _ = responder.send(result);
                    }
                    Err(e) => error!("Word registration task failed: {}", e),
                }
            }
            AnalysisMessage::Stats { responder } => {
                let _ = responder.send(self.engine.stats());
            }
            AnalysisMessage::Shutdown => {}
        }
    }
}
