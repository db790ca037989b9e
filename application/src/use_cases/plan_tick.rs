//! Plan Tick use case.
//!
//! Produces the command batch for one simulation tick:
//!
//! ```text
//! Build ─▶ Call ─▶ Validate ─ok──────────────────────────────▶ Done (batch)
//!                     │
//!                     └─invalid─▶ Call (+ corrective) ─▶ Validate ─ok──▶ Done (batch)
//!                                                           └─invalid─▶ Done (empty)
//! ```
//!
//! A provider failure in `Call` (after the gateway's own retries) ends the
//! call with [`PlanTickError`]. Validation failures never do: the second
//! one degrades to the empty batch, reported through
//! [`PlanningProgressNotifier::on_fail_safe`] and the conversation log.

use crate::config::PlanningParams;
use crate::gateway::ProviderGateway;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger, event_types,
};
use crate::ports::llm_gateway::GatewayError;
use crate::ports::planning_progress::{
    Attempt, NoPlanningProgress, PlanOutcome, PlanningProgressNotifier,
};
use rescue_domain::{
    CommandBatch, Message, PlanningPrompts, Scratchpad, ValidationError, WorldSnapshot,
    extract_and_validate,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that end a planning call.
#[derive(Error, Debug)]
pub enum PlanTickError {
    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayError),
}

/// Input for the [`PlanTickUseCase`].
#[derive(Debug, Clone)]
pub struct PlanTickInput {
    /// World state for this tick. Read-only.
    pub snapshot: WorldSnapshot,
    /// Caller-owned memory for the reflexive strategy.
    pub scratchpad: Option<Scratchpad>,
    /// Tick number, used only to label log records.
    pub tick: Option<u64>,
}

impl PlanTickInput {
    pub fn new(snapshot: WorldSnapshot) -> Self {
        Self {
            snapshot,
            scratchpad: None,
            tick: None,
        }
    }

    pub fn with_scratchpad(mut self, scratchpad: Scratchpad) -> Self {
        self.scratchpad = Some(scratchpad);
        self
    }

    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = Some(tick);
        self
    }
}

/// Batch plus the exchange that produced it.
#[derive(Debug, Clone)]
pub struct PlanOutput {
    /// Always schema-valid; empty on fail-safe.
    pub batch: CommandBatch,
    pub outcome: PlanOutcome,
    /// Messages sent on the final attempt.
    pub messages: Vec<Message>,
    /// Reply text of the final attempt.
    pub raw_response: String,
    /// Validation errors met on the way, oldest first.
    pub issues: Vec<ValidationError>,
}

impl PlanOutput {
    /// Scratchpad carrying this call's validation errors, for a reflexive
    /// strategy on the next tick. `None` when the first reply was valid.
    pub fn failure_scratchpad(&self) -> Option<Scratchpad> {
        if self.issues.is_empty() {
            return None;
        }
        Some(Scratchpad::from_failures(
            self.issues.iter().map(|e| e.to_string()),
        ))
    }
}

enum PlanningState {
    Build,
    Call {
        attempt: Attempt,
        messages: Vec<Message>,
    },
    Validate {
        attempt: Attempt,
        messages: Vec<Message>,
        text: String,
    },
    Done(PlanOutput),
}

/// Use case for planning one tick.
///
/// Holds no per-call state: one instance can serve many episodes, each call
/// independent of the others.
#[derive(Clone)]
pub struct PlanTickUseCase {
    gateway: Arc<ProviderGateway>,
    params: PlanningParams,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl PlanTickUseCase {
    pub fn new(gateway: Arc<ProviderGateway>, params: PlanningParams) -> Self {
        Self {
            gateway,
            params,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn params(&self) -> &PlanningParams {
        &self.params
    }

    /// Plan a tick and return only the batch.
    pub fn plan(&self, input: PlanTickInput) -> Result<CommandBatch, PlanTickError> {
        self.execute(input, &NoPlanningProgress).map(|out| out.batch)
    }

    /// Plan a tick and also return the raw reply and messages for logging.
    pub fn plan_with_response(&self, input: PlanTickInput) -> Result<PlanOutput, PlanTickError> {
        self.execute(input, &NoPlanningProgress)
    }

    /// Plan a tick with progress callbacks.
    pub fn execute(
        &self,
        input: PlanTickInput,
        progress: &dyn PlanningProgressNotifier,
    ) -> Result<PlanOutput, PlanTickError> {
        let options = self.params.call_options();
        let model = self.gateway.resolve_model(&options);
        let strategy = self.params.strategy;
        let tick = input.tick;
        let mut issues: Vec<ValidationError> = Vec::new();
        let mut state = PlanningState::Build;

        loop {
            state = match state {
                PlanningState::Build => PlanningState::Call {
                    attempt: Attempt::Initial,
                    messages: strategy.build_messages(&input.snapshot, input.scratchpad.as_ref()),
                },

                PlanningState::Call { attempt, messages } => {
                    progress.on_attempt_started(attempt);
                    self.conversation_logger.log(ConversationEvent::new(
                        event_types::PLANNING_REQUEST,
                        json!({
                            "tick": tick,
                            "attempt": attempt.number(),
                            "strategy": strategy.as_str(),
                            "provider": self.gateway.provider_name(),
                            "model": model,
                            "messages": messages,
                        }),
                    ));

                    let text = match self.gateway.call(&messages, &options) {
                        Ok(text) => text,
                        Err(e) => {
                            error!("Planning call for tick {:?} failed: {}", tick, e);
                            self.conversation_logger.log(ConversationEvent::new(
                                event_types::PROVIDER_FAILED,
                                json!({
                                    "tick": tick,
                                    "attempt": attempt.number(),
                                    "error": e.to_string(),
                                }),
                            ));
                            return Err(e.into());
                        }
                    };

                    self.conversation_logger.log(ConversationEvent::new(
                        event_types::PLANNING_RESPONSE,
                        json!({
                            "tick": tick,
                            "attempt": attempt.number(),
                            "text": text,
                        }),
                    ));
                    PlanningState::Validate {
                        attempt,
                        messages,
                        text,
                    }
                }

                PlanningState::Validate {
                    attempt,
                    messages,
                    text,
                } => match extract_and_validate(&text) {
                    Ok(batch) => {
                        let unknown = batch.unrecognized_actions();
                        if !unknown.is_empty() {
                            debug!("Reply names action(s) outside the engine's set: {:?}", unknown);
                        }
                        let outcome = match attempt {
                            Attempt::Initial => PlanOutcome::Accepted,
                            Attempt::Corrective => PlanOutcome::Corrected,
                        };
                        PlanningState::Done(PlanOutput {
                            batch,
                            outcome,
                            messages,
                            raw_response: text,
                            issues: std::mem::take(&mut issues),
                        })
                    }
                    Err(e) => {
                        progress.on_validation_failed(attempt, &e);
                        self.conversation_logger.log(ConversationEvent::new(
                            event_types::VALIDATION_FAILED,
                            json!({
                                "tick": tick,
                                "attempt": attempt.number(),
                                "kind": e.kind(),
                                "error": e.to_string(),
                            }),
                        ));
                        issues.push(e.clone());

                        match attempt {
                            Attempt::Initial => {
                                warn!("Invalid reply on attempt 1: {}", e);
                                let mut corrective = messages;
                                corrective
                                    .push(Message::system(PlanningPrompts::corrective_instruction()));
                                PlanningState::Call {
                                    attempt: Attempt::Corrective,
                                    messages: corrective,
                                }
                            }
                            Attempt::Corrective => {
                                error!(
                                    "Invalid reply on attempt 2: {} (defaulting to empty commands)",
                                    e
                                );
                                progress.on_fail_safe(&e);
                                PlanningState::Done(PlanOutput {
                                    batch: CommandBatch::empty(),
                                    outcome: PlanOutcome::FailSafe,
                                    messages,
                                    raw_response: text,
                                    issues: std::mem::take(&mut issues),
                                })
                            }
                        }
                    }
                },

                PlanningState::Done(output) => {
                    info!(
                        "Planned tick {:?} with {} ({} command(s), {})",
                        tick,
                        strategy,
                        output.batch.len(),
                        output.outcome
                    );
                    self.conversation_logger.log(ConversationEvent::new(
                        event_types::PLAN_COMPLETED,
                        json!({
                            "tick": tick,
                            "outcome": output.outcome,
                            "commands": output.batch.len(),
                            "batch": output.batch.to_value(),
                        }),
                    ));
                    progress.on_plan_ready(&output.batch, output.outcome);
                    return Ok(output);
                }
            };
        }
    }
}
