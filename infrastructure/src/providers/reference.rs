//! Reference provider: the greedy policy behind the provider port.
//!
//! It reads the world snapshot back out of the first user message (the
//! JSON value following `CONTEXT_JSON:`), plans with [`ReferencePolicy`],
//! and answers in the same `FINAL_JSON:` shape a model is asked for. Any
//! strategy's prompt works, since all of them embed the snapshot that way.

use rescue_application::ports::llm_gateway::{CompletionRequest, GatewayError, TextProvider};
use rescue_domain::{
    CONTEXT_MARKER, CommandBatch, FINAL_JSON_MARKER, Message, ReferencePolicy, Role,
    WorldSnapshot,
};
use serde_json::Value;
use tracing::{debug, warn};

const NAME: &str = "reference";
const MODEL: &str = "greedy-reference";

#[derive(Default)]
pub struct ReferenceProvider {
    policy: ReferencePolicy,
}

impl ReferenceProvider {
    pub fn new(max_commands: usize) -> Self {
        Self {
            policy: ReferencePolicy::new(max_commands),
        }
    }

    pub fn policy(&self) -> &ReferencePolicy {
        &self.policy
    }
}

/// Snapshot embedded in the first user message, if any.
fn recover_snapshot(messages: &[Message]) -> Option<WorldSnapshot> {
    let user = messages.iter().find(|m| m.role() == Role::User)?;
    let content = user.content();
    let start = content.find(CONTEXT_MARKER)? + CONTEXT_MARKER.len();
    let value = serde_json::Deserializer::from_str(&content[start..])
        .into_iter::<Value>()
        .next()?
        .ok()?;
    Some(WorldSnapshot::new(value))
}

impl TextProvider for ReferenceProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn default_model(&self) -> &str {
        MODEL
    }

    fn complete(
        &self,
        messages: &[Message],
        _request: &CompletionRequest,
    ) -> Result<String, GatewayError> {
        let batch = match recover_snapshot(messages) {
            Some(snapshot) => self.policy.plan(&snapshot),
            None => {
                warn!("No {} block in the prompt; answering with no commands", CONTEXT_MARKER);
                CommandBatch::empty()
            }
        };
        debug!("Reference policy issued {} command(s)", batch.len());
        Ok(format!("{} {}", FINAL_JSON_MARKER, batch.to_json()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescue_domain::{PlanningStrategy, extract_and_validate};
    use serde_json::json;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: MODEL.to_string(),
            temperature: 0.2,
        }
    }

    fn snapshot() -> WorldSnapshot {
        WorldSnapshot::new(json!({
            "agents": [
                {"id": "m1", "kind": "medic", "pos": [0, 0]},
                {"id": "t1", "kind": "truck", "pos": [5, 5]},
            ],
            "survivors": [[2, 0]],
            "fires": [[5, 5]],
        }))
    }

    #[test]
    fn test_plans_from_every_strategy_prompt() {
        let provider = ReferenceProvider::default();
        for strategy in PlanningStrategy::ALL {
            let messages = strategy.build_messages(&snapshot(), None);
            let reply = provider.complete(&messages, &request()).unwrap();
            assert!(reply.starts_with("FINAL_JSON: "), "{strategy}");

            let batch = extract_and_validate(&reply).unwrap();
            assert_eq!(
                batch.to_json(),
                r#"{"commands":[{"agent_id":"m1","type":"move","to":[1,0]},{"agent_id":"t1","type":"act","action_name":"extinguish_fire"}]}"#
            );
            assert_eq!(batch, ReferencePolicy::default().plan(&snapshot()));
        }
    }

    #[test]
    fn test_cap_applies() {
        let provider = ReferenceProvider::new(1);
        let messages = PlanningStrategy::Reactive.build_messages(&snapshot(), None);
        let batch = extract_and_validate(&provider.complete(&messages, &request()).unwrap()).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(provider.policy().max_commands(), 1);
    }

    #[test]
    fn test_without_snapshot_answers_empty_batch() {
        let provider = ReferenceProvider::default();
        let reply = provider
            .complete(&[Message::system("rules"), Message::user("hello")], &request())
            .unwrap();
        assert_eq!(reply, r#"FINAL_JSON: {"commands":[]}"#);
    }

    #[test]
    fn test_recover_snapshot_ignores_trailing_text() {
        let messages = vec![Message::user(
            "CONTEXT_JSON:\n{\"agents\": []}\n\nAllowed command types: move, act",
        )];
        let snapshot = recover_snapshot(&messages).unwrap();
        assert_eq!(snapshot.as_value(), &json!({"agents": []}));
    }

    #[test]
    fn test_plan_tick_end_to_end() {
        use crate::logging::JsonlConversationLogger;
        use rescue_application::{
            PlanOutcome, PlanTickInput, PlanTickUseCase, PlanningParams, ProviderGateway,
        };
        use std::sync::Arc;

        let dir = tempfile::tempdir().unwrap();
        let logger =
            JsonlConversationLogger::for_run(dir.path(), PlanningStrategy::Reactive, "e2e")
                .unwrap();
        let log_path = logger.path().to_path_buf();

        let gateway = ProviderGateway::new(Arc::new(ReferenceProvider::default()));
        let use_case = PlanTickUseCase::new(Arc::new(gateway), PlanningParams::default())
            .with_conversation_logger(Arc::new(logger));

        let snapshot = WorldSnapshot::new(json!({
            "agents": [{"id": "2", "kind": "medic", "pos": [4, 4], "carrying": false}],
            "survivors": [[4, 4]],
            "hospitals": [[0, 0]],
        }));
        let output = use_case
            .plan_with_response(PlanTickInput::new(snapshot).with_tick(1))
            .unwrap();

        assert_eq!(output.outcome, PlanOutcome::Accepted);
        assert_eq!(
            output.batch.to_json(),
            r#"{"commands":[{"agent_id":"2","type":"act","action_name":"pickup_survivor"}]}"#
        );
        drop(use_case);

        let log = std::fs::read_to_string(log_path).unwrap();
        let types: Vec<String> = log
            .lines()
            .map(|l| {
                let record: Value = serde_json::from_str(l).unwrap();
                record["type"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(types, ["planning_request", "planning_response", "plan_completed"]);
    }

    #[test]
    fn test_recover_snapshot_rejects_broken_json() {
        let messages = vec![Message::user("CONTEXT_JSON: {\"agents\": [")];
        assert!(recover_snapshot(&messages).is_none());
    }
}
