//! Prompting strategies.
//!
//! A [`PlanningStrategy`] turns a world snapshot (and, for the reflexive
//! variant, a scratchpad) into the message sequence sent to a provider. The
//! five variants share one contract and differ only in their system
//! instruction and in how they embed the scratchpad. Every variant places
//! the serialized snapshot verbatim in the user turn.

use crate::prompt::PlanningPrompts;
use crate::session::entities::Message;
use crate::world::snapshot::{Scratchpad, WorldSnapshot};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// How the model is prompted for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanningStrategy {
    /// At most three reasoning lines, schema reminder, worked example.
    #[default]
    Reactive,
    /// Explicit stepwise reasoning before the final JSON.
    ChainOfThought,
    /// Embeds the scratchpad and repairs the defect it names.
    Reflexive,
    /// Short ordered plan, then the final JSON and nothing after it.
    PlanThenAct,
    /// Several labelled branches, then one selected final JSON.
    TreeOfThought,
}

impl PlanningStrategy {
    pub const ALL: [PlanningStrategy; 5] = [
        PlanningStrategy::Reactive,
        PlanningStrategy::ChainOfThought,
        PlanningStrategy::Reflexive,
        PlanningStrategy::PlanThenAct,
        PlanningStrategy::TreeOfThought,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanningStrategy::Reactive => "reactive",
            PlanningStrategy::ChainOfThought => "chain_of_thought",
            PlanningStrategy::Reflexive => "reflexive",
            PlanningStrategy::PlanThenAct => "plan_then_act",
            PlanningStrategy::TreeOfThought => "tree_of_thought",
        }
    }

    /// Canonical tags, for help text and config validation.
    pub fn valid_values() -> Vec<String> {
        Self::ALL.iter().map(|s| s.as_str().to_string()).collect()
    }

    /// Resolve a tag, falling back to [`PlanningStrategy::Reactive`].
    ///
    /// The boolean is `false` when the tag was not recognised, so the caller
    /// can warn.
    pub fn from_tag_or_default(tag: &str) -> (Self, bool) {
        match tag.parse() {
            Ok(strategy) => (strategy, true),
            Err(_) => (Self::default(), false),
        }
    }

    pub fn system_instruction(&self) -> String {
        match self {
            PlanningStrategy::Reactive => PlanningPrompts::reactive_system(),
            PlanningStrategy::ChainOfThought => PlanningPrompts::chain_of_thought_system(),
            PlanningStrategy::Reflexive => PlanningPrompts::reflexive_system(),
            PlanningStrategy::PlanThenAct => PlanningPrompts::plan_then_act_system(),
            PlanningStrategy::TreeOfThought => PlanningPrompts::tree_of_thought_system(),
        }
    }

    /// Build the message sequence for one planning call.
    pub fn build_messages(
        &self,
        snapshot: &WorldSnapshot,
        scratchpad: Option<&Scratchpad>,
    ) -> Vec<Message> {
        let mut user = PlanningPrompts::context_prompt(&snapshot.to_json());

        if let PlanningStrategy::Reflexive = self
            && let Some(pad) = scratchpad.filter(|p| !p.is_empty())
        {
            user.push_str(&PlanningPrompts::scratchpad_block(&scratchpad_text(pad)));
        }

        vec![
            Message::system(self.system_instruction()),
            Message::user(user),
        ]
    }
}

/// Strings are embedded as-is, anything else as compact JSON.
fn scratchpad_text(pad: &Scratchpad) -> String {
    match pad.as_value() {
        Value::String(s) => s.clone(),
        _ => pad.to_json(),
    }
}

impl fmt::Display for PlanningStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlanningStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "reactive" | "react" => Ok(PlanningStrategy::Reactive),
            "chain_of_thought" | "cot" => Ok(PlanningStrategy::ChainOfThought),
            "reflexive" | "reflexion" => Ok(PlanningStrategy::Reflexive),
            "plan_then_act" | "plan_execute" => Ok(PlanningStrategy::PlanThenAct),
            "tree_of_thought" | "tot" => Ok(PlanningStrategy::TreeOfThought),
            _ => Err(format!("Invalid PlanningStrategy: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::entities::Role;
    use serde_json::json;

    fn snapshot() -> WorldSnapshot {
        WorldSnapshot::from_json_str(
            r#"{"tick":4,"agents":[{"id":"2","kind":"medic","pos":[1,1]}],"survivors":[[1,1]]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_display_and_parse_round_trip() {
        for strategy in PlanningStrategy::ALL {
            assert_eq!(strategy.to_string().parse::<PlanningStrategy>(), Ok(strategy));
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("react".parse::<PlanningStrategy>(), Ok(PlanningStrategy::Reactive));
        assert_eq!("CoT".parse::<PlanningStrategy>(), Ok(PlanningStrategy::ChainOfThought));
        assert_eq!("reflexion".parse::<PlanningStrategy>(), Ok(PlanningStrategy::Reflexive));
        assert_eq!("plan-execute".parse::<PlanningStrategy>(), Ok(PlanningStrategy::PlanThenAct));
        assert_eq!("tot".parse::<PlanningStrategy>(), Ok(PlanningStrategy::TreeOfThought));
        assert!("mcts".parse::<PlanningStrategy>().is_err());
    }

    #[test]
    fn test_unknown_tag_falls_back_to_reactive() {
        assert_eq!(
            PlanningStrategy::from_tag_or_default("mcts"),
            (PlanningStrategy::Reactive, false)
        );
        assert_eq!(
            PlanningStrategy::from_tag_or_default("tot"),
            (PlanningStrategy::TreeOfThought, true)
        );
    }

    #[test]
    fn test_every_variant_embeds_snapshot_verbatim() {
        let snapshot = snapshot();
        for strategy in PlanningStrategy::ALL {
            let messages = strategy.build_messages(&snapshot, None);
            assert_eq!(messages.len(), 2);
            assert_eq!(messages[0].role(), Role::System);
            assert_eq!(messages[1].role(), Role::User);
            assert!(
                messages[1].content().contains(&snapshot.to_json()),
                "{} lost the snapshot",
                strategy
            );
        }
    }

    #[test]
    fn test_variants_differ_in_system_instruction() {
        let snapshot = snapshot();
        let systems: Vec<String> = PlanningStrategy::ALL
            .iter()
            .map(|s| s.build_messages(&snapshot, None)[0].content().to_string())
            .collect();
        for (i, a) in systems.iter().enumerate() {
            for b in &systems[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_reflexive_embeds_scratchpad() {
        let pad = Scratchpad::new(json!({"previous_errors": ["additional property 'notes'"]}));
        let messages = PlanningStrategy::Reflexive.build_messages(&snapshot(), Some(&pad));
        let user = messages[1].content();
        assert!(user.contains("SCRATCHPAD:\n{\"previous_errors\":[\"additional property 'notes'\"]}"));
    }

    #[test]
    fn test_reflexive_string_scratchpad_is_verbatim() {
        let pad = Scratchpad::new(json!("last reply had trailing text"));
        let messages = PlanningStrategy::Reflexive.build_messages(&snapshot(), Some(&pad));
        assert!(messages[1].content().ends_with("SCRATCHPAD:\nlast reply had trailing text"));
    }

    #[test]
    fn test_other_variants_ignore_scratchpad() {
        let pad = Scratchpad::new(json!("remember this"));
        for strategy in PlanningStrategy::ALL {
            if strategy == PlanningStrategy::Reflexive {
                continue;
            }
            let messages = strategy.build_messages(&snapshot(), Some(&pad));
            assert!(!messages[1].content().contains("remember this"));
        }
    }

    #[test]
    fn test_reflexive_without_scratchpad_has_no_block() {
        let messages = PlanningStrategy::Reflexive.build_messages(&snapshot(), None);
        assert!(!messages[1].content().contains("SCRATCHPAD:"));
    }
}
