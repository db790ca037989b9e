//! Command entities

use crate::core::position::GridPos;
use serde::Serialize;

/// Action names the simulation engine understands.
///
/// The validator does not restrict `action_name` to this list; whether an
/// action applies is decided by the engine.
pub mod actions {
    pub const PICKUP_SURVIVOR: &str = "pickup_survivor";
    pub const DROP_AT_HOSPITAL: &str = "drop_at_hospital";
    pub const EXTINGUISH_FIRE: &str = "extinguish_fire";
    pub const CLEAR_RUBBLE: &str = "clear_rubble";
    pub const RECHARGE: &str = "recharge";
    pub const RESUPPLY: &str = "resupply";

    pub const RECOGNIZED: [&str; 6] = [
        PICKUP_SURVIVOR,
        DROP_AT_HOSPITAL,
        EXTINGUISH_FIRE,
        CLEAR_RUBBLE,
        RECHARGE,
        RESUPPLY,
    ];

    pub fn is_recognized(name: &str) -> bool {
        RECOGNIZED.contains(&name)
    }
}

/// What a command asks the agent to do. Serialized under the `type` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Directive {
    /// Move to a tile.
    Move { to: GridPos },
    /// Perform a named action on the current tile.
    Act { action_name: String },
}

impl Directive {
    pub fn kind(&self) -> &'static str {
        match self {
            Directive::Move { .. } => "move",
            Directive::Act { .. } => "act",
        }
    }
}

/// One directive for one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    pub agent_id: String,
    #[serde(flatten)]
    pub directive: Directive,
}

impl Command {
    pub fn move_to(agent_id: impl Into<String>, to: GridPos) -> Self {
        Self {
            agent_id: agent_id.into(),
            directive: Directive::Move { to },
        }
    }

    pub fn act(agent_id: impl Into<String>, action_name: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            directive: Directive::Act {
                action_name: action_name.into(),
            },
        }
    }
}

/// Ordered commands for one tick. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandBatch {
    pub commands: Vec<Command>,
}

impl CommandBatch {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    /// The fail-safe batch: `{"commands":[]}`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// `act` names outside [`actions::RECOGNIZED`], in command order.
    pub fn unrecognized_actions(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match &command.directive {
                Directive::Act { action_name } if !actions::is_recognized(action_name) => {
                    Some(action_name.as_str())
                }
                _ => None,
            })
            .collect()
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"commands": []}))
    }

    /// Compact JSON text, e.g. `{"commands":[]}`.
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

impl FromIterator<Command> for CommandBatch {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
