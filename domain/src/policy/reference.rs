//! Greedy nearest-target reference policy.
//!
//! Used when no live backend is configured, and as a test oracle. Each agent
//! is handled independently, in snapshot order:
//!
//! | Kind  | Condition              | Target           | On target          |
//! |-------|------------------------|------------------|--------------------|
//! | medic | carrying               | nearest hospital | `drop_at_hospital` |
//! | medic | not carrying           | nearest survivor | `pickup_survivor`  |
//! | truck | any fire               | nearest fire     | `extinguish_fire`  |
//! | truck | no fire, any rubble    | nearest rubble   | `clear_rubble`     |
//! | drone | battery < 20, depot    | depot            | `recharge`         |
//! | drone | otherwise              | nearest survivor | (nothing)          |
//!
//! "Nearest" is Manhattan distance with the earliest entry winning ties. Off
//! target, the agent gets one `move` step along the axis with the larger
//! absolute delta, x on equal deltas. Agents with no target get no command.
//! The batch keeps only the first `max_commands` commands; the rest are
//! dropped, not deferred.

use crate::command::entities::{Command, CommandBatch, actions};
use crate::core::position::GridPos;
use crate::world::snapshot::WorldSnapshot;
use crate::world::view::{AgentKind, AgentView, WorldView, nearest};

/// Commands kept per call unless configured otherwise.
pub const DEFAULT_COMMAND_CAP: usize = 3;

/// Drones below this battery level head for the depot.
pub const LOW_BATTERY_THRESHOLD: f64 = 20.0;

/// Stateless greedy dispatcher. Identical snapshots give identical batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferencePolicy {
    max_commands: usize,
}

impl Default for ReferencePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_CAP)
    }
}

impl ReferencePolicy {
    pub fn new(max_commands: usize) -> Self {
        Self { max_commands }
    }

    pub fn max_commands(&self) -> usize {
        self.max_commands
    }

    pub fn plan(&self, snapshot: &WorldSnapshot) -> CommandBatch {
        let world = WorldView::from_snapshot(snapshot);
        self.plan_view(&world)
    }

    pub fn plan_view(&self, world: &WorldView) -> CommandBatch {
        world
            .agents
            .iter()
            .filter_map(|agent| decide(agent, world))
            .take(self.max_commands)
            .collect()
    }
}

fn decide(agent: &AgentView, world: &WorldView) -> Option<Command> {
    match agent.kind {
        AgentKind::Medic if agent.carrying => approach(
            agent,
            nearest(&agent.pos, &world.hospitals),
            Some(actions::DROP_AT_HOSPITAL),
        ),
        AgentKind::Medic => approach(
            agent,
            nearest(&agent.pos, &world.survivors),
            Some(actions::PICKUP_SURVIVOR),
        ),
        AgentKind::Truck if !world.fires.is_empty() => approach(
            agent,
            nearest(&agent.pos, &world.fires),
            Some(actions::EXTINGUISH_FIRE),
        ),
        AgentKind::Truck => approach(
            agent,
            nearest(&agent.pos, &world.rubble),
            Some(actions::CLEAR_RUBBLE),
        ),
        AgentKind::Drone => match world.depot {
            Some(depot) if agent.battery < LOW_BATTERY_THRESHOLD => {
                approach(agent, Some(depot), Some(actions::RECHARGE))
            }
            _ => approach(agent, nearest(&agent.pos, &world.survivors), None),
        },
        AgentKind::Other(_) => None,
    }
}

/// Act when on `target`, otherwise take one greedy step toward it.
fn approach(
    agent: &AgentView,
    target: Option<GridPos>,
    on_arrival: Option<&str>,
) -> Option<Command> {
    let target = target?;
    if agent.pos == target {
        return on_arrival.map(|action| Command::act(agent.id.clone(), action));
    }
    Some(Command::move_to(
        agent.id.clone(),
        agent.pos.step_toward(&target),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn plan(value: Value) -> CommandBatch {
        ReferencePolicy::default().plan(&WorldSnapshot::new(value))
    }

    #[test]
    fn test_medic_on_survivor_picks_up() {
        let batch = plan(json!({
            "agents": [{"id": "2", "kind": "medic", "pos": [3, 3]}],
            "survivors": [[3, 3]],
        }));
        assert_eq!(
            batch.to_json(),
            r#"{"commands":[{"agent_id":"2","type":"act","action_name":"pickup_survivor"}]}"#
        );
    }

    #[test]
    fn test_medic_steps_toward_nearest_survivor() {
        let batch = plan(json!({
            "agents": [{"id": "m", "kind": "medic", "pos": [0, 0]}],
            "survivors": [[9, 9], [1, 3]],
        }));
        assert_eq!(batch.commands, vec![Command::move_to("m", GridPos::new(0, 1))]);
    }

    #[test]
    fn test_carrying_medic_goes_to_hospital() {
        let batch = plan(json!({
            "agents": [
                {"id": "a", "kind": "medic", "pos": [2, 2], "carrying": true},
                {"id": "b", "kind": "medic", "pos": [5, 0], "carrying": true},
            ],
            "survivors": [[2, 2]],
            "hospitals": [[5, 0], [0, 2]],
        }));
        assert_eq!(
            batch.commands,
            vec![
                Command::move_to("a", GridPos::new(1, 2)),
                Command::act("b", actions::DROP_AT_HOSPITAL),
            ]
        );
    }

    #[test]
    fn test_carrying_medic_without_hospital_gets_nothing() {
        let batch = plan(json!({
            "agents": [{"id": "a", "kind": "medic", "pos": [2, 2], "carrying": true}],
            "survivors": [[3, 3]],
        }));
        assert!(batch.is_empty());
    }

    #[test]
    fn test_truck_prefers_fire_over_rubble() {
        let batch = plan(json!({
            "agents": [{"id": "t", "kind": "truck", "pos": [0, 0]}],
            "fires": [[0, 4]],
            "rubble": [[1, 0]],
        }));
        assert_eq!(batch.commands, vec![Command::move_to("t", GridPos::new(0, 1))]);
    }

    #[test]
    fn test_truck_on_fire_extinguishes() {
        let batch = plan(json!({
            "agents": [{"id": "t", "kind": "truck", "pos": [0, 4]}],
            "fires": [[0, 4]],
        }));
        assert_eq!(batch.commands, vec![Command::act("t", actions::EXTINGUISH_FIRE)]);
    }

    #[test]
    fn test_truck_steps_east_toward_rubble() {
        let batch = plan(json!({
            "agents": [{"id": "7", "kind": "truck", "pos": [2, 5]}],
            "fires": [],
            "rubble": [[4, 5]],
        }));
        assert_eq!(batch.commands, vec![Command::move_to("7", GridPos::new(3, 5))]);
    }

    #[test]
    fn test_truck_on_rubble_clears() {
        let batch = plan(json!({
            "agents": [{"id": "7", "kind": "truck", "pos": [4, 5]}],
            "rubble": [[4, 5]],
        }));
        assert_eq!(batch.commands, vec![Command::act("7", actions::CLEAR_RUBBLE)]);
    }

    #[test]
    fn test_idle_truck_gets_no_command() {
        let batch = plan(json!({
            "agents": [
                {"id": "t", "kind": "truck", "pos": [0, 0]},
                {"id": "m", "kind": "medic", "pos": [0, 0]},
            ],
            "survivors": [[0, 0]],
        }));
        assert_eq!(batch.commands, vec![Command::act("m", actions::PICKUP_SURVIVOR)]);
    }

    #[test]
    fn test_low_battery_drone_recharges_at_depot() {
        let batch = plan(json!({
            "agents": [{"id": "d", "kind": "drone", "pos": [1, 1], "battery": 15}],
            "depot": [1, 1],
            "survivors": [[5, 5]],
        }));
        assert_eq!(batch.commands, vec![Command::act("d", actions::RECHARGE)]);
    }

    #[test]
    fn test_low_battery_drone_heads_home() {
        let batch = plan(json!({
            "agents": [{"id": "d", "kind": "drone", "pos": [4, 1], "battery": 19.5}],
            "depot": {"x": 1, "y": 1},
        }));
        assert_eq!(batch.commands, vec![Command::move_to("d", GridPos::new(3, 1))]);
    }

    #[test]
    fn test_drone_scouts_survivor_without_terminal_action() {
        let moving = plan(json!({
            "agents": [{"id": "d", "kind": "drone", "pos": [0, 0], "battery": 80}],
            "depot": [0, 0],
            "survivors": [[0, -2]],
        }));
        assert_eq!(moving.commands, vec![Command::move_to("d", GridPos::new(0, -1))]);

        let hovering = plan(json!({
            "agents": [{"id": "d", "kind": "drone", "pos": [0, -2]}],
            "survivors": [[0, -2]],
        }));
        assert!(hovering.is_empty());
    }

    #[test]
    fn test_drone_battery_defaults_to_full() {
        let batch = plan(json!({
            "agents": [{"id": "d", "kind": "drone", "pos": [0, 0]}],
            "depot": [0, 0],
            "survivors": [[2, 0]],
        }));
        assert_eq!(batch.commands, vec![Command::move_to("d", GridPos::new(1, 0))]);
    }

    #[test]
    fn test_low_battery_drone_without_depot_scouts() {
        let batch = plan(json!({
            "agents": [{"id": "d", "kind": "drone", "pos": [0, 0], "battery": 5}],
            "survivors": [[0, 3]],
        }));
        assert_eq!(batch.commands, vec![Command::move_to("d", GridPos::new(0, 1))]);
    }

    #[test]
    fn test_cap_keeps_first_commands_in_agent_order() {
        let agents: Vec<Value> = (0..5)
            .map(|i| json!({"id": format!("m{}", i), "kind": "medic", "pos": [i, 0]}))
            .collect();
        let snapshot = WorldSnapshot::new(json!({"agents": agents, "survivors": [[10, 0]]}));

        let batch = ReferencePolicy::default().plan(&snapshot);
        let ids: Vec<&str> = batch.iter().map(|c| c.agent_id.as_str()).collect();
        assert_eq!(ids, vec!["m0", "m1", "m2"]);

        assert_eq!(ReferencePolicy::new(1).plan(&snapshot).len(), 1);
        assert_eq!(ReferencePolicy::new(10).plan(&snapshot).len(), 5);
    }

    #[test]
    fn test_cap_skips_agents_without_commands() {
        let batch = plan(json!({
            "agents": [
                {"id": "t1", "kind": "truck", "pos": [0, 0]},
                {"id": "m1", "kind": "medic", "pos": [0, 0]},
                {"id": "x", "kind": "helicopter", "pos": [0, 0]},
                {"id": "m2", "kind": "medic", "pos": [1, 0]},
                {"id": "m3", "kind": "medic", "pos": [2, 0]},
                {"id": "m4", "kind": "medic", "pos": [3, 0]},
            ],
            "survivors": [[5, 0]],
        }));
        let ids: Vec<&str> = batch.iter().map(|c| c.agent_id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2", "m3"]);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let snapshot = WorldSnapshot::new(json!({
            "agents": [
                {"id": "m", "kind": "medic", "pos": [0, 0]},
                {"id": "t", "kind": "truck", "pos": [3, 3]},
                {"id": "d", "kind": "drone", "pos": [6, 1], "battery": 10},
            ],
            "survivors": [[2, 2], [2, -2]],
            "fires": [[5, 5]],
            "depot": [0, 0],
        }));
        let policy = ReferencePolicy::default();
        let first = policy.plan(&snapshot);
        for _ in 0..10 {
            assert_eq!(policy.plan(&snapshot), first);
        }
    }

    #[test]
    fn test_empty_or_odd_snapshots_do_not_panic() {
        assert!(plan(json!({})).is_empty());
        assert!(plan(json!(null)).is_empty());
        assert!(plan(json!({"agents": "none", "survivors": 3})).is_empty());
    }

    #[test]
    fn test_extreme_coordinates_do_not_panic() {
        let batch = plan(json!({
            "agents": [
                {"id": "m", "kind": "medic", "pos": [i64::MAX, 0]},
                {"id": "t", "kind": "truck", "pos": [i64::MIN, i64::MIN]},
            ],
            "survivors": [[-1, 0]],
            "fires": [[i64::MAX, i64::MAX]],
        }));
        assert_eq!(
            batch.commands,
            vec![
                Command::move_to("m", GridPos::new(i64::MAX - 1, 0)),
                Command::move_to("t", GridPos::new(i64::MIN + 1, i64::MIN)),
            ]
        );
    }
}
