//! Lenient typed reading of a [`WorldSnapshot`].
//!
//! Every field is optional. Entries that cannot be read (no id, no usable
//! position) are skipped, absent scalars take neutral defaults. Reading a
//! snapshot never fails.

use crate::core::position::GridPos;
use crate::world::snapshot::WorldSnapshot;
use serde_json::{Map, Value};

/// Battery level assumed when an agent does not report one.
pub const FULL_BATTERY: f64 = 100.0;

/// Declared agent kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentKind {
    Medic,
    Truck,
    Drone,
    /// Anything else; the reference policy has no target for it.
    Other(String),
}

impl AgentKind {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "medic" => AgentKind::Medic,
            "truck" => AgentKind::Truck,
            "drone" => AgentKind::Drone,
            other => AgentKind::Other(other.to_string()),
        }
    }
}

/// One agent as seen by the planner.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentView {
    pub id: String,
    pub kind: AgentKind,
    pub pos: GridPos,
    pub carrying: bool,
    pub battery: f64,
}

/// Typed view over the parts of a snapshot the reference policy needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldView {
    /// Agents in snapshot order.
    pub agents: Vec<AgentView>,
    pub survivors: Vec<GridPos>,
    pub fires: Vec<GridPos>,
    pub rubble: Vec<GridPos>,
    pub hospitals: Vec<GridPos>,
    pub depot: Option<GridPos>,
}

impl WorldView {
    pub fn from_snapshot(snapshot: &WorldSnapshot) -> Self {
        let Some(root) = snapshot.as_value().as_object() else {
            return Self::default();
        };

        let agents = field(root, &["agents"])
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(parse_agent).collect())
            .unwrap_or_default();

        Self {
            agents,
            survivors: positions(root, &["survivors"]),
            fires: positions(root, &["fires"]),
            rubble: positions(root, &["rubble", "rubbles"]),
            hospitals: positions(root, &["hospitals"]),
            depot: field(root, &["depot"]).and_then(parse_position),
        }
    }
}

/// Entity in `candidates` closest to `from` by Manhattan distance.
/// The earliest entry wins ties.
pub fn nearest(from: &GridPos, candidates: &[GridPos]) -> Option<GridPos> {
    let mut best: Option<(u64, GridPos)> = None;
    for candidate in candidates {
        let distance = from.manhattan(candidate);
        match best {
            Some((best_distance, _)) if best_distance <= distance => {}
            _ => best = Some((distance, *candidate)),
        }
    }
    best.map(|(_, pos)| pos)
}

fn field<'a>(object: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .find_map(|name| object.get(*name))
        .filter(|v| !v.is_null())
}

fn positions(root: &Map<String, Value>, names: &[&str]) -> Vec<GridPos> {
    field(root, names)
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(parse_position).collect())
        .unwrap_or_default()
}

/// Largest integer an `f64` represents exactly.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Integral coordinate. Fractional floats, floats beyond the exact integer
/// range, and integers outside `i64` are rejected.
fn coordinate(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    if value.is_u64() {
        return None;
    }
    let f = value.as_f64()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT).then_some(f as i64)
}

/// Accepts `[x, y]`, `{"x": .., "y": ..}` or an object with `pos`/`position`.
fn parse_position(value: &Value) -> Option<GridPos> {
    match value {
        Value::Array(pair) if pair.len() == 2 => {
            Some(GridPos::new(coordinate(&pair[0])?, coordinate(&pair[1])?))
        }
        Value::Object(object) => {
            if let Some(inner) = field(object, &["pos", "position"]) {
                return parse_position(inner);
            }
            let x = coordinate(object.get("x")?)?;
            let y = coordinate(object.get("y")?)?;
            Some(GridPos::new(x, y))
        }
        _ => None,
    }
}

fn parse_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_carrying(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(_)) => true,
    }
}

fn parse_agent(value: &Value) -> Option<AgentView> {
    let object = value.as_object()?;
    let id = field(object, &["id", "agent_id", "unique_id"]).and_then(parse_id)?;
    let pos = field(object, &["pos", "position"])
        .and_then(parse_position)
        .or_else(|| parse_position(value))?;
    let kind = field(object, &["kind", "type", "role"])
        .and_then(Value::as_str)
        .map(AgentKind::parse)
        .unwrap_or_else(|| AgentKind::Other(String::new()));
    let battery = field(object, &["battery"])
        .and_then(Value::as_f64)
        .unwrap_or(FULL_BATTERY);

    Some(AgentView {
        id,
        kind,
        pos,
        carrying: is_carrying(object.get("carrying")),
        battery,
    })
}
