//! Prompt templates for the planning strategies

/// Marker that opens the terminal line carrying the command batch.
pub const FINAL_JSON_MARKER: &str = "FINAL_JSON:";

/// Marker that prefixes advisory reasoning lines.
pub const REASONING_MARKER: &str = "Thought:";

/// Marker that precedes the serialized world snapshot in the user turn.
pub const CONTEXT_MARKER: &str = "CONTEXT_JSON:";

/// Marker that precedes the scratchpad in the reflexive user turn.
pub const SCRATCHPAD_MARKER: &str = "SCRATCHPAD:";

/// Templates for the planning exchange
pub struct PlanningPrompts;

impl PlanningPrompts {
    /// Command batch schema, repeated in every system instruction.
    pub fn schema_reminder() -> &'static str {
        r#"Schema:
{ "commands":[ {"agent_id":"<id>", "type":"move"|"act",
  "to":[x,y] (only if type=move),
  "action_name":"pickup_survivor"|"drop_at_hospital"|"extinguish_fire"|"clear_rubble"|"recharge"|"resupply" (only if type=act)} ] }
No other keys are allowed."#
    }

    /// System instruction for the reactive strategy
    pub fn reactive_system() -> String {
        format!(
            r#"You are an autonomous disaster response planner.
You must output final actions strictly as JSON.
{schema}

Rules:
- You may write internal reasoning in lines prefixed with "{thought}".
- Limit reasoning to <= 3 lines.
- Your final line MUST be: {marker} <the json object>.
- Use only agent IDs and entities present in {context}.
- If unsure, return {{"commands": []}}.

Example:
{thought} Medic 2 is at same tile as survivor.
{marker} {{"commands":[{{"agent_id":"2","type":"act","action_name":"pickup_survivor"}}]}}"#,
            schema = Self::schema_reminder(),
            thought = REASONING_MARKER,
            marker = FINAL_JSON_MARKER,
            context = CONTEXT_MARKER,
        )
    }

    /// System instruction for the chain-of-thought strategy
    pub fn chain_of_thought_system() -> String {
        format!(
            r#"You are a Chain-of-Thought disaster response planner.
Think step by step. Write each step on its own line prefixed with "{thought}",
covering which agent should do what and why, before deciding.
After the reasoning, end with a single line: {marker} <the json object>.
{schema}"#,
            thought = REASONING_MARKER,
            marker = FINAL_JSON_MARKER,
            schema = Self::schema_reminder(),
        )
    }

    /// System instruction for the reflexive strategy
    pub fn reflexive_system() -> String {
        format!(
            r#"You are a Reflexion-based disaster response planner.
Use {context} and the optional {scratchpad} (past errors, rules you were given).
If {scratchpad} names a defect in an earlier answer (invalid JSON, unknown keys,
missing fields), repair exactly that defect in this answer.
Always end with a single line: {marker} <the json object>.
{schema}"#,
            context = CONTEXT_MARKER,
            scratchpad = SCRATCHPAD_MARKER.trim_end_matches(':'),
            marker = FINAL_JSON_MARKER,
            schema = Self::schema_reminder(),
        )
    }

    /// System instruction for the plan-then-act strategy
    pub fn plan_then_act_system() -> String {
        format!(
            r#"You are a disaster response planner using Plan-and-Execute.
First, write a PLAN: a short ordered list of intended steps in natural language.
Then, immediately produce {marker} <the json object> that enacts the first step(s).
{schema}
No extra text after the {marker} line."#,
            marker = FINAL_JSON_MARKER,
            schema = Self::schema_reminder(),
        )
    }

    /// System instruction for the tree-of-thought strategy
    pub fn tree_of_thought_system() -> String {
        format!(
            r#"You are a Tree-of-Thought disaster response planner.
Explore multiple reasoning branches, each prefixed with its label
("Thought A:", "Thought B:", "Thought C:" and so on).
Then select the best branch, name it, and output a single line:
{marker} <the json object>
{schema}"#,
            marker = FINAL_JSON_MARKER,
            schema = Self::schema_reminder(),
        )
    }

    /// User turn carrying the serialized snapshot verbatim
    pub fn context_prompt(snapshot_json: &str) -> String {
        format!(
            "{}\n{}\n\nAllowed command types: move, act. Follow the schema exactly and finish with the {} line.",
            CONTEXT_MARKER, snapshot_json, FINAL_JSON_MARKER
        )
    }

    /// Block appended to the user turn by the reflexive strategy
    pub fn scratchpad_block(scratchpad: &str) -> String {
        format!("\n\n{}\n{}", SCRATCHPAD_MARKER, scratchpad)
    }

    /// System instruction appended after an invalid reply
    pub fn corrective_instruction() -> &'static str {
        "Your previous output was invalid (malformed JSON or schema mismatch). \
Produce ONLY the final JSON object matching the schema and nothing else."
    }
}
