//! JSONL file writer for planning conversation events.
//!
//! Each [`ConversationEvent`] becomes one JSON line carrying the event
//! payload plus `type` and `timestamp` fields. Runs are laid out as
//! `<dir>/strategy=<name>/run=<run_id>.jsonl` so that runs of different
//! strategies can be compared side by side.

use rescue_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use rescue_domain::PlanningStrategy;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// JSONL conversation logger that appends one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`, so concurrent episodes of one
/// run can share it. Flushes after every record and on `Drop`.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open (or create) the log file at `path` in append mode.
    ///
    /// Creates parent directories as needed. Returns `None` if the file
    /// cannot be opened; callers then run without a transcript.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create conversation log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Could not open conversation log file {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        debug!("Writing conversation log to {}", path.display());
        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Open the log for one run of one strategy under `dir`.
    pub fn for_run(dir: impl AsRef<Path>, strategy: PlanningStrategy, run_id: &str) -> Option<Self> {
        Self::new(Self::run_path(dir, strategy, run_id))
    }

    /// `<dir>/strategy=<name>/run=<run_id>.jsonl`
    pub fn run_path(dir: impl AsRef<Path>, strategy: PlanningStrategy, run_id: &str) -> PathBuf {
        dir.as_ref()
            .join(format!("strategy={}", strategy.as_str()))
            .join(format!("run={}.jsonl", sanitize_run_id(run_id)))
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Keep run ids usable as a single path component.
fn sanitize_run_id(run_id: &str) -> String {
    let cleaned: String = run_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "default".to_string()
    } else {
        cleaned
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let record = match event.payload {
            Value::Object(mut map) => {
                map.insert(
                    "type".to_string(),
                    Value::String(event.event_type.to_string()),
                );
                map.insert("timestamp".to_string(), Value::String(timestamp));
                Value::Object(map)
            }
            other => serde_json::json!({
                "type": event.event_type,
                "timestamp": timestamp,
                "data": other,
            }),
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
                warn!("Failed to write conversation log {}: {}", self.path.display(), e);
            }
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescue_application::ports::conversation_logger::event_types;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new(
            event_types::PLANNING_RESPONSE,
            serde_json::json!({"tick": 3, "attempt": 1, "text": "FINAL_JSON: {}"}),
        ));
        logger.log(ConversationEvent::new(
            event_types::PLAN_COMPLETED,
            serde_json::json!({"tick": 3, "outcome": "accepted", "commands": 0}),
        ));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["type"], "planning_response");
        assert_eq!(records[0]["text"], "FINAL_JSON: {}");
        assert_eq!(records[1]["type"], "plan_completed");
        assert_eq!(records[1]["outcome"], "accepted");

        let ts = records[0]["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wrapped.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new("note", serde_json::json!("just a string")));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records[0]["type"], "note");
        assert_eq!(records[0]["data"], "just a string");
    }

    #[test]
    fn test_reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("append.jsonl");

        for tick in 0..2 {
            let logger = JsonlConversationLogger::new(&path).unwrap();
            logger.log(ConversationEvent::new(
                event_types::PLAN_COMPLETED,
                serde_json::json!({"tick": tick}),
            ));
        }

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["tick"], 1);
    }

    #[test]
    fn test_for_run_creates_strategy_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logger =
            JsonlConversationLogger::for_run(dir.path(), PlanningStrategy::TreeOfThought, "r1")
                .unwrap();

        assert_eq!(
            logger.path(),
            dir.path()
                .join("strategy=tree_of_thought")
                .join("run=r1.jsonl")
        );
        assert!(logger.path().exists());
    }

    #[test]
    fn test_run_id_is_sanitized() {
        let path = JsonlConversationLogger::run_path("logs", PlanningStrategy::Reactive, "../x y");
        assert_eq!(
            path,
            PathBuf::from("logs/strategy=reactive/run=.._x_y.jsonl")
        );
        let empty = JsonlConversationLogger::run_path("logs", PlanningStrategy::Reactive, "");
        assert!(empty.ends_with("run=default.jsonl"));
    }

    #[test]
    fn test_returns_none_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        assert!(JsonlConversationLogger::new(blocker.join("log.jsonl")).is_none());
    }
}
