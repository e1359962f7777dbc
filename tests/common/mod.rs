use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use tempfile::TempDir;

use actions_gate::WorkflowRun;

pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

pub fn write_gate_config(dir: &Path, content: &str) {
    fs::write(dir.join("gate.yaml"), content).expect("Failed to write gate.yaml");
}

pub fn at(timestamp: &str) -> DateTime<Utc> {
    timestamp.parse().expect("valid RFC 3339 timestamp")
}

pub fn run(id: i64, run_number: i64, status: &str) -> WorkflowRun {
    run_updated_at(id, run_number, status, "2024-01-15T10:00:00Z")
}

pub fn run_updated_at(id: i64, run_number: i64, status: &str, updated_at: &str) -> WorkflowRun {
    WorkflowRun {
        id,
        run_number,
        status: status.to_string(),
        updated_at: at(updated_at),
        name: None,
        event: None,
        conclusion: None,
    }
}
