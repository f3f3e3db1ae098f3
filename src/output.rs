// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Human text, quiet (CI) text, or JSON-lines events tagged with the function version.

use clap::ValueEnum;
use serde::Serialize;
use std::time::Instant;

use crate::types::{FunctionId, VersionId};

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    #[default]
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum EventKind {
    Success,
    Result,
    Error,
}

/// One JSON line. Ids are present once the command knows which version it acts on.
#[derive(Serialize)]
struct Event<'a, T> {
    event: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_id: Option<&'a FunctionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version_id: Option<&'a VersionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    started: Option<Instant>,
    target: Option<(FunctionId, VersionId)>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            started: None,
            target: None,
        }
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Tag subsequent JSON events with the function version being acted on.
    pub fn target(&mut self, function_id: &FunctionId, version_id: &VersionId) {
        self.target = Some((function_id.clone(), version_id.clone()));
    }

    fn elapsed_secs(&self) -> Option<f64> {
        self.started.map(|t| t.elapsed().as_secs_f64())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a success message, with timing in normal mode.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => match self.elapsed_secs() {
                Some(elapsed) => println!("{message} ({elapsed:.1}s)"),
                None => println!("{message}"),
            },
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => {
                if let Some(line) = self.json_line::<()>(EventKind::Success, Some(message), None) {
                    println!("{line}");
                }
            }
        }
    }

    /// Print a command result. Normal and quiet modes render `text`; JSON
    /// mode emits a `result` event carrying `data`.
    pub fn result<T: Serialize>(&self, text: &str, data: &T) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => println!("{text}"),
            OutputMode::Json => {
                if let Some(line) = self.json_line(EventKind::Result, None, Some(data)) {
                    println!("{line}");
                }
            }
        }
    }

    /// Print an error message to stderr.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => {
                if let Some(line) = self.json_line::<()>(EventKind::Error, Some(message), None) {
                    eprintln!("{line}");
                }
            }
        }
    }

    fn json_line<T: Serialize>(
        &self,
        event: EventKind,
        message: Option<&str>,
        data: Option<&T>,
    ) -> Option<String> {
        let (function_id, version_id) = match &self.target {
            Some((f, v)) => (Some(f), Some(v)),
            None => (None, None),
        };
        let event = Event {
            event,
            function_id,
            version_id,
            message,
            duration_secs: self.elapsed_secs(),
            data,
        };
        serde_json::to_string(&event).ok()
    }
}
