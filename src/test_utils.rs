//! Shared test utilities for query and integration tests.
//!
//! `RecordingExecutor` stands in for a live database: it records every
//! statement it receives and answers queries from a queue of canned results.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;

use crate::db::{BoxError, ExecContext, Executor, QueryResult, Value};

/// One call received by a [`RecordingExecutor`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub sql: String,
    pub args: Vec<Value>,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<RecordedCall>,
    results: VecDeque<QueryResult>,
    failure: Option<String>,
}

/// In-memory executor. Clones share state, so a test can keep one clone and
/// hand another to a `Database`.
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    state: Arc<Mutex<State>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result for the next `query` call. Unqueued queries return no rows.
    pub fn with_result(self, result: QueryResult) -> Self {
        self.lock().results.push_back(result);
        self
    }

    /// Queue a result with the given headers and rows.
    pub fn with_rows(self, headers: &[&str], rows: Vec<Vec<Value>>) -> Self {
        let headers = headers.iter().map(|h| h.to_string()).collect();
        self.with_result(QueryResult::new(headers, rows))
    }

    /// Make every call fail with `message`.
    pub fn failing(self, message: &str) -> Self {
        self.lock().failure = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// SQL text of every call, in order.
    pub fn statements(&self) -> Vec<String> {
        self.lock().calls.iter().map(|c| c.sql.clone()).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("executor state poisoned")
    }

    fn record(&self, ctx: &ExecContext, sql: &str, args: &[Value]) -> Result<(), BoxError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall {
            sql: sql.to_string(),
            args: args.to_vec(),
        });
        if ctx.is_cancelled() {
            return Err("context cancelled".into());
        }
        match &state.failure {
            Some(message) => Err(message.clone().into()),
            None => Ok(()),
        }
    }
}

impl Executor for RecordingExecutor {
    fn query(&self, ctx: &ExecContext, sql: &str, args: &[Value]) -> Result<QueryResult, BoxError> {
        self.record(ctx, sql, args)?;
        Ok(self.lock().results.pop_front().unwrap_or_default())
    }

    fn execute(&self, ctx: &ExecContext, sql: &str, args: &[Value]) -> Result<u64, BoxError> {
        self.record(ctx, sql, args)?;
        Ok(0)
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}

/// Create a temporary file containing the given content.
///
/// Used to hand schema text to file-based loaders.
pub fn create_temp_schema_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".cmt").expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file
}
