pub mod contact;
pub mod registry;
pub mod search;

use std::borrow::Cow;
use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::arena::RecordArena;
use crate::error::Result;

/// Scheduling hint for the executor; enrichment follow-ups jump the queue so a
/// record's chain finishes before new seeds fan out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    High,
    #[default]
    Normal,
}

/// Fetch descriptor handed to the executor.
#[derive(Debug, Clone)]
pub struct JobDescriptor {
    pub id: Uuid,
    pub parent_id: String,
    pub method: &'static str,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub max_retries: u32,
    pub priority: Priority,
}

impl JobDescriptor {
    pub fn get(parent_id: impl Into<String>, url: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent_id: parent_id.into(),
            method: "GET",
            url: url.into(),
            headers: HashMap::new(),
            max_retries: 0,
            priority,
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_string(), value.into());
        self
    }
}

/// One fetch result as delivered by the executor. A cancelled or timed-out
/// fetch arrives with `error` set, exactly like a transport failure.
#[derive(Debug, Clone, Default)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub error: Option<String>,
}

impl FetchResponse {
    pub fn ok(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: 0,
            body: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// One unit of work in a record's enrichment chain.
///
/// Jobs never fetch anything themselves: the executor performs the request
/// described by [`JobDescriptor`] and hands the outcome to `process`. The
/// source contract's `(record, children, error)` triple maps onto this seam
/// as: record = the arena slot behind the job's handle, children = the `Ok`
/// payload, error = `Err`. Per-job errors stay local to one record's chain.
#[async_trait]
pub trait ScrapeJob: Send + Sync {
    fn descriptor(&self) -> &JobDescriptor;

    /// Whether `process` should still run when the fetch itself failed.
    fn process_on_fetch_error(&self) -> bool {
        false
    }

    async fn process(
        &self,
        arena: &RecordArena,
        response: FetchResponse,
    ) -> Result<Vec<Box<dyn ScrapeJob>>>;
}
