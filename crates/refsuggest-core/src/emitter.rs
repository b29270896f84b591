// crates/refsuggest-core/src/emitter.rs
use crate::model::SelectionValue;
use crate::traits::ReferenceRecord;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The hosting form's update callback.
///
/// Called exactly once per user commit and never for in-progress text.
pub trait FormSink: Send + Sync {
    fn on_change(&self, field_id: &str, value: SelectionValue);
}

impl<F> FormSink for F
where
    F: Fn(&str, SelectionValue) + Send + Sync,
{
    fn on_change(&self, field_id: &str, value: SelectionValue) {
        self(field_id, value)
    }
}

/// What a commit produced: the new input text and the reported payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub display: String,
    pub value: SelectionValue,
}

/// Formats a chosen record and reports it upstream, keyed by field id.
#[derive(Clone)]
pub struct SelectionEmitter {
    field_id: String,
    sink: Arc<dyn FormSink>,
}

impl fmt::Debug for SelectionEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionEmitter")
            .field("field_id", &self.field_id)
            .finish_non_exhaustive()
    }
}

impl SelectionEmitter {
    pub fn new(field_id: impl Into<String>, sink: Arc<dyn FormSink>) -> Self {
        Self {
            field_id: field_id.into(),
            sink,
        }
    }

    pub fn field_id(&self) -> &str {
        &self.field_id
    }

    pub fn commit<R: ReferenceRecord>(&self, record: &R) -> Commit {
        let commit = Commit {
            display: record.display_text(),
            value: record.to_value(),
        };
        debug!(field = %self.field_id, kind = R::KIND, display = %commit.display, "selection committed");
        self.sink.on_change(&self.field_id, commit.value.clone());
        commit
    }
}
