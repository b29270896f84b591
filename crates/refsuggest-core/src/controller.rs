// crates/refsuggest-core/src/controller.rs

//! # Suggestion Controller
//!
//! Input / debounce / keyboard state machine of one autocomplete field.
//!
//! The controller is synchronous and owns no timers. Operations that must
//! wait (the debounce before a search, the grace period before a blur closes
//! the dropdown) hand back a ticket carrying the delay; the host arms a timer
//! and passes the ticket back when it fires. Every re-arm supersedes the
//! previous ticket, and a superseded ticket is inert when it comes back, so
//! only the most recent keystroke can ever produce visible results.
//!
//! [`crate::widget`] drives a controller on a tokio task.

use crate::emitter::{Commit, SelectionEmitter};
use crate::locale::CountryScope;
use crate::search::{FuzzyMatcher, MatchOptions, DEFAULT_LIMIT};
use crate::traits::ReferenceRecord;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);
pub const DEFAULT_BLUR_GRACE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    pub debounce: Duration,
    /// Delay between blur and close, so a click on a suggestion still lands.
    pub blur_grace: Duration,
    /// Maximum number of suggestions shown.
    pub limit: usize,
    pub matching: MatchOptions,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            blur_grace: DEFAULT_BLUR_GRACE,
            limit: DEFAULT_LIMIT,
            matching: MatchOptions::default(),
        }
    }
}

/// Text, highlight and open flag of the field.
///
/// `active_index` is `-1` (nothing highlighted) or a valid index into the
/// current suggestions, and is always `-1` while closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub text: String,
    pub active_index: isize,
    pub is_open: bool,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            text: String::new(),
            active_index: -1,
            is_open: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownState {
    Closed,
    OpenEmpty,
    OpenWithResults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Other,
}

impl FromStr for Key {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "arrowdown" | "down" => Key::ArrowDown,
            "arrowup" | "up" => Key::ArrowUp,
            "enter" | "return" => Key::Enter,
            "escape" | "esc" => Key::Escape,
            _ => Key::Other,
        })
    }
}

/// What the host should do with the native key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    /// Suppress the default action (caret movement, form submission).
    pub prevent_default: bool,
    pub committed: bool,
}

/// Debounce ticket for a search. Hand it back to
/// [`SuggestionController::settle`] once `delay` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct PendingSearch {
    generation: u64,
    pub delay: Duration,
}

/// Grace-period ticket for a blur-driven close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct PendingClose {
    generation: u64,
    pub delay: Duration,
}

pub struct SuggestionController<R> {
    config: ControllerConfig,
    matcher: FuzzyMatcher,
    emitter: SelectionEmitter,

    query: QueryState,
    suggestions: Arc<[R]>,
    dataset: Arc<[R]>,
    dataset_ready: bool,
    scope: Option<CountryScope>,

    generation: u64,
    pending: Option<u64>,
    close_generation: u64,
    pending_close: Option<u64>,

    /// Text was typed and not yet committed.
    dirty: bool,
    /// A search ran before the dataset arrived; re-run once it does.
    awaiting_dataset: bool,
    mounted: bool,
    searches_run: u64,
}

impl<R> fmt::Debug for SuggestionController<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuggestionController")
            .field("field_id", &self.emitter.field_id())
            .field("query", &self.query)
            .field("suggestions", &self.suggestions.len())
            .field("dataset", &self.dataset.len())
            .field("generation", &self.generation)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

impl<R: ReferenceRecord> SuggestionController<R> {
    pub fn new(emitter: SelectionEmitter, config: ControllerConfig) -> Self {
        Self {
            matcher: FuzzyMatcher::new(config.matching.clone()),
            config,
            emitter,
            query: QueryState::default(),
            suggestions: Arc::from(Vec::new()),
            dataset: Arc::from(Vec::new()),
            dataset_ready: false,
            scope: None,
            generation: 0,
            pending: None,
            close_generation: 0,
            pending_close: None,
            dirty: false,
            awaiting_dataset: false,
            mounted: true,
            searches_run: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn suggestions(&self) -> &Arc<[R]> {
        &self.suggestions
    }

    pub fn active_suggestion(&self) -> Option<&R> {
        usize::try_from(self.query.active_index)
            .ok()
            .and_then(|i| self.suggestions.get(i))
    }

    pub fn state(&self) -> DropdownState {
        match (self.query.is_open, self.suggestions.is_empty()) {
            (false, _) => DropdownState::Closed,
            (true, true) => DropdownState::OpenEmpty,
            (true, false) => DropdownState::OpenWithResults,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn field_id(&self) -> &str {
        self.emitter.field_id()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn dataset_ready(&self) -> bool {
        self.dataset_ready
    }

    pub fn has_pending_search(&self) -> bool {
        self.pending.is_some()
    }

    /// Searches actually executed (superseded tickets do not count).
    pub fn searches_run(&self) -> u64 {
        self.searches_run
    }

    // -----------------------------------------------------------------------
    // Input events
    // -----------------------------------------------------------------------

    pub fn focus(&mut self) {
        if !self.mounted {
            return;
        }
        self.pending_close = None;
        self.query.is_open = true;
    }

    /// A keystroke changed the text. Supersedes any pending search and
    /// returns the ticket of the new one.
    pub fn input(&mut self, text: impl Into<String>) -> PendingSearch {
        self.generation += 1;
        let ticket = PendingSearch {
            generation: self.generation,
            delay: self.config.debounce,
        };
        if !self.mounted {
            return ticket;
        }

        self.query.text = text.into();
        self.query.is_open = true;
        self.pending = Some(ticket.generation);
        self.dirty = true;
        self.replace_suggestions(Vec::new());
        trace!(field = %self.field_id(), generation = ticket.generation, "search scheduled");
        ticket
    }

    /// The debounce timer of `ticket` fired. Runs the search if the ticket is
    /// still the live one; returns whether it did.
    pub fn settle(&mut self, ticket: PendingSearch) -> bool {
        if !self.mounted || self.pending != Some(ticket.generation) {
            debug!(field = %self.field_id(), generation = ticket.generation, "stale search dropped");
            return false;
        }
        self.pending = None;
        self.run_search();
        true
    }

    pub fn key(&mut self, key: Key) -> KeyOutcome {
        if !self.mounted || !self.query.is_open {
            return KeyOutcome::default();
        }

        let last = self.suggestions.len() as isize - 1;
        match key {
            Key::ArrowDown => {
                self.query.active_index = (self.query.active_index + 1).min(last);
                KeyOutcome {
                    prevent_default: true,
                    committed: false,
                }
            }
            Key::ArrowUp => {
                self.query.active_index = if last < 0 {
                    -1
                } else {
                    (self.query.active_index - 1).max(0)
                };
                KeyOutcome {
                    prevent_default: true,
                    committed: false,
                }
            }
            Key::Enter => {
                let committed = match self.active_suggestion().cloned() {
                    Some(record) => {
                        self.commit(&record);
                        true
                    }
                    None => false,
                };
                KeyOutcome {
                    prevent_default: true,
                    committed,
                }
            }
            Key::Escape => {
                self.close();
                KeyOutcome {
                    prevent_default: true,
                    committed: false,
                }
            }
            Key::Other => KeyOutcome::default(),
        }
    }

    /// Input lost focus; close after the grace period unless focus returns.
    pub fn blur(&mut self) -> PendingClose {
        self.close_generation += 1;
        let ticket = PendingClose {
            generation: self.close_generation,
            delay: self.config.blur_grace,
        };
        if self.mounted {
            self.pending_close = Some(ticket.generation);
        }
        ticket
    }

    /// The grace timer of `ticket` fired; closes if still pending.
    pub fn close_elapsed(&mut self, ticket: PendingClose) -> bool {
        if !self.mounted || self.pending_close != Some(ticket.generation) {
            return false;
        }
        self.pending_close = None;
        self.close();
        true
    }

    /// Mouse selection of the suggestion at `index`.
    pub fn click(&mut self, index: usize) -> Option<Commit> {
        if !self.mounted || !self.query.is_open {
            return None;
        }
        let record = self.suggestions.get(index).cloned()?;
        Some(self.commit(&record))
    }

    // -----------------------------------------------------------------------
    // Data events
    // -----------------------------------------------------------------------

    /// The active partition finished loading. Returns whether a search was
    /// re-run for a query typed while it was loading.
    pub fn set_dataset(&mut self, dataset: Arc<[R]>) -> bool {
        if !self.mounted {
            return false;
        }
        self.dataset = dataset;
        self.dataset_ready = true;

        if self.awaiting_dataset && self.pending.is_none() {
            debug!(field = %self.field_id(), records = self.dataset.len(), "dataset arrived, re-running search");
            self.run_search();
            return true;
        }
        false
    }

    /// The active partition changed; forget its data and the matches derived
    /// from it until the new one arrives.
    pub fn reset_dataset(&mut self) {
        if !self.mounted {
            return;
        }
        self.dataset = Arc::from(Vec::new());
        self.dataset_ready = false;
        self.replace_suggestions(Vec::new());
        self.awaiting_dataset = self.has_live_query();
    }

    /// Change the country pre-filter; re-runs the current query.
    pub fn set_scope(&mut self, scope: Option<CountryScope>) {
        if !self.mounted || self.scope == scope {
            return;
        }
        self.scope = scope;
        if self.has_live_query() && self.pending.is_none() {
            self.run_search();
        }
    }

    pub fn scope(&self) -> Option<&CountryScope> {
        self.scope.as_ref()
    }

    /// Tear down: cancel pending work; later events and tickets are ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.pending = None;
        self.pending_close = None;
        self.generation += 1;
        debug!(field = %self.field_id(), "unmounted");
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn has_live_query(&self) -> bool {
        self.dirty && !self.query.text.trim().is_empty()
    }

    fn run_search(&mut self) {
        let results = self.matcher.search_scoped(
            &self.dataset,
            &self.query.text,
            self.config.limit,
            self.scope.as_ref(),
        );
        self.searches_run += 1;
        self.awaiting_dataset = !self.dataset_ready && self.has_live_query();
        debug!(
            field = %self.field_id(),
            query = %self.query.text,
            results = results.len(),
            "search executed"
        );
        self.replace_suggestions(results);
    }

    /// New suggestion array; the highlight never outlives the array it
    /// pointed into.
    fn replace_suggestions(&mut self, results: Vec<R>) {
        self.suggestions = Arc::from(results);
        self.query.active_index = -1;
    }

    fn close(&mut self) {
        self.query.is_open = false;
        self.query.active_index = -1;
    }

    fn commit(&mut self, record: &R) -> Commit {
        let commit = self.emitter.commit(record);
        self.query.text = commit.display.clone();
        self.replace_suggestions(Vec::new());
        self.close();
        self.pending = None;
        self.pending_close = None;
        self.dirty = false;
        self.awaiting_dataset = false;
        commit
    }
}
