// crates/refsuggest-core/src/widget.rs

//! # Widget Driver
//!
//! Runs a [`SuggestionController`] on its own tokio task and wires it to the
//! asynchronous world:
//!
//! - UI events arrive over an mpsc channel ([`WidgetHandle`]).
//! - Debounce and blur-grace tickets are armed as `sleep_until` deadlines.
//! - The active partition is loaded through the shared [`DatasetProvider`];
//!   a load that finishes after the user moved to another partition is
//!   ignored.
//! - Locale detection runs concurrently with the initial load of the default
//!   partition and may switch partitions when it completes, unless the user
//!   already picked one.
//!
//! Every change is published as a [`ViewState`] snapshot on a `watch`
//! channel. After unmount the task stops and later events are dropped.

use crate::common::country_options;
use crate::controller::{
    ControllerConfig, DropdownState, Key, KeyOutcome, PendingClose, PendingSearch,
    SuggestionController,
};
use crate::emitter::SelectionEmitter;
use crate::loader::{DatasetProvider, DatasetSource, LoadOutcome};
use crate::locale::{GeoLocator, Locale, LocaleResolver, PartitionKey, PartitionSelection};
use crate::traits::ReferenceRecord;
use std::future::{pending, Future};
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

const EVENT_BUFFER: usize = 64;

type DetectFuture = Pin<Box<dyn Future<Output = Locale> + Send>>;

/// Input events of one autocomplete field.
#[derive(Debug)]
pub enum UiEvent {
    Focus,
    Blur,
    Input(String),
    Key(Key, oneshot::Sender<KeyOutcome>),
    /// Mouse-down on the suggestion at this index.
    Click(usize),
    SelectPartition(PartitionKey),
    SelectCountry(String),
    Unmount,
}

/// Snapshot of everything a renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<R> {
    pub text: String,
    pub suggestions: Arc<[R]>,
    pub active_index: isize,
    pub dropdown: DropdownState,
    /// The active partition is still being fetched.
    pub loading: bool,
    pub partition: PartitionKey,
    /// Country choices offered by the loaded dataset.
    pub countries: Arc<[String]>,
    pub searches_run: u64,
    pub mounted: bool,
}

/// Configures and spawns a widget task.
pub struct SuggestWidget<R, S> {
    emitter: SelectionEmitter,
    provider: DatasetProvider<R, S>,
    config: ControllerConfig,
    selection: PartitionSelection,
    detect: Option<DetectFuture>,
}

impl<R: ReferenceRecord, S: DatasetSource> SuggestWidget<R, S> {
    pub fn new(emitter: SelectionEmitter, provider: DatasetProvider<R, S>) -> Self {
        Self {
            emitter,
            provider,
            config: ControllerConfig::default(),
            selection: PartitionSelection::new(PartitionKey::default()),
            detect: None,
        }
    }

    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Partition loaded before (or instead of) locale detection.
    pub fn with_default_partition(mut self, key: PartitionKey) -> Self {
        self.selection = PartitionSelection::new(key);
        self
    }

    /// Detect the caller's locale once the widget starts.
    pub fn with_resolver<G: GeoLocator>(mut self, resolver: Arc<LocaleResolver<G>>) -> Self {
        self.detect = Some(Box::pin(async move { resolver.resolve_locale().await }));
        self
    }

    /// Start the widget task. Must be called from within a tokio runtime.
    pub fn spawn(self) -> WidgetHandle<R> {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let partition = self.selection.active();
        let (view_tx, view_rx) = watch::channel(ViewState {
            text: String::new(),
            suggestions: Arc::from(Vec::new()),
            active_index: -1,
            dropdown: DropdownState::Closed,
            loading: false,
            partition,
            countries: Arc::from(Vec::new()),
            searches_run: 0,
            mounted: true,
        });

        let mut actor = Actor {
            ctrl: SuggestionController::new(self.emitter, self.config),
            provider: self.provider,
            selection: self.selection,
            events: events_rx,
            view: view_tx,
            search: None,
            close: None,
            load: None,
            detect: self.detect.map(tokio::spawn),
            countries: Arc::from(Vec::new()),
        };
        actor.switch_partition();
        actor.ctrl.set_scope(actor.selection.scope());
        actor.publish();

        tokio::spawn(actor.run());
        WidgetHandle {
            events: events_tx,
            view: view_rx,
        }
    }
}

/// Cheap, cloneable front of a running widget.
///
/// Sends to a widget that has stopped are silently dropped.
pub struct WidgetHandle<R> {
    events: mpsc::Sender<UiEvent>,
    view: watch::Receiver<ViewState<R>>,
}

impl<R> Clone for WidgetHandle<R> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
            view: self.view.clone(),
        }
    }
}

impl<R: ReferenceRecord> WidgetHandle<R> {
    pub async fn focus(&self) {
        self.send(UiEvent::Focus).await;
    }

    pub async fn blur(&self) {
        self.send(UiEvent::Blur).await;
    }

    pub async fn input(&self, text: impl Into<String>) {
        self.send(UiEvent::Input(text.into())).await;
    }

    /// Deliver a key press and report what the host should do with it.
    pub async fn key(&self, key: Key) -> KeyOutcome {
        let (tx, rx) = oneshot::channel();
        self.send(UiEvent::Key(key, tx)).await;
        rx.await.unwrap_or_default()
    }

    pub async fn click(&self, index: usize) {
        self.send(UiEvent::Click(index)).await;
    }

    pub async fn select_partition(&self, key: PartitionKey) {
        self.send(UiEvent::SelectPartition(key)).await;
    }

    pub async fn select_country(&self, country: impl Into<String>) {
        self.send(UiEvent::SelectCountry(country.into())).await;
    }

    /// Stop the widget and wait until its task has exited.
    pub async fn unmount(&self) {
        self.send(UiEvent::Unmount).await;
        self.events.closed().await;
    }

    /// Latest published snapshot.
    pub fn view(&self) -> ViewState<R> {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<R>> {
        self.view.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.events.is_closed()
    }

    async fn send(&self, event: UiEvent) {
        if self.events.send(event).await.is_err() {
            debug!("event sent to a stopped widget");
        }
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

struct Actor<R, S> {
    ctrl: SuggestionController<R>,
    provider: DatasetProvider<R, S>,
    selection: PartitionSelection,
    events: mpsc::Receiver<UiEvent>,
    view: watch::Sender<ViewState<R>>,
    search: Option<(PendingSearch, Instant)>,
    close: Option<(PendingClose, Instant)>,
    load: Option<JoinHandle<(PartitionKey, LoadOutcome<R>)>>,
    detect: Option<JoinHandle<Locale>>,
    countries: Arc<[String]>,
}

impl<R: ReferenceRecord, S: DatasetSource> Actor<R, S> {
    async fn run(mut self) {
        loop {
            let search_at = self.search.map(|(_, at)| at);
            let close_at = self.close.map(|(_, at)| at);

            tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => {
                        if !self.handle(event) {
                            break;
                        }
                    }
                    None => {
                        self.ctrl.unmount();
                        break;
                    }
                },
                _ = sleep_opt(search_at) => {
                    if let Some((ticket, _)) = self.search.take() {
                        self.ctrl.settle(ticket);
                    }
                }
                _ = sleep_opt(close_at) => {
                    if let Some((ticket, _)) = self.close.take() {
                        self.ctrl.close_elapsed(ticket);
                    }
                }
                loaded = join_opt(&mut self.load) => {
                    self.load = None;
                    self.on_loaded(loaded);
                }
                detected = join_opt(&mut self.detect) => {
                    self.detect = None;
                    self.on_detected(detected);
                }
            }
            self.publish();
        }

        if let Some(detect) = self.detect.take() {
            detect.abort();
        }
        self.publish();
        debug!(field = %self.ctrl.field_id(), "widget stopped");
    }

    /// Returns `false` once the widget should stop.
    fn handle(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::Focus => {
                self.ctrl.focus();
                self.close = None;
            }
            UiEvent::Blur => {
                let ticket = self.ctrl.blur();
                self.close = Some((ticket, Instant::now() + ticket.delay));
            }
            UiEvent::Input(text) => {
                let ticket = self.ctrl.input(text);
                self.search = Some((ticket, Instant::now() + ticket.delay));
            }
            UiEvent::Key(key, reply) => {
                let outcome = self.ctrl.key(key);
                if outcome.committed {
                    self.search = None;
                }
                let _ = reply.send(outcome);
            }
            UiEvent::Click(index) => {
                if self.ctrl.click(index).is_some() {
                    self.search = None;
                    self.close = None;
                }
            }
            UiEvent::SelectPartition(key) => {
                let changed = self.selection.select_partition(key);
                self.reselect(changed);
            }
            UiEvent::SelectCountry(country) => {
                let changed = self.selection.select_country(country);
                self.reselect(changed);
            }
            UiEvent::Unmount => {
                self.ctrl.unmount();
                self.search = None;
                self.close = None;
                return false;
            }
        }
        true
    }

    /// Follow a manual selection. Choosing the partition already shown
    /// fetches it again when it has no data and nothing is in flight, which
    /// is how a failed load gets retried.
    fn reselect(&mut self, changed: bool) {
        let idle_without_data =
            self.load.is_none() && self.provider.cached(&self.selection.active()).is_none();
        if changed || idle_without_data {
            self.switch_partition();
        }
        self.ctrl.set_scope(self.selection.scope());
    }

    fn switch_partition(&mut self) {
        let key = self.selection.active();
        self.ctrl.reset_dataset();
        self.countries = Arc::from(Vec::new());

        if let Some(data) = self.provider.cached(&key) {
            debug!(kind = R::KIND, partition = %key, "partition served from cache");
            self.load = None;
            self.install(data);
            return;
        }

        let provider = self.provider.clone();
        self.load = Some(tokio::spawn(async move {
            let outcome = provider.try_load(&key).await;
            (key, outcome)
        }));
    }

    fn on_loaded(&mut self, loaded: Result<(PartitionKey, LoadOutcome<R>), JoinError>) {
        let (key, outcome) = match loaded {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(error = %e, "dataset load task failed");
                self.install(Arc::from(Vec::new()));
                return;
            }
        };
        if key != self.selection.active() {
            debug!(partition = %key, "ignoring load of inactive partition");
            return;
        }
        match outcome {
            Ok(data) => self.install(data),
            // Logged by the provider; searches run against nothing.
            Err(_) => self.install(Arc::from(Vec::new())),
        }
    }

    fn on_detected(&mut self, detected: Result<Locale, JoinError>) {
        let locale = match detected {
            Ok(locale) => locale,
            Err(e) => {
                warn!(error = %e, "locale detection task failed");
                return;
            }
        };
        info!(
            partition = %locale.partition,
            country = ?locale.country_code,
            manual = self.selection.is_manual(),
            "locale resolved"
        );
        if self.selection.apply_detected(locale) {
            self.switch_partition();
        }
        self.ctrl.set_scope(self.selection.scope());
    }

    fn install(&mut self, data: Arc<[R]>) {
        self.countries = Arc::from(country_options(&data));
        self.ctrl.set_dataset(data);
    }

    fn publish(&self) {
        let query = self.ctrl.query();
        let next = ViewState {
            text: query.text.clone(),
            suggestions: Arc::clone(self.ctrl.suggestions()),
            active_index: query.active_index,
            dropdown: self.ctrl.state(),
            loading: self.load.is_some(),
            partition: self.selection.active(),
            countries: Arc::clone(&self.countries),
            searches_run: self.ctrl.searches_run(),
            mounted: self.ctrl.is_mounted(),
        };
        self.view.send_if_modified(|view| {
            if *view == next {
                false
            } else {
                *view = next;
                true
            }
        });
    }
}

async fn sleep_opt(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => pending().await,
    }
}

async fn join_opt<T>(handle: &mut Option<JoinHandle<T>>) -> Result<T, JoinError> {
    match handle {
        Some(handle) => handle.await,
        None => pending().await,
    }
}
