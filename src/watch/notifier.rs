//! Change notification for attribute files
//!
//! [`Notifier`] is the seam between a watch session and whatever tells it a
//! file was written. [`NativeNotifier`] uses the platform's native mechanism,
//! inotify on Linux, through the `notify` crate.
//!
//! Events travel from the notifier to the session through a bounded
//! [`queue`] holding at most one event per file and kind. While a consumer
//! is stalled, repeated writes to the same file collapse into the one event
//! already queued, which re-reads the latest contents once received.
use crate::error::{Error, Result};
use notify::{
    event::{DataChange, ModifyKind},
    Config,
    RecommendedWatcher,
    RecursiveMode,
    Watcher,
};
use std::{
    collections::HashSet,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
        Mutex,
        MutexGuard,
        PoisonError,
    },
};
use tokio::sync::mpsc;

/// What happened to a watched file
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// File contents were written
    Write,

    /// Anything else, such as metadata or permission changes
    Other,
}

/// A change to one watched file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub path: PathBuf,
    pub kind: EventKind,
}

impl Event {
    pub fn new(path: impl Into<PathBuf>, kind: EventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Something that can watch a set of files for changes
pub trait Notifier: Send + Sync + 'static {
    /// Start watching `paths`.
    ///
    /// Events stop, and any underlying resources are released, when the
    /// returned [`Subscription`] is dropped.
    fn watch(&self, paths: &[PathBuf]) -> Result<Subscription>;
}

type Pending = Arc<Mutex<HashSet<(PathBuf, EventKind)>>>;

fn lock(pending: &Pending) -> MutexGuard<'_, HashSet<(PathBuf, EventKind)>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A bounded queue of events for one [`Subscription`].
///
/// At most one event per path and [`EventKind`] is queued at a time: an event
/// arriving while an identical one is still waiting to be received is
/// dropped. Room for one error is always kept, and only the first error is
/// queued.
///
/// `watched` is how many paths events will be reported for.
pub fn queue(watched: usize) -> (EventSender, EventQueue) {
    let (tx, rx) = mpsc::channel(watched * 2 + 1);
    let pending = Pending::default();
    (
        EventSender {
            tx,
            pending: Arc::clone(&pending),
            failed: Arc::new(AtomicBool::new(false)),
        },
        EventQueue { rx, pending },
    )
}

/// Sending half of [`queue`], for [`Notifier`] implementations
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<Result<Event>>,
    pending: Pending,
    failed: Arc<AtomicBool>,
}

impl EventSender {
    /// Queue `event`, unless an identical one is already waiting.
    ///
    /// Returns `false` once the [`Subscription`] is gone.
    pub fn send(&self, event: Event) -> bool {
        if self.tx.is_closed() {
            return false;
        }
        if self.failed.load(Ordering::Acquire) {
            return true;
        }
        let key = (event.path.clone(), event.kind);
        let mut pending = lock(&self.pending);
        if !pending.insert(key.clone()) {
            return true;
        }
        // The last slot belongs to `fail`
        if self.tx.capacity() <= 1 {
            pending.remove(&key);
            return true;
        }
        match self.tx.try_send(Ok(event)) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                pending.remove(&key);
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    /// Queue a terminal error.
    ///
    /// Only the first one is kept, and it is never dropped in favour of
    /// events.
    pub fn fail(&self, error: Error) {
        let _pending = lock(&self.pending);
        if !self.failed.swap(true, Ordering::AcqRel) {
            let _ = self.tx.try_send(Err(error));
        }
    }

    /// Whether the [`Subscription`] has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half of [`queue`], see [`Subscription::new`]
#[derive(Debug)]
pub struct EventQueue {
    rx: mpsc::Receiver<Result<Event>>,
    pending: Pending,
}

/// A live [`Notifier::watch`]
///
/// An `Err` from [`Subscription::next`] is terminal for the subscription.
pub struct Subscription {
    events: EventQueue,
    _handle: Box<dyn Send>,
}

impl Subscription {
    /// Create a subscription from a stream of `events`.
    ///
    /// `handle` is kept alive as long as the subscription, and dropped with
    /// it.
    pub fn new(events: EventQueue, handle: impl Send + 'static) -> Self {
        Self {
            events,
            _handle: Box::new(handle),
        }
    }

    /// The next event, or [`None`] if the notifier went away.
    ///
    /// Once an event is returned, an identical one can be queued again.
    pub async fn next(&mut self) -> Option<Result<Event>> {
        let next = self.events.rx.recv().await?;
        if let Ok(event) = &next {
            lock(&self.events.pending).remove(&(event.path.clone(), event.kind));
        }
        Some(next)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

/// The platform's native change notification
///
/// One inotify instance, or equivalent, is held per [`Subscription`].
#[derive(Debug, Default, Copy, Clone)]
pub struct NativeNotifier;

impl NativeNotifier {
    fn kind(kind: &notify::EventKind) -> EventKind {
        use notify::EventKind as K;
        match kind {
            K::Modify(ModifyKind::Data(DataChange::Any | DataChange::Content | DataChange::Size))
            | K::Modify(ModifyKind::Any) => EventKind::Write,
            _ => EventKind::Other,
        }
    }
}

impl Notifier for NativeNotifier {
    fn watch(&self, paths: &[PathBuf]) -> Result<Subscription> {
        let (tx, rx) = queue(paths.len());
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| match res {
                Ok(event) => {
                    let kind = Self::kind(&event.kind);
                    for path in event.paths {
                        // Receiver is gone once the subscription is dropped
                        if !tx.send(Event::new(path, kind)) {
                            break;
                        }
                    }
                }
                Err(e) => tx.fail(Error::Notify(e)),
            },
            Config::default(),
        )?;
        for path in paths {
            watcher.watch(path, RecursiveMode::NonRecursive)?;
        }
        Ok(Subscription::new(rx, watcher))
    }
}
