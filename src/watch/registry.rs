//! Starting watches for every device of a class
use super::{
    notifier::{NativeNotifier, Notifier},
    session::Session,
};
use crate::{
    error::{Result, WatchError},
    system::class::{devices, Snapshot},
};
use std::{collections::HashMap, path::Path, sync::Arc};
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, debug_span, Instrument};

/// Default capacity of the snapshot and error channels.
///
/// tokio has no zero-capacity channel, this is the closest to a direct
/// handoff.
pub const DEFAULT_CAPACITY: usize = 1;

/// Configuration for starting [`Watches`]
#[derive(Debug, Clone)]
pub struct Registry<N = NativeNotifier> {
    notifier: Arc<N>,
    cancel: CancellationToken,
    capacity: usize,
}

impl Registry {
    /// A registry using the [`NativeNotifier`]
    pub fn new() -> Self {
        Self::with_notifier(NativeNotifier)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Notifier> Registry<N> {
    /// A registry using `notifier` for every session it starts
    pub fn with_notifier(notifier: N) -> Self {
        Self {
            notifier: Arc::new(notifier),
            cancel: CancellationToken::new(),
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Stop every session started by this registry when `parent` is
    /// cancelled.
    pub fn cancel_token(mut self, parent: &CancellationToken) -> Self {
        self.cancel = parent.child_token();
        self
    }

    /// Capacity of the snapshot and error channels, at least 1.
    ///
    /// Defaults to [`DEFAULT_CAPACITY`]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Watch every device under `base` matching the glob `pattern`.
    ///
    /// Devices are enumerated once, now. Each one gets its own session,
    /// spawned onto the current tokio runtime, which first delivers a full
    /// snapshot and then an updated one after every write to a tracked
    /// attribute.
    ///
    /// A session that fails reports on the shared error channel and stops.
    /// Other sessions keep going: failure domains are independent, stop them
    /// through [`Watches::shutdown`] if that's not what you want.
    ///
    /// # Errors
    ///
    /// - If `pattern` is invalid
    /// - If `base` can't be read
    ///
    /// No session is started in either case. No matching devices is not an
    /// error.
    ///
    /// # Panics
    ///
    /// If not called from within a tokio runtime.
    pub fn watch_all<S: Snapshot>(&self, base: &Path, pattern: &str) -> Result<Watches<S>> {
        let names = devices(base, pattern)?;
        debug!(base = ?base, pattern, devices = names.len(), "starting watches");

        let token = self.cancel.child_token();
        let (errors, errors_rx) = mpsc::channel(self.capacity);
        let mut channels = HashMap::with_capacity(names.len());
        let mut sessions = HashMap::with_capacity(names.len());
        for name in names {
            let (snapshots, rx) = mpsc::channel(self.capacity);
            let cancel = token.child_token();
            let session = Session {
                device: name.clone(),
                dir: base.join(&name),
                notifier: Arc::clone(&self.notifier),
                snapshots,
                errors: errors.clone(),
                cancel: cancel.clone(),
            };
            tokio::spawn(session.run().instrument(debug_span!("watch", device = %name)));
            channels.insert(name.clone(), rx);
            sessions.insert(name, cancel);
        }

        Ok(Watches {
            channels,
            sessions,
            errors: errors_rx,
            guard: token.clone().drop_guard(),
            token,
        })
    }
}

/// Live watches over a set of devices, from [`Registry::watch_all`]
///
/// Every session is cancelled when this is dropped, unless it was split up
/// with [`Watches::into_parts`].
#[derive(Debug)]
pub struct Watches<S> {
    channels: HashMap<String, mpsc::Receiver<S>>,
    sessions: HashMap<String, CancellationToken>,
    errors: mpsc::Receiver<WatchError>,
    token: CancellationToken,
    guard: DropGuard,
}

impl<S> Watches<S> {
    /// Names of every watched device, in no particular order.
    pub fn devices(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Snapshots of `device`, or [`None`] if it isn't watched.
    ///
    /// The first snapshot is always a full read at the time the watch
    /// started. The channel closes when the session stops, for whatever
    /// reason.
    pub fn get_mut(&mut self, device: &str) -> Option<&mut mpsc::Receiver<S>> {
        self.channels.get_mut(device)
    }

    /// Errors from every session, each tagged with its device.
    ///
    /// At most one per session. A failing session waits until its error is
    /// received, so keep this drained.
    pub fn errors(&mut self) -> &mut mpsc::Receiver<WatchError> {
        &mut self.errors
    }

    /// Stop watching `device`.
    ///
    /// Its channel stays, and closes once the session has exited.
    /// Returns `false` if `device` isn't watched.
    pub fn stop(&self, device: &str) -> bool {
        match self.sessions.get(device) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Stop every session.
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    /// Token cancelling every session
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Split into the per-device channels, the error channel, and the token
    /// cancelling every session.
    ///
    /// Sessions are no longer stopped on drop, use the token.
    pub fn into_parts(
        self,
    ) -> (
        HashMap<String, mpsc::Receiver<S>>,
        mpsc::Receiver<WatchError>,
        CancellationToken,
    ) {
        let Self {
            channels,
            errors,
            token,
            guard,
            ..
        } = self;
        guard.disarm();
        (channels, errors, token)
    }
}
