//! The watch over a single device
use super::notifier::{EventKind, Notifier};
use crate::{
    error::{Error, Result, WatchError},
    system::class::Snapshot,
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Everything one device's watch owns.
///
/// Nothing here is shared with other sessions except the sending half of the
/// error channel.
pub(super) struct Session<S, N> {
    pub device: String,
    pub dir: PathBuf,
    pub notifier: Arc<N>,
    pub snapshots: mpsc::Sender<S>,
    pub errors: mpsc::Sender<WatchError>,
    pub cancel: CancellationToken,
}

impl<S: Snapshot, N: Notifier> Session<S, N> {
    /// Run until cancelled, the consumer goes away, or something fails.
    ///
    /// A failure is reported exactly once, on the error channel, after the
    /// subscription has been released and the snapshot channel closed.
    pub async fn run(self) {
        let Self {
            device,
            dir,
            notifier,
            snapshots,
            errors,
            cancel,
        } = self;
        debug!(dir = ?dir, "starting watch");
        match watch(&dir, &*notifier, &snapshots, &cancel).await {
            Ok(()) => debug!("watch stopped"),
            Err(error) => {
                debug!(%error, "watch failed");
                drop(snapshots);
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {}
                    _ = errors.send(WatchError::new(device, error)) => {}
                }
            }
        }
    }
}

/// Deliver the initial snapshot, then one updated snapshot per write.
///
/// Returns `Ok` when stopped through `cancel` or because nobody is receiving
/// snapshots anymore.
async fn watch<S: Snapshot, N: Notifier>(
    dir: &Path,
    notifier: &N,
    snapshots: &mpsc::Sender<S>,
    cancel: &CancellationToken,
) -> Result<()> {
    let mut current = S::read_dir(dir)?;
    let paths: Vec<PathBuf> = S::ATTRIBUTES.iter().map(|a| dir.join(a.name)).collect();
    let mut subscription = notifier.watch(&paths)?;

    if !deliver(snapshots, current.clone(), cancel).await {
        return Ok(());
    }
    loop {
        let event = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            event = subscription.next() => event.ok_or(Error::NotifierClosed)??,
        };
        if event.kind != EventKind::Write {
            trace!(path = ?event.path, "ignoring event");
            continue;
        }
        let attr = match event
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(S::attribute)
        {
            Some(attr) => attr,
            None => {
                trace!(path = ?event.path, "ignoring untracked file");
                continue;
            }
        };
        let next = current.reread(dir, attr)?;
        trace!(attribute = attr.name, "attribute changed");
        if !deliver(snapshots, next.clone(), cancel).await {
            return Ok(());
        }
        current = next;
    }
}

/// Hand `snap` to the consumer, waiting as long as it takes.
///
/// `false` if the session should stop instead.
async fn deliver<S>(snapshots: &mpsc::Sender<S>, snap: S, cancel: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        res = snapshots.send(snap) => res.is_ok(),
    }
}
