//! Live watches over device attributes
//!
//! A watch reads every attribute of a [`Snapshot`][crate::system::class::Snapshot]
//! once, then waits for the kernel to report writes to those files. After
//! each write only the changed attribute is re-read, and a copy of the
//! previous snapshot with that one value replaced is delivered.
//!
//! # Implementation details
//!
//! Each device is watched by its own tokio task, owning its own
//! [`Subscription`] and current snapshot. Nothing is shared between them
//! except the error channel.
//!
//! Snapshots are delivered in the order writes were observed. Between the
//! [`Notifier`] and a session, at most one write per file is pending: writes
//! to a file that already has one queued are dropped. A consumer that falls
//! behind a burst of writes therefore sees a few snapshots, the last one
//! holding the final value, rather than one per write. Memory stays bounded
//! by the number of watched files. Notifier errors are never dropped.
//!
//! Most sysfs attributes only produce an event when written *through sysfs*,
//! such as a user changing the brightness. Values changed by the hardware on
//! its own, like a battery discharging, usually don't.
pub mod notifier;
mod registry;
mod session;

pub use self::{
    notifier::{queue, Event, EventKind, EventQueue, EventSender, NativeNotifier, Notifier, Subscription},
    registry::{Registry, Watches, DEFAULT_CAPACITY},
};
