//! # Offline Storage
//!
//! The two durable stores the offline-first client relies on:
//!
//! - **Operation Queue** (`queue.rs`): mutations waiting for connectivity, replayed
//!   in insertion order by the sync engine
//! - **Mirror Store** (`mirror.rs`): per-user cache of templates and sessions for
//!   offline rendering, including unsynced records created offline
//!
//! Only the request gateway appends to the queue and only the sync engine removes
//! from it. The mirror is written by the gateway's offline-create hook and by the
//! reload path.

pub mod mirror;
pub mod queue;

pub use crate::client::local_db::{MirrorKind, MirrorRecord, QueuedOperation};
pub use mirror::MirrorStore;
pub use queue::OperationQueue;
