//! # Vault
//!
//! The single entry point for every user-facing operation. A vault wraps a
//! document [`Store`], a [`BlobStorage`] and a [`Notifier`], and every
//! operation that carries an acting user passes through the access guard
//! before touching the tree.
//!
//! Minimum roles:
//!
//! | operation                                         | minimum |
//! |---------------------------------------------------|---------|
//! | reads (list, get, count, path, url)               | any     |
//! | create / rename / upload / delete content         | editor  |
//! | rename dataroom                                   | editor  |
//! | invite, list access, change role, revoke          | admin   |
//! | delete dataroom                                   | owner   |
//!
//! Multi-step operations (cascading deletes in particular) are not wrapped
//! in a transaction: a failure part way leaves a strict subset of the tree
//! deleted and is reported as-is.

mod access;
mod auth;
mod cascade;
mod error;
mod files;
mod folders;
mod guard;
mod rooms;
mod search;

pub use cascade::CascadeReport;
pub use error::{Entity, VaultError};
pub use files::NewFile;
pub use search::{filter_results, SearchKind, SearchResult, PATH_SEPARATOR};

use std::sync::Arc;

use crate::blobs::BlobStorage;
use crate::notify::{Notifier, TracingNotifier};
use crate::store::Store;

#[derive(Debug, Clone)]
pub struct Vault<S: Store, B: BlobStorage> {
    store: S,
    blobs: B,
    notifier: Arc<dyn Notifier>,
}

impl<S: Store, B: BlobStorage> Vault<S, B> {
    /// A vault whose invitation notices go to the log.
    pub fn new(store: S, blobs: B) -> Self {
        Self {
            store,
            blobs,
            notifier: Arc::new(TracingNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }
}
