// SPDX-License-Identifier: AGPL-3.0-or-later

//! # element_store
//!
//! Persistent storage for the positioned elements of certificate templates, supporting both
//! PostgreSQL and SQLite databases.
//!
//! Every element has one row in a shared base table holding its geometry, its kind and its
//! position in the template's stacking order. The kind specific data lives in one table per
//! element kind, text-bearing kinds additionally own a row of typography settings. The main
//! interface is [`SqlStore`] which hides this split and hands out fully typed [`Element`]
//! values.
#![warn(
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

mod config;
pub mod db;
mod observer;
mod storage;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod test_utils;

pub use crate::config::Configuration;
pub use crate::db::errors::{ElementStoreError, Resource};
pub use crate::db::traits::{ElementVariant, TemplateProvider};
pub use crate::db::types::*;
pub use crate::db::{connection_pool, create_database, run_pending_migrations, Pool, SqlStore};
pub use crate::observer::{LogObserver, StoreEvent, StoreObserver};
pub use crate::storage::{MemoryStorage, StorageService};
