//! Shared category store.
//!
//! The store is split into a single [`CategoryWriter`], owned by the category
//! controller, and any number of [`CategoryReader`]s. Replacing the list with
//! [`CategoryWriter::set`] is silent; [`CategoryWriter::signal_change`] bumps
//! the version and wakes readers so they can re-derive their own state.

use std::sync::Arc;

use api_types::category::Category;
use tokio::sync::watch;

use crate::colors;

#[derive(Debug, Clone, Default)]
struct Snapshot {
    version: u64,
    categories: Arc<[Category]>,
}

/// Entry point of the store.
pub struct CategoryStore;

impl CategoryStore {
    /// Creates an empty store at version 0.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (CategoryWriter, CategoryReader) {
        let (tx, rx) = watch::channel(Snapshot::default());
        (CategoryWriter { tx }, CategoryReader { rx })
    }
}

/// Write half of the store. Not `Clone`: there is one writer.
#[derive(Debug)]
pub struct CategoryWriter {
    tx: watch::Sender<Snapshot>,
}

impl CategoryWriter {
    /// Replaces the category list without notifying readers.
    pub fn set(&self, categories: Vec<Category>) {
        self.tx.send_if_modified(|snapshot| {
            snapshot.categories = categories.into();
            false
        });
    }

    /// Increments the version and notifies readers. Returns the new version.
    pub fn signal_change(&self) -> u64 {
        let mut version = 0;
        self.tx.send_modify(|snapshot| {
            snapshot.version += 1;
            version = snapshot.version;
        });
        tracing::debug!("category store advanced to version {version}");
        version
    }

    pub fn categories(&self) -> Arc<[Category]> {
        self.tx.borrow().categories.clone()
    }

    pub fn version(&self) -> u64 {
        self.tx.borrow().version
    }

    /// A new reader that considers the current version already seen.
    pub fn reader(&self) -> CategoryReader {
        CategoryReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read half of the store.
#[derive(Debug, Clone)]
pub struct CategoryReader {
    rx: watch::Receiver<Snapshot>,
}

impl CategoryReader {
    pub fn categories(&self) -> Arc<[Category]> {
        self.rx.borrow().categories.clone()
    }

    pub fn version(&self) -> u64 {
        self.rx.borrow().version
    }

    pub fn get(&self, category_id: i64) -> Option<Category> {
        self.rx
            .borrow()
            .categories
            .iter()
            .find(|category| category.category_id == category_id)
            .cloned()
    }

    pub fn name_of(&self, category_id: i64) -> Option<String> {
        self.get(category_id).map(|category| category.name)
    }

    /// Colour of a category, falling back to the id-derived palette colour
    /// for ids not in the list.
    pub fn color_of(&self, category_id: i64) -> (u8, u8, u8) {
        self.get(category_id)
            .map(|category| colors::category_color(&category))
            .unwrap_or_else(|| colors::default_color(category_id))
    }

    /// Returns `true` if the version advanced since the last [`mark_seen`].
    ///
    /// [`mark_seen`]: CategoryReader::mark_seen
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Marks the current version as seen and returns it.
    pub fn mark_seen(&mut self) -> u64 {
        self.rx.borrow_and_update().version
    }
}
