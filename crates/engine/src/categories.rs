//! Category list controller, sole writer of the category store.

use std::sync::Arc;

use api_types::category::{Category, CategoryDelete, CategoryNew, CategoryUpdate};

use crate::{
    EngineError, Result,
    client::RemoteApi,
    screen::{LoadTicket, Screen, ScreenStatus},
    store::{CategoryReader, CategoryWriter},
};

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EngineError::validation("Category name cannot be blank"));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug)]
pub struct CategoryController<A> {
    api: A,
    store: CategoryWriter,
    screen: Screen,
    form_open: bool,
    /// A mutation went through; dependents are signalled once the following
    /// reload settles, whether it succeeds or not.
    signal_pending: bool,
    /// Store contents before a delete whose request failed.
    rollback: Option<Arc<[Category]>>,
}

impl<A: RemoteApi> CategoryController<A> {
    pub fn new(api: A, store: CategoryWriter) -> Self {
        Self {
            api,
            store,
            screen: Screen::new(),
            form_open: false,
            signal_pending: false,
            rollback: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn categories(&self) -> Arc<[Category]> {
        self.store.categories()
    }

    /// A reader for screens that depend on categories.
    pub fn reader(&self) -> CategoryReader {
        self.store.reader()
    }

    pub fn version(&self) -> u64 {
        self.store.version()
    }

    pub fn status(&self) -> &ScreenStatus {
        self.screen.status()
    }

    pub fn is_form_open(&self) -> bool {
        self.form_open
    }

    pub fn open_form(&mut self) {
        self.form_open = true;
    }

    pub fn close_form(&mut self) {
        self.form_open = false;
    }

    pub fn mount(&mut self) {
        self.screen.mount();
    }

    pub fn unmount(&mut self) {
        self.screen.unmount();
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.screen.begin_load()
    }

    /// Publishes a fetched list to the store, unless `ticket` is stale.
    ///
    /// A failed load after a failed delete puts the deleted category back.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Vec<Category>>) -> Result<bool> {
        if !self.screen.accepts(ticket) {
            tracing::debug!("dropping stale categories load");
            return Ok(false);
        }

        let outcome = match result {
            Ok(categories) => {
                tracing::debug!("loaded {} categories", categories.len());
                self.rollback = None;
                self.store.set(categories);
                self.screen.ready();
                Ok(true)
            }
            Err(err) => {
                tracing::warn!("failed to load categories: {err}");
                if let Some(previous) = self.rollback.take() {
                    tracing::debug!("restoring categories after failed delete");
                    self.store.set(previous.to_vec());
                }
                self.screen.fail(err.clone());
                Err(err)
            }
        };

        if std::mem::take(&mut self.signal_pending) {
            let version = self.store.signal_change();
            tracing::debug!("categories changed, version {version}");
        }
        outcome
    }

    pub async fn load(&mut self) -> Result<()> {
        let ticket = self.begin_load();
        let result = self.api.list_categories().await;
        self.finish_load(ticket, result).map(|_| ())
    }

    pub fn prepare_add(&self, name: &str) -> Result<CategoryNew> {
        Ok(CategoryNew {
            name: validate_name(name)?,
        })
    }

    pub fn prepare_edit(&self, category_id: i64, name: &str) -> Result<CategoryUpdate> {
        Ok(CategoryUpdate {
            category_id,
            name: validate_name(name)?,
        })
    }

    /// Records the answer to an add or edit. On success the form closes and
    /// the next reload signals dependents.
    pub fn mutation_finished(&mut self, outcome: &Result<()>) {
        match outcome {
            Ok(()) => {
                tracing::info!("saved category");
                self.form_open = false;
                self.signal_pending = true;
            }
            Err(err) => tracing::warn!("failed to save category: {err}"),
        }
    }

    pub async fn add(&mut self, name: &str) -> Result<()> {
        let payload = self.prepare_add(name)?;
        let outcome = self.api.add_category(&payload).await;
        self.mutation_finished(&outcome);
        outcome?;
        self.load().await
    }

    pub async fn edit(&mut self, category_id: i64, name: &str) -> Result<()> {
        let payload = self.prepare_edit(category_id, name)?;
        let outcome = self.api.edit_category(&payload).await;
        self.mutation_finished(&outcome);
        outcome?;
        self.load().await
    }

    /// Drops the category from the store and returns the request body for
    /// the remote delete.
    pub fn begin_delete(&mut self, category_id: i64) -> CategoryDelete {
        let previous = self.store.categories();
        let remaining = previous
            .iter()
            .filter(|category| category.category_id != category_id)
            .cloned()
            .collect();
        self.store.set(remaining);
        self.rollback = Some(previous);

        CategoryDelete { category_id }
    }

    /// Records the answer to a delete. Dependents are signalled only when the
    /// delete went through.
    pub fn delete_finished(&mut self, category_id: i64, outcome: &Result<()>) {
        match outcome {
            Ok(()) => {
                tracing::info!("deleted category {category_id}");
                self.rollback = None;
                self.signal_pending = true;
            }
            Err(err) => tracing::warn!("failed to delete category {category_id}: {err}"),
        }
    }

    /// Optimistic like spendings: drop locally, delete, reload regardless.
    pub async fn delete(&mut self, category_id: i64) -> Result<()> {
        let payload = self.begin_delete(category_id);
        let outcome = self.api.delete_category(&payload).await;
        self.delete_finished(category_id, &outcome);

        let reload = self.load().await;
        outcome?;
        reload
    }
}
