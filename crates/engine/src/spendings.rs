//! Spending list controller.
//!
//! Holds the spending list shown by the spendings screen, keeps it sorted and
//! re-fetches it after every mutation and whenever the category store
//! signals a change.

use api_types::{
    Amount, TransactionType,
    spending::{Spending, SpendingDelete, SpendingNew, SpendingUpdate},
};
use chrono::{DateTime, Utc};

use crate::{
    EngineError, Result,
    client::RemoteApi,
    colors,
    screen::{LoadTicket, Screen, ScreenStatus},
    sort::{SortDirection, SortKey, SortState, category_label, sort_spendings},
    store::CategoryReader,
};

/// User input for a new spending.
#[derive(Debug, Clone, Default)]
pub struct SpendingForm {
    /// Magnitude as typed; the sign comes from `kind`.
    pub amount: String,
    pub kind: TransactionType,
    pub category_id: Option<i64>,
    pub description: String,
    pub currency: String,
    /// `None` means now.
    pub date_of_spending: Option<DateTime<Utc>>,
}

/// User input for an update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct SpendingEdit {
    pub amount: Option<String>,
    pub kind: Option<TransactionType>,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub currency: Option<String>,
    pub date_of_spending: Option<DateTime<Utc>>,
}

/// A spending joined with its category for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingRow<'a> {
    pub spending: &'a Spending,
    pub category: String,
    pub color: (u8, u8, u8),
}

/// Parses a user-entered magnitude; it must be strictly positive.
pub fn parse_magnitude(input: &str) -> Result<Amount> {
    let amount: Amount = input
        .parse()
        .map_err(|err| EngineError::validation(format!("Amount: {err}")))?;
    if !amount.is_positive() {
        return Err(EngineError::validation("Amount must be a positive number"));
    }
    Ok(amount)
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug)]
pub struct SpendingController<A> {
    api: A,
    categories: CategoryReader,
    items: Vec<Spending>,
    sort: SortState,
    screen: Screen,
    form_open: bool,
    /// List as it was before a delete whose request failed; put back if the
    /// reconciling reload fails too.
    rollback: Option<Vec<Spending>>,
}

impl<A: RemoteApi> SpendingController<A> {
    pub fn new(api: A, categories: CategoryReader) -> Self {
        Self {
            api,
            categories,
            items: Vec::new(),
            sort: SortState::default(),
            screen: Screen::new(),
            form_open: false,
            rollback: None,
        }
    }

    /// The client requests go through, for callers that run them on their own
    /// task.
    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn items(&self) -> &[Spending] {
        &self.items
    }

    pub fn get(&self, spending_id: &str) -> Option<&Spending> {
        self.items
            .iter()
            .find(|spending| spending.spending_id == spending_id)
    }

    pub fn status(&self) -> &ScreenStatus {
        self.screen.status()
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn categories(&self) -> &CategoryReader {
        &self.categories
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

    /// Late results of loads started before this call are dropped.
    pub fn unmount(&mut self) {
        self.screen.unmount();
    }

    /// Rows in display order, with category names resolved from the store.
    pub fn rows(&self) -> Vec<SpendingRow<'_>> {
        let categories = self.categories.categories();
        self.items
            .iter()
            .map(|spending| {
                let category = categories
                    .iter()
                    .find(|category| category.category_id == spending.category_id);
                SpendingRow {
                    spending,
                    category: category_label(&categories, spending.category_id).into_owned(),
                    color: category
                        .map(colors::category_color)
                        .unwrap_or_else(|| colors::default_color(spending.category_id)),
                }
            })
            .collect()
    }

    /// Starts a load. Any version bump seen so far is considered handled.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.categories.mark_seen();
        self.screen.begin_load()
    }

    /// Applies the outcome of the load identified by `ticket`.
    ///
    /// Returns `Ok(false)` when the ticket was superseded or the screen was
    /// unmounted; the result is then dropped. On failure the previous list is
    /// kept and the screen enters the error state.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Vec<Spending>>) -> Result<bool> {
        if !self.screen.accepts(ticket) {
            tracing::debug!("dropping stale spendings load");
            return Ok(false);
        }

        match result {
            Ok(items) => {
                tracing::debug!("loaded {} spendings", items.len());
                self.rollback = None;
                self.items = items;
                self.apply_sort();
                self.screen.ready();
                Ok(true)
            }
            Err(err) => {
                tracing::warn!("failed to load spendings: {err}");
                if let Some(previous) = self.rollback.take() {
                    tracing::debug!("restoring {} spendings after failed delete", previous.len());
                    self.items = previous;
                    self.apply_sort();
                }
                self.screen.fail(err.clone());
                Err(err)
            }
        }
    }

    pub async fn load(&mut self) -> Result<()> {
        let ticket = self.begin_load();
        let result = self.api.list_spendings().await;
        self.finish_load(ticket, result).map(|_| ())
    }

    /// Validates a new spending and builds the request body.
    pub fn prepare_add(&self, form: &SpendingForm) -> Result<SpendingNew> {
        let magnitude = parse_magnitude(&form.amount)?;
        let category_id = form
            .category_id
            .ok_or_else(|| EngineError::validation("Select a category"))?;
        let currency =
            non_blank(&form.currency).ok_or_else(|| EngineError::validation("Currency is required"))?;

        Ok(SpendingNew {
            description: non_blank(&form.description),
            amount: magnitude.signed(form.kind),
            category_id,
            currency: currency.to_uppercase(),
            date_of_spending: form.date_of_spending.unwrap_or_else(Utc::now),
        })
    }

    /// Records the answer to an add or edit. The form closes on success; the
    /// caller reloads afterwards.
    pub fn mutation_finished(&mut self, outcome: &Result<()>) {
        match outcome {
            Ok(()) => {
                tracing::info!("saved spending");
                self.form_open = false;
            }
            Err(err) => tracing::warn!("failed to save spending: {err}"),
        }
    }

    pub async fn add(&mut self, form: &SpendingForm) -> Result<()> {
        let payload = self.prepare_add(form)?;
        let outcome = self.api.add_spending(&payload).await;
        self.mutation_finished(&outcome);
        outcome?;
        self.load().await
    }

    pub async fn edit(&mut self, spending_id: &str, edit: &SpendingEdit) -> Result<()> {
        let payload = self.prepare_edit(spending_id, edit)?;
        let outcome = self.api.edit_spending(&payload).await;
        self.mutation_finished(&outcome);
        outcome?;
        self.load().await
    }

    /// Validates an update and builds a body holding only the changed fields.
    pub fn prepare_edit(&self, spending_id: &str, edit: &SpendingEdit) -> Result<SpendingUpdate> {
        let current = self.get(spending_id);
        let raw_amount = edit.amount.as_deref().and_then(non_blank);

        let amount = match (raw_amount, edit.kind) {
            (Some(raw), kind) => {
                let magnitude = parse_magnitude(&raw)?;
                let kind = kind
                    .or_else(|| current.map(Spending::transaction_type))
                    .ok_or_else(|| EngineError::validation("Select income or spending"))?;
                Some(magnitude.signed(kind))
            }
            (None, Some(kind)) => {
                let current = current
                    .ok_or_else(|| EngineError::validation("Enter an amount"))?;
                (current.transaction_type() != kind).then(|| current.amount.signed(kind))
            }
            (None, None) => None,
        };

        let payload = SpendingUpdate {
            spending_id: spending_id.to_string(),
            description: edit
                .description
                .as_deref()
                .map(|value| value.trim().to_string()),
            amount,
            category_id: edit.category_id,
            currency: edit
                .currency
                .as_deref()
                .and_then(non_blank)
                .map(|value| value.to_uppercase()),
            date_of_spending: edit.date_of_spending,
        };

        if payload.is_empty() {
            return Err(EngineError::validation("Nothing to update"));
        }
        Ok(payload)
    }

    /// Removes the spending locally and returns the request body for the
    /// remote delete.
    pub fn begin_delete(&mut self, spending_id: &str) -> SpendingDelete {
        let previous = self.items.clone();
        self.items
            .retain(|spending| spending.spending_id != spending_id);
        self.rollback = Some(previous);

        SpendingDelete {
            spending_id: spending_id.to_string(),
        }
    }

    /// Records the answer to a delete. The caller reloads in either case; if
    /// the delete failed and that reload fails too, the removed item comes
    /// back.
    pub fn delete_finished(&mut self, spending_id: &str, outcome: &Result<()>) {
        match outcome {
            Ok(()) => {
                tracing::info!("deleted spending {spending_id}");
                self.rollback = None;
            }
            Err(err) => tracing::warn!("failed to delete spending {spending_id}: {err}"),
        }
    }

    /// Removes the spending locally, deletes it remotely, then reloads even if
    /// the delete failed so the list matches the server again.
    pub async fn delete(&mut self, spending_id: &str) -> Result<()> {
        let payload = self.begin_delete(spending_id);
        let outcome = self.api.delete_spending(&payload).await;
        self.delete_finished(spending_id, &outcome);

        let reload = self.load().await;
        outcome?;
        reload
    }

    pub fn sort(&mut self, key: SortKey, direction: SortDirection) {
        self.sort = SortState { key, direction };
        self.apply_sort();
    }

    /// Same key toggles direction, a new key sorts descending.
    pub fn select_sort(&mut self, key: SortKey) {
        self.sort.select(key);
        self.apply_sort();
    }

    fn apply_sort(&mut self) {
        let categories = self.categories.categories();
        sort_spendings(&mut self.items, self.sort, &categories);
    }

    /// Whether the category store advanced since the last load and the screen
    /// can act on it. In the error state the change is kept pending until the
    /// user retries.
    pub fn category_refresh_due(&self) -> bool {
        self.screen.is_mounted()
            && self.categories.has_changed()
            && self.screen.status().error().is_none()
    }

    /// Reloads if [`category_refresh_due`](Self::category_refresh_due).
    pub async fn refresh_on_category_change(&mut self) -> Result<bool> {
        if !self.category_refresh_due() {
            return Ok(false);
        }

        tracing::debug!(
            "categories changed (version {}), reloading spendings",
            self.categories.version()
        );
        self.load().await?;
        Ok(true)
    }
}
