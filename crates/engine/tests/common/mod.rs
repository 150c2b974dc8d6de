#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use api_types::{
    Amount,
    category::{Category, CategoryDelete, CategoryNew, CategoryUpdate},
    spending::{Spending, SpendingDelete, SpendingNew, SpendingUpdate},
};
use chrono::{DateTime, TimeZone, Utc};
use engine::{EngineError, RemoteApi, Result};
use uuid::Uuid;

/// In-memory stand-in for the spendings service.
#[derive(Debug, Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub categories: Vec<Category>,
    pub spendings: Vec<Spending>,
    pub calls: Vec<&'static str>,
    /// Returned by the next call, whatever it is.
    pub fail_next: Option<EngineError>,
    /// Makes every list call fail until cleared.
    pub lists_down: bool,
    pub last_spending_new: Option<SpendingNew>,
    pub last_spending_update: Option<SpendingUpdate>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(categories: &[(i64, &str)]) -> Self {
        let api = Self::new();
        api.lock().categories = categories
            .iter()
            .map(|(id, name)| category(*id, name))
            .collect();
        api
    }

    pub fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn seed_spending(&self, spending: Spending) {
        self.lock().spendings.push(spending);
    }

    pub fn fail_next(&self, err: EngineError) {
        self.lock().fail_next = Some(err);
    }

    pub fn set_lists_down(&self, down: bool) {
        self.lock().lists_down = down;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn enter(&self, call: &'static str) -> Result<MutexGuard<'_, FakeState>> {
        let mut state = self.lock();
        state.calls.push(call);
        if let Some(err) = state.fail_next.take() {
            return Err(err);
        }
        Ok(state)
    }

    fn enter_list(&self, call: &'static str) -> Result<MutexGuard<'_, FakeState>> {
        let state = self.enter(call)?;
        if state.lists_down {
            return Err(network_down());
        }
        Ok(state)
    }
}

impl RemoteApi for FakeApi {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.enter_list("list_categories")?.categories.clone())
    }

    async fn add_category(&self, payload: &CategoryNew) -> Result<()> {
        let mut state = self.enter("add_category")?;
        let id = state
            .categories
            .iter()
            .map(|category| category.category_id)
            .max()
            .unwrap_or(0)
            + 1;
        state.categories.push(category(id, &payload.name));
        Ok(())
    }

    async fn edit_category(&self, payload: &CategoryUpdate) -> Result<()> {
        let mut state = self.enter("edit_category")?;
        let category = state
            .categories
            .iter_mut()
            .find(|category| category.category_id == payload.category_id)
            .ok_or_else(not_found)?;
        category.name = payload.name.clone();
        Ok(())
    }

    async fn delete_category(&self, payload: &CategoryDelete) -> Result<()> {
        let mut state = self.enter("delete_category")?;
        let before = state.categories.len();
        state
            .categories
            .retain(|category| category.category_id != payload.category_id);
        if state.categories.len() == before {
            return Err(not_found());
        }
        Ok(())
    }

    async fn list_spendings(&self) -> Result<Vec<Spending>> {
        Ok(self.enter_list("list_spendings")?.spendings.clone())
    }

    async fn add_spending(&self, payload: &SpendingNew) -> Result<()> {
        let mut state = self.enter("add_spending")?;
        let spending = Spending {
            spending_id: Uuid::new_v4().to_string(),
            amount: payload.amount,
            description: payload.description.clone(),
            category_id: payload.category_id,
            date_of_spending: payload.date_of_spending,
            currency: payload.currency.clone(),
        };
        state.spendings.push(spending);
        state.last_spending_new = Some(SpendingNew {
            description: payload.description.clone(),
            amount: payload.amount,
            category_id: payload.category_id,
            currency: payload.currency.clone(),
            date_of_spending: payload.date_of_spending,
        });
        Ok(())
    }

    async fn edit_spending(&self, payload: &SpendingUpdate) -> Result<()> {
        let mut state = self.enter("edit_spending")?;
        let spending = state
            .spendings
            .iter_mut()
            .find(|spending| spending.spending_id == payload.spending_id)
            .ok_or_else(not_found)?;
        if let Some(description) = &payload.description {
            spending.description = Some(description.clone());
        }
        if let Some(amount) = payload.amount {
            spending.amount = amount;
        }
        if let Some(category_id) = payload.category_id {
            spending.category_id = category_id;
        }
        if let Some(currency) = &payload.currency {
            spending.currency = currency.clone();
        }
        if let Some(date) = payload.date_of_spending {
            spending.date_of_spending = date;
        }
        state.last_spending_update = Some(SpendingUpdate {
            spending_id: payload.spending_id.clone(),
            description: payload.description.clone(),
            amount: payload.amount,
            category_id: payload.category_id,
            currency: payload.currency.clone(),
            date_of_spending: payload.date_of_spending,
        });
        Ok(())
    }

    async fn delete_spending(&self, payload: &SpendingDelete) -> Result<()> {
        let mut state = self.enter("delete_spending")?;
        let before = state.spendings.len();
        state
            .spendings
            .retain(|spending| spending.spending_id != payload.spending_id);
        if state.spendings.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}

pub fn category(id: i64, name: &str) -> Category {
    Category {
        category_id: id,
        name: name.to_string(),
        color: None,
    }
}

pub fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

pub fn spending(id: &str, cents: i64, category_id: i64, when: DateTime<Utc>) -> Spending {
    Spending {
        spending_id: id.to_string(),
        amount: Amount::new(cents),
        description: None,
        category_id,
        date_of_spending: when,
        currency: "HKD".to_string(),
    }
}

pub fn server_error(status: u16) -> EngineError {
    EngineError::Remote {
        status,
        message: "boom".to_string(),
    }
}

pub fn network_down() -> EngineError {
    EngineError::Network("connection refused".to_string())
}

fn not_found() -> EngineError {
    EngineError::Remote {
        status: 404,
        message: "not found".to_string(),
    }
}
