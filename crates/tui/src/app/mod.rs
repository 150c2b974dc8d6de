mod form;

use std::{
    future::Future,
    time::{Duration, Instant},
};

use api_types::{category::Category, spending::Spending};
use chrono_tz::Tz;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use engine::{
    CategoryController, CategoryStore, EngineError, HttpClient, LoadTicket, RemoteApi, SortKey,
    SpendingController,
};
use tokio::sync::mpsc;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

pub use form::{Field, FormKind, FormState, format_date};

const TOAST_TTL: Duration = Duration::from_secs(3);
const TICK: Duration = Duration::from_millis(100);

/// Result of a request that ran on its own task.
#[derive(Debug)]
pub enum Completion {
    Spendings(LoadTicket, engine::Result<Vec<Spending>>),
    Categories(LoadTicket, engine::Result<Vec<Category>>),
    SpendingSaved(engine::Result<()>),
    SpendingDeleted(String, engine::Result<()>),
    CategorySaved(engine::Result<()>),
    CategoryDeleted(i64, engine::Result<()>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Spendings,
    Categories,
}

impl Section {
    pub const ALL: [Section; 2] = [Section::Spendings, Section::Categories];

    pub fn label(self) -> &'static str {
        match self {
            Self::Spendings => "Spendings",
            Self::Categories => "Categories",
        }
    }

    fn other(self) -> Self {
        match self {
            Self::Spendings => Self::Categories,
            Self::Categories => Self::Spendings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    /// Error toasts have no expiry and stay until a key is pressed.
    expires_at: Option<Instant>,
}

impl ToastState {
    fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        let expires_at = match level {
            ToastLevel::Error => None,
            ToastLevel::Info | ToastLevel::Success => Some(Instant::now() + TOAST_TTL),
        };
        Self {
            message: message.into(),
            level,
            expires_at,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.expires_at.is_none()
    }
}

pub struct AppState {
    pub section: Section,
    pub spendings: SpendingController<HttpClient>,
    pub categories: CategoryController<HttpClient>,
    pub spending_selected: usize,
    pub category_selected: usize,
    pub form: Option<FormState>,
    pub toast: Option<ToastState>,
    /// Set by the first `x`; a second `x` deletes the selection.
    pub confirm_delete: bool,
    /// A save or delete is in flight; further ones wait for it.
    pub saving: bool,
    pub base_url: String,
    pub db: String,
    pub currency: String,
    pub tz: Tz,
}

impl AppState {
    pub fn selected_spending_id(&self) -> Option<String> {
        self.spendings
            .items()
            .get(self.spending_selected)
            .map(|spending| spending.spending_id.clone())
    }

    pub fn selected_category_id(&self) -> Option<i64> {
        self.categories
            .categories()
            .get(self.category_selected)
            .map(|category| category.category_id)
    }

    fn clamp_selection(&mut self) {
        let spendings = self.spendings.items().len();
        self.spending_selected = self.spending_selected.min(spendings.saturating_sub(1));
        let categories = self.categories.categories().len();
        self.category_selected = self.category_selected.min(categories.saturating_sub(1));
    }

    fn move_selection(&mut self, down: bool) {
        let (selected, len) = match self.section {
            Section::Spendings => (&mut self.spending_selected, self.spendings.items().len()),
            Section::Categories => (
                &mut self.category_selected,
                self.categories.categories().len(),
            ),
        };
        if len == 0 {
            return;
        }
        *selected = if down {
            (*selected + 1).min(len - 1)
        } else {
            selected.saturating_sub(1)
        };
    }

    fn notify(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(ToastState::new(level, message));
    }

    fn report(&mut self, err: &EngineError) {
        tracing::warn!("{err}");
        self.notify(ToastLevel::Error, err.to_string());
    }

    fn expire_toast(&mut self) {
        if let Some(expires_at) = self.toast.as_ref().and_then(|toast| toast.expires_at)
            && Instant::now() >= expires_at
        {
            self.toast = None;
        }
    }
}


pub struct App {
    pub state: AppState,
    should_quit: bool,
    done_tx: mpsc::UnboundedSender<Completion>,
    done_rx: mpsc::UnboundedReceiver<Completion>,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let tz = config.tz()?;
        let client =
            HttpClient::with_timeout(&config.base_url, &config.db, config.request_timeout())?;

        let (writer, _) = CategoryStore::new();
        let categories = CategoryController::new(client.clone(), writer);
        let spendings = SpendingController::new(client, categories.reader());

        let state = AppState {
            section: Section::Spendings,
            spendings,
            categories,
            spending_selected: 0,
            category_selected: 0,
            form: None,
            toast: None,
            confirm_delete: false,
            saving: false,
            base_url: config.base_url.clone(),
            db: config.db.clone(),
            currency: config.currency.clone(),
            tz,
        };
        let (done_tx, done_rx) = mpsc::unbounded_channel();

        Ok(Self {
            state,
            should_quit: false,
            done_tx,
            done_rx,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        ui::restore_terminal(&mut terminal)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        tracing::info!(
            "starting against {} (db {})",
            self.state.base_url,
            self.state.db
        );

        self.load_categories();
        self.load_spendings();

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            // Requests keep running on the runtime workers while this waits.
            if event::poll(TICK)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key);
            }

            while let Ok(done) = self.done_rx.try_recv() {
                self.apply(done);
            }
            self.state.expire_toast();
            if self.state.spendings.category_refresh_due() {
                self.load_spendings();
            }
        }

        Ok(())
    }

    fn spawn(&self, request: impl Future<Output = Completion> + Send + 'static) {
        let done_tx = self.done_tx.clone();
        tokio::spawn(async move {
            // The receiver only goes away when the app is shutting down.
            let _ = done_tx.send(request.await);
        });
    }

    fn load_spendings(&mut self) {
        let ticket = self.state.spendings.begin_load();
        let api = self.state.spendings.api().clone();
        self.spawn(async move { Completion::Spendings(ticket, api.list_spendings().await) });
    }

    fn load_categories(&mut self) {
        let ticket = self.state.categories.begin_load();
        let api = self.state.categories.api().clone();
        self.spawn(async move { Completion::Categories(ticket, api.list_categories().await) });
    }

    fn apply(&mut self, done: Completion) {
        match done {
            Completion::Spendings(ticket, result) => {
                if let Err(err) = self.state.spendings.finish_load(ticket, result) {
                    self.state.report(&err);
                }
            }
            Completion::Categories(ticket, result) => {
                if let Err(err) = self.state.categories.finish_load(ticket, result) {
                    self.state.report(&err);
                }
            }
            Completion::SpendingSaved(outcome) => {
                self.state.saving = false;
                self.state.spendings.mutation_finished(&outcome);
                if !self.state.spendings.is_form_open() {
                    self.state.form = None;
                }
                self.mutation_answered(&outcome, "Saved");
                if outcome.is_ok() {
                    self.load_spendings();
                }
            }
            Completion::SpendingDeleted(spending_id, outcome) => {
                self.state.saving = false;
                self.state.spendings.delete_finished(&spending_id, &outcome);
                self.mutation_answered(&outcome, "Deleted");
                if self.state.section == Section::Spendings {
                    self.load_spendings();
                }
            }
            Completion::CategorySaved(outcome) => {
                self.state.saving = false;
                self.state.categories.mutation_finished(&outcome);
                if !self.state.categories.is_form_open() {
                    self.state.form = None;
                }
                self.mutation_answered(&outcome, "Saved");
                if outcome.is_ok() {
                    self.load_categories();
                }
            }
            Completion::CategoryDeleted(category_id, outcome) => {
                self.state.saving = false;
                self.state.categories.delete_finished(category_id, &outcome);
                self.mutation_answered(&outcome, "Deleted");
                self.load_categories();
            }
        }
        self.state.clamp_selection();
    }

    fn mutation_answered(&mut self, outcome: &engine::Result<()>, message: &str) {
        match outcome {
            Ok(()) => self.state.notify(ToastLevel::Success, message),
            Err(err) => self.state.report(err),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = map_key(key);

        if self.state.toast.as_ref().is_some_and(ToastState::is_blocking) {
            if action == AppAction::Quit && self.state.form.is_none() {
                self.should_quit = true;
            }
            self.state.toast = None;
            return;
        }

        if self.state.form.is_some() {
            self.handle_form_key(action);
            return;
        }

        if action != AppAction::Input('x') {
            self.state.confirm_delete = false;
        }

        match action {
            AppAction::Quit | AppAction::Input('q') => self.should_quit = true,
            AppAction::NextField => self.switch_section(),
            AppAction::Up | AppAction::Input('k') => self.state.move_selection(false),
            AppAction::Down | AppAction::Input('j') => self.state.move_selection(true),
            AppAction::Input('n') => self.open_add_form(),
            AppAction::Input('e') | AppAction::Submit => self.open_edit_form(),
            AppAction::Input('x') => self.delete_selected(),
            AppAction::Input('r') => self.refresh(),
            AppAction::Input('1') => self.select_sort(SortKey::Date),
            AppAction::Input('2') => self.select_sort(SortKey::Amount),
            AppAction::Input('3') => self.select_sort(SortKey::Category),
            AppAction::Cancel => self.state.toast = None,
            _ => {}
        }
    }

    fn handle_form_key(&mut self, action: AppAction) {
        let categories = self.state.categories.categories();
        let Some(form) = self.state.form.as_mut() else {
            return;
        };

        match action {
            AppAction::Quit => self.should_quit = true,
            AppAction::Cancel => self.close_form(),
            AppAction::NextField | AppAction::Down => form.next_field(),
            AppAction::Up => form.prev_field(),
            AppAction::Left => form.cycle(false, &categories),
            AppAction::Right => form.cycle(true, &categories),
            AppAction::Input(' ') if form.focused().is_picker() => form.cycle(true, &categories),
            AppAction::Input(ch) => form.input(ch),
            AppAction::Backspace => form.backspace(),
            AppAction::Submit => self.submit_form(),
            AppAction::None => {}
        }
    }

    fn switch_section(&mut self) {
        let next = self.state.section.other();
        self.state.section = next;
        match next {
            Section::Spendings => {
                self.state.spendings.mount();
                self.load_spendings();
            }
            Section::Categories => {
                self.state.spendings.unmount();
                self.load_categories();
            }
        }
        self.state.clamp_selection();
    }

    fn refresh(&mut self) {
        match self.state.section {
            Section::Spendings => self.load_spendings(),
            Section::Categories => self.load_categories(),
        }
    }

    fn select_sort(&mut self, key: SortKey) {
        if self.state.section == Section::Spendings {
            self.state.spendings.select_sort(key);
            self.state.spending_selected = 0;
        }
    }

    fn open_add_form(&mut self) {
        let form = match self.state.section {
            Section::Spendings => {
                self.state.spendings.open_form();
                FormState::add_spending(&self.state.currency, &self.state.categories.categories())
            }
            Section::Categories => {
                self.state.categories.open_form();
                FormState::add_category()
            }
        };
        self.state.form = Some(form);
    }

    fn open_edit_form(&mut self) {
        let form = match self.state.section {
            Section::Spendings => {
                let Some(spending) = self.state.spendings.items().get(self.state.spending_selected)
                else {
                    return;
                };
                let form = FormState::edit_spending(spending, self.state.tz);
                self.state.spendings.open_form();
                form
            }
            Section::Categories => {
                let categories = self.state.categories.categories();
                let Some(category) = categories.get(self.state.category_selected) else {
                    return;
                };
                self.state.categories.open_form();
                FormState::edit_category(category)
            }
        };
        self.state.form = Some(form);
    }

    fn close_form(&mut self) {
        self.state.form = None;
        self.state.spendings.close_form();
        self.state.categories.close_form();
    }

    fn submit_form(&mut self) {
        if self.state.saving {
            return;
        }
        let Some(form) = self.state.form.clone() else {
            return;
        };

        match self.start_submit(&form) {
            Ok(()) => self.state.saving = true,
            Err(err) => self.state.report(&err),
        }
    }

    /// Validates the form and sends it on a background task.
    fn start_submit(&mut self, form: &FormState) -> engine::Result<()> {
        let tz = self.state.tz;
        match &form.kind {
            FormKind::AddSpending => {
                let payload = self.state.spendings.prepare_add(&form.spending_form(tz)?)?;
                let api = self.state.spendings.api().clone();
                self.spawn(async move {
                    Completion::SpendingSaved(api.add_spending(&payload).await)
                });
            }
            FormKind::EditSpending(spending_id) => {
                let payload = self
                    .state
                    .spendings
                    .prepare_edit(spending_id, &form.spending_edit(tz)?)?;
                let api = self.state.spendings.api().clone();
                self.spawn(async move {
                    Completion::SpendingSaved(api.edit_spending(&payload).await)
                });
            }
            FormKind::AddCategory => {
                let payload = self.state.categories.prepare_add(&form.name)?;
                let api = self.state.categories.api().clone();
                self.spawn(async move {
                    Completion::CategorySaved(api.add_category(&payload).await)
                });
            }
            FormKind::EditCategory(category_id) => {
                let payload = self.state.categories.prepare_edit(*category_id, &form.name)?;
                let api = self.state.categories.api().clone();
                self.spawn(async move {
                    Completion::CategorySaved(api.edit_category(&payload).await)
                });
            }
        }
        Ok(())
    }

    fn delete_selected(&mut self) {
        if self.state.saving {
            return;
        }
        if !self.state.confirm_delete {
            let has_selection = match self.state.section {
                Section::Spendings => self.state.selected_spending_id().is_some(),
                Section::Categories => self.state.selected_category_id().is_some(),
            };
            if has_selection {
                self.state.confirm_delete = true;
                self.state
                    .notify(ToastLevel::Info, "Press x again to delete");
            }
            return;
        }
        self.state.confirm_delete = false;

        match self.state.section {
            Section::Spendings => {
                let Some(spending_id) = self.state.selected_spending_id() else {
                    return;
                };
                let payload = self.state.spendings.begin_delete(&spending_id);
                let api = self.state.spendings.api().clone();
                self.spawn(async move {
                    let outcome = api.delete_spending(&payload).await;
                    Completion::SpendingDeleted(payload.spending_id, outcome)
                });
            }
            Section::Categories => {
                let Some(category_id) = self.state.selected_category_id() else {
                    return;
                };
                let payload = self.state.categories.begin_delete(category_id);
                let api = self.state.categories.api().clone();
                self.spawn(async move {
                    Completion::CategoryDeleted(category_id, api.delete_category(&payload).await)
                });
            }
        }
        self.state.saving = true;
        self.state.clamp_selection();
    }
}
