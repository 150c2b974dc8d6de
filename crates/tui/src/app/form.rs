//! Input state of the add/edit overlay.

use api_types::{TransactionType, category::Category, spending::Spending};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use engine::{EngineError, SpendingEdit, SpendingForm};

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    AddSpending,
    EditSpending(String),
    AddCategory,
    EditCategory(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Amount,
    Type,
    Category,
    Currency,
    Date,
    Description,
    Name,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Self::Amount => "Amount",
            Self::Type => "Type",
            Self::Category => "Category",
            Self::Currency => "Currency",
            Self::Date => "Date",
            Self::Description => "Description",
            Self::Name => "Name",
        }
    }

    /// Picker fields cycle through values instead of taking text.
    pub fn is_picker(self) -> bool {
        matches!(self, Self::Type | Self::Category)
    }
}

const SPENDING_FIELDS: [Field; 6] = [
    Field::Amount,
    Field::Type,
    Field::Category,
    Field::Currency,
    Field::Date,
    Field::Description,
];
const CATEGORY_FIELDS: [Field; 1] = [Field::Name];

/// Values of the spending being edited, in form representation.
#[derive(Debug, Clone)]
struct Original {
    amount: String,
    kind: TransactionType,
    category_id: i64,
    currency: String,
    date: String,
    description: String,
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub kind: FormKind,
    focus: usize,
    pub amount: String,
    pub tx_type: TransactionType,
    pub category_id: Option<i64>,
    pub currency: String,
    pub date: String,
    pub description: String,
    pub name: String,
    original: Option<Original>,
}

impl FormState {
    fn blank(kind: FormKind) -> Self {
        Self {
            kind,
            focus: 0,
            amount: String::new(),
            tx_type: TransactionType::Spending,
            category_id: None,
            currency: String::new(),
            date: String::new(),
            description: String::new(),
            name: String::new(),
            original: None,
        }
    }

    /// An empty date means "now" on submit.
    pub fn add_spending(currency: &str, categories: &[Category]) -> Self {
        Self {
            currency: currency.to_string(),
            category_id: categories.first().map(|category| category.category_id),
            ..Self::blank(FormKind::AddSpending)
        }
    }

    pub fn edit_spending(spending: &Spending, tz: Tz) -> Self {
        let original = Original {
            amount: spending.amount.abs().to_string(),
            kind: spending.transaction_type(),
            category_id: spending.category_id,
            currency: spending.currency.clone(),
            date: format_date(spending.date_of_spending, tz),
            description: spending.description.clone().unwrap_or_default(),
        };
        Self {
            amount: original.amount.clone(),
            tx_type: original.kind,
            category_id: Some(original.category_id),
            currency: original.currency.clone(),
            date: original.date.clone(),
            description: original.description.clone(),
            original: Some(original),
            ..Self::blank(FormKind::EditSpending(spending.spending_id.clone()))
        }
    }

    pub fn add_category() -> Self {
        Self::blank(FormKind::AddCategory)
    }

    pub fn edit_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            ..Self::blank(FormKind::EditCategory(category.category_id))
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            FormKind::AddSpending => " new spending ",
            FormKind::EditSpending(_) => " edit spending ",
            FormKind::AddCategory => " new category ",
            FormKind::EditCategory(_) => " rename category ",
        }
    }

    pub fn is_spending(&self) -> bool {
        matches!(self.kind, FormKind::AddSpending | FormKind::EditSpending(_))
    }

    pub fn fields(&self) -> &'static [Field] {
        if self.is_spending() {
            &SPENDING_FIELDS
        } else {
            &CATEGORY_FIELDS
        }
    }

    pub fn focused(&self) -> Field {
        let fields = self.fields();
        fields[self.focus % fields.len()]
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields().len();
    }

    pub fn prev_field(&mut self) {
        let len = self.fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Amount => &self.amount,
            Field::Currency => &self.currency,
            Field::Date => &self.date,
            Field::Description => &self.description,
            Field::Name => &self.name,
            Field::Type => self.tx_type.label(),
            Field::Category => "",
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focused() {
            Field::Amount => Some(&mut self.amount),
            Field::Currency => Some(&mut self.currency),
            Field::Date => Some(&mut self.date),
            Field::Description => Some(&mut self.description),
            Field::Name => Some(&mut self.name),
            Field::Type | Field::Category => None,
        }
    }

    pub fn input(&mut self, ch: char) {
        if let Some(text) = self.text_mut() {
            text.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
    }

    /// Steps the focused picker through its values.
    pub fn cycle(&mut self, forward: bool, categories: &[Category]) {
        match self.focused() {
            Field::Type => self.tx_type = self.tx_type.toggled(),
            Field::Category => {
                if categories.is_empty() {
                    self.category_id = None;
                    return;
                }
                let len = categories.len();
                let current = self.category_id.and_then(|id| {
                    categories
                        .iter()
                        .position(|category| category.category_id == id)
                });
                let next = match (current, forward) {
                    (None, _) => 0,
                    (Some(index), true) => (index + 1) % len,
                    (Some(index), false) => (index + len - 1) % len,
                };
                self.category_id = Some(categories[next].category_id);
            }
            _ => {}
        }
    }

    pub fn spending_form(&self, tz: Tz) -> Result<SpendingForm, EngineError> {
        Ok(SpendingForm {
            amount: self.amount.clone(),
            kind: self.tx_type,
            category_id: self.category_id,
            description: self.description.clone(),
            currency: self.currency.clone(),
            date_of_spending: parse_date(&self.date, tz)?,
        })
    }

    /// Only fields that differ from the spending being edited are set.
    pub fn spending_edit(&self, tz: Tz) -> Result<SpendingEdit, EngineError> {
        let Some(original) = &self.original else {
            return Ok(SpendingEdit::default());
        };

        let date_changed = self.date.trim() != original.date;
        Ok(SpendingEdit {
            amount: (self.amount.trim() != original.amount).then(|| self.amount.clone()),
            kind: (self.tx_type != original.kind).then_some(self.tx_type),
            category_id: self
                .category_id
                .filter(|&category_id| category_id != original.category_id),
            description: (self.description.trim() != original.description)
                .then(|| self.description.clone()),
            currency: (!self.currency.trim().eq_ignore_ascii_case(&original.currency))
                .then(|| self.currency.clone()),
            date_of_spending: if date_changed {
                parse_date(&self.date, tz)?
            } else {
                None
            },
        })
    }
}

pub fn format_date(date: DateTime<Utc>, tz: Tz) -> String {
    date.with_timezone(&tz).format(DATE_TIME_FORMAT).to_string()
}

/// Parses a local date, with or without time, into UTC. Blank is `None`.
pub fn parse_date(input: &str, tz: Tz) -> Result<Option<DateTime<Utc>>, EngineError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let naive = NaiveDateTime::parse_from_str(input, DATE_TIME_FORMAT)
        .or_else(|_| {
            NaiveDate::parse_from_str(input, DATE_FORMAT)
                .map(|date| date.and_time(chrono::NaiveTime::MIN))
        })
        .map_err(|_| {
            EngineError::Validation("Date must be YYYY-MM-DD or YYYY-MM-DD HH:MM".to_string())
        })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| Some(local.with_timezone(&Utc)))
        .ok_or_else(|| EngineError::Validation(format!("{input} does not exist in {tz}")))
}
