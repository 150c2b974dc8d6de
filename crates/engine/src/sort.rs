use std::{borrow::Cow, cmp::Ordering};

use api_types::{category::Category, spending::Spending};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Date,
    Amount,
    Category,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Amount => "Amount",
            Self::Category => "Category",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "↑",
            Self::Descending => "↓",
        }
    }
}

/// Current ordering of the spending list. Newest first by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::Date,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    /// Selecting the active key toggles the direction; a new key starts
    /// descending.
    pub fn select(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.reversed();
        } else {
            self.key = key;
            self.direction = SortDirection::Descending;
        }
    }
}

/// Name shown for `category_id`; ids missing from `categories` read
/// `Unknown (#id)`.
pub(crate) fn category_label(categories: &[Category], category_id: i64) -> Cow<'_, str> {
    categories
        .iter()
        .find(|category| category.category_id == category_id)
        .map(|category| Cow::Borrowed(category.name.as_str()))
        .unwrap_or_else(|| Cow::Owned(format!("Unknown (#{category_id})")))
}

fn compare(a: &Spending, b: &Spending, key: SortKey, categories: &[Category]) -> Ordering {
    match key {
        SortKey::Date => a.date_of_spending.cmp(&b.date_of_spending),
        SortKey::Amount => a.amount.cmp(&b.amount),
        SortKey::Category => category_label(categories, a.category_id)
            .cmp(&category_label(categories, b.category_id)),
    }
}

/// Sorts `items` in place. The sort is stable; the category key compares the
/// names shown in the list, including the `Unknown (#id)` placeholder.
pub fn sort_spendings(items: &mut [Spending], state: SortState, categories: &[Category]) {
    items.sort_by(|a, b| {
        let ordering = compare(a, b, state.key, categories);
        match state.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use api_types::Amount;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn spending(id: &str, cents: i64, category_id: i64, day: u32) -> Spending {
        Spending {
            spending_id: id.to_string(),
            amount: Amount::new(cents),
            description: None,
            category_id,
            date_of_spending: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            currency: "HKD".to_string(),
        }
    }

    fn categories() -> Vec<Category> {
        vec![
            Category {
                category_id: 1,
                name: "Transport".to_string(),
                color: None,
            },
            Category {
                category_id: 2,
                name: "Food".to_string(),
                color: None,
            },
        ]
    }

    fn ids(items: &[Spending]) -> Vec<&str> {
        items.iter().map(|s| s.spending_id.as_str()).collect()
    }

    #[test]
    fn same_key_toggles_new_key_resets_to_descending() {
        let mut state = SortState::default();
        assert_eq!(state.direction, SortDirection::Descending);

        state.select(SortKey::Date);
        assert_eq!(state.direction, SortDirection::Ascending);
        state.select(SortKey::Date);
        assert_eq!(state.direction, SortDirection::Descending);

        state.select(SortKey::Date);
        state.select(SortKey::Amount);
        assert_eq!(state.key, SortKey::Amount);
        assert_eq!(state.direction, SortDirection::Descending);
    }

    #[test]
    fn amount_ascending_is_reverse_of_descending() {
        let mut items = vec![
            spending("a", -500, 1, 1),
            spending("b", 1200, 1, 2),
            spending("c", -50, 2, 3),
            spending("d", 0, 2, 4),
        ];
        let cats = categories();

        sort_spendings(
            &mut items,
            SortState {
                key: SortKey::Amount,
                direction: SortDirection::Ascending,
            },
            &cats,
        );
        let ascending: Vec<String> = ids(&items).iter().map(|s| s.to_string()).collect();
        assert_eq!(ascending, ["a", "c", "d", "b"]);

        sort_spendings(
            &mut items,
            SortState {
                key: SortKey::Amount,
                direction: SortDirection::Descending,
            },
            &cats,
        );
        let mut descending: Vec<String> = ids(&items).iter().map(|s| s.to_string()).collect();
        descending.reverse();
        assert_eq!(ascending, descending);
    }

    #[test]
    fn category_sorts_by_display_name() {
        let mut items = vec![spending("t", 100, 1, 1), spending("f", 100, 2, 2)];
        sort_spendings(
            &mut items,
            SortState {
                key: SortKey::Category,
                direction: SortDirection::Ascending,
            },
            &categories(),
        );
        // "Food" < "Transport" although its id is larger.
        assert_eq!(ids(&items), ["f", "t"]);
    }

    #[test]
    fn unknown_category_sorts_by_its_placeholder() {
        let mut items = vec![
            spending("u", 100, 99, 1),
            spending("t", 100, 1, 2),
            spending("f", 100, 2, 3),
        ];
        sort_spendings(
            &mut items,
            SortState {
                key: SortKey::Category,
                direction: SortDirection::Ascending,
            },
            &categories(),
        );
        // "Unknown (#99)" sorts after "Transport", not first.
        assert_eq!(ids(&items), ["f", "t", "u"]);
        assert_eq!(category_label(&categories(), 99), "Unknown (#99)");
    }

    #[test]
    fn date_descending_puts_newest_first() {
        let mut items = vec![spending("jan", -100, 1, 1), {
            let mut feb = spending("feb", -100, 2, 1);
            feb.date_of_spending = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
            feb
        }];
        sort_spendings(&mut items, SortState::default(), &categories());
        assert_eq!(ids(&items), ["feb", "jan"]);
    }
}
