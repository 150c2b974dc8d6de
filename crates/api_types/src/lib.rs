//! Request and response shapes of the spendings REST service.
//!
//! Field names follow the service's camelCase JSON (`categoryId`,
//! `dateOfSpending`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use money::{Amount, AmountError, TransactionType};

mod money;

/// Body returned by the service on failures, when it returns one.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub mod category {
    use super::*;

    /// A user-defined label for grouping spendings.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Category {
        pub category_id: i64,
        pub name: String,
        /// Optional `#rrggbb` colour chosen by the user.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub color: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryUpdate {
        pub category_id: i64,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryDelete {
        pub category_id: i64,
    }
}

pub mod spending {
    use super::*;

    /// A single signed monetary transaction.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Spending {
        pub spending_id: String,
        /// Negative for expenses, zero or positive for income.
        pub amount: Amount,
        #[serde(default)]
        pub description: Option<String>,
        pub category_id: i64,
        pub date_of_spending: DateTime<Utc>,
        pub currency: String,
    }

    impl Spending {
        pub fn transaction_type(&self) -> TransactionType {
            TransactionType::of(self.amount)
        }
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SpendingNew {
        pub description: Option<String>,
        /// Already signed.
        pub amount: Amount,
        pub category_id: i64,
        pub currency: String,
        pub date_of_spending: DateTime<Utc>,
    }

    /// Partial update: absent fields are left untouched by the service.
    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SpendingUpdate {
        pub spending_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub amount: Option<Amount>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category_id: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub currency: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub date_of_spending: Option<DateTime<Utc>>,
    }

    impl SpendingUpdate {
        /// Returns `true` when no field besides the id would be sent.
        pub fn is_empty(&self) -> bool {
            self.description.is_none()
                && self.amount.is_none()
                && self.category_id.is_none()
                && self.currency.is_none()
                && self.date_of_spending.is_none()
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SpendingDelete {
        pub spending_id: String,
    }
}

#[cfg(test)]
mod tests {
    use super::{category::Category, spending::*, *};

    #[test]
    fn spending_reads_camel_case_payload() {
        let json = r#"{
            "spendingId": "abc",
            "amount": -42.5,
            "description": null,
            "categoryId": 3,
            "dateOfSpending": "2024-02-01T00:00:00Z",
            "currency": "HKD"
        }"#;
        let spending: Spending = serde_json::from_str(json).unwrap();
        assert_eq!(spending.spending_id, "abc");
        assert_eq!(spending.amount.cents(), -4250);
        assert_eq!(spending.category_id, 3);
        assert_eq!(spending.transaction_type(), TransactionType::Spending);
    }

    #[test]
    fn category_colour_is_optional() {
        let category: Category =
            serde_json::from_str(r#"{"categoryId": 1, "name": "Food"}"#).unwrap();
        assert_eq!(category.color, None);
        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json, serde_json::json!({"categoryId": 1, "name": "Food"}));
    }

    #[test]
    fn update_omits_unset_fields() {
        let update = SpendingUpdate {
            spending_id: "abc".to_string(),
            amount: Some(Amount::new(1000)),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"spendingId": "abc", "amount": 10.0}));
    }
}
