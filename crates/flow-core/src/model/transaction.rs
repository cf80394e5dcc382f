//! Finance transactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;
use crate::error::{FlowError, Result};
use crate::store::{Collection, Direction};

/// Income or expense. `amount` is a magnitude; `is_income` gives the sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,

    #[serde(default)]
    pub user_id: String,

    pub description: String,

    pub amount: f64,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,

    #[serde(default)]
    pub is_income: bool,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub receipt_image_url: Option<String>,
}

impl Transaction {
    /// Amount with the sign implied by `is_income`.
    pub fn signed_amount(&self) -> f64 {
        if self.is_income {
            self.amount.abs()
        } else {
            -self.amount.abs()
        }
    }

    /// `+$12.50` for income, `-$3.00` for expenses.
    pub fn display_amount(&self) -> String {
        let sign = if self.is_income { '+' } else { '-' };
        format!("{}${:.2}", sign, self.amount.abs())
    }
}

impl Record for Transaction {
    const COLLECTION: Collection = Collection::Transactions;
    const ENTITY: &'static str = "transaction";
    const SORT_FIELD: &'static str = "date";
    const SORT_DIRECTION: Direction = Direction::Descending;

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> i64 {
        self.date.timestamp_millis()
    }
}

/// Editable fields of a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub is_income: bool,
}

impl TransactionDraft {
    pub fn expense(description: impl Into<String>, amount: f64, date: DateTime<Utc>) -> Self {
        Self {
            description: description.into(),
            amount,
            date,
            is_income: false,
        }
    }

    pub fn income(description: impl Into<String>, amount: f64, date: DateTime<Utc>) -> Self {
        Self {
            is_income: true,
            ..Self::expense(description, amount, date)
        }
    }

    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            description: transaction.description.clone(),
            amount: transaction.amount,
            date: transaction.date,
            is_income: transaction.is_income,
        }
    }

    /// Build the full document.
    ///
    /// Used for both create and edit. Either way the category is saved empty and
    /// `receiptImageUrl` is written as null, so an edit overwrites any receipt the
    /// stored document had.
    pub fn into_transaction(self, id: String, user_id: String) -> Result<Transaction> {
        if self.description.trim().is_empty() {
            return Err(FlowError::Validation(
                "Transaction description is required".to_string(),
            ));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(FlowError::Validation(format!(
                "Amount must be a non-negative number (got {})",
                self.amount
            )));
        }
        Ok(Transaction {
            id,
            user_id,
            description: self.description,
            amount: self.amount,
            date: self.date,
            is_income: self.is_income,
            category: String::new(),
            receipt_image_url: None,
        })
    }
}

/// Totals over a list of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    pub income: f64,
    pub expense: f64,
}

impl Summary {
    pub fn of(transactions: &[Transaction]) -> Self {
        transactions.iter().fold(Self::default(), |mut acc, t| {
            if t.is_income {
                acc.income += t.amount;
            } else {
                acc.expense += t.amount;
            }
            acc
        })
    }

    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_display_amount_sign() {
        let income = TransactionDraft::income("Salary", 1200.5, day(1))
            .into_transaction("a".into(), "u1".into())
            .unwrap();
        let expense = TransactionDraft::expense("Coffee", 3.0, day(2))
            .into_transaction("b".into(), "u1".into())
            .unwrap();
        assert_eq!(income.display_amount(), "+$1200.50");
        assert_eq!(expense.display_amount(), "-$3.00");
        assert_eq!(expense.signed_amount(), -3.0);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let err = TransactionDraft::expense("Refund", -5.0, day(1))
            .into_transaction("a".into(), "u1".into())
            .unwrap_err();
        assert!(matches!(err, FlowError::Validation(_)));
        assert!(TransactionDraft::expense("Nan", f64::NAN, day(1))
            .into_transaction("a".into(), "u1".into())
            .is_err());
    }

    #[test]
    fn test_description_required() {
        assert!(TransactionDraft::expense("", 1.0, day(1))
            .into_transaction("a".into(), "u1".into())
            .is_err());
    }

    #[test]
    fn test_document_shape() {
        let t = TransactionDraft::income("Gift", 20.0, day(5))
            .into_transaction("a".into(), "u1".into())
            .unwrap();
        let value = serde_json::to_value(&t).unwrap();
        assert_eq!(value["isIncome"], json!(true));
        assert_eq!(value["category"], json!(""));
        assert_eq!(value["receiptImageUrl"], json!(null));
        assert_eq!(value["date"], json!(day(5).timestamp_millis()));
    }

    #[test]
    fn test_edit_clears_receipt_and_category() {
        let stored = Transaction {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            description: "Lunch".to_string(),
            amount: 12.5,
            date: Utc::now(),
            is_income: false,
            category: "Food".to_string(),
            receipt_image_url: Some("https://example.com/r.png".to_string()),
        };
        let edited = TransactionDraft::from_transaction(&stored)
            .into_transaction(stored.id.clone(), stored.user_id.clone())
            .unwrap();
        assert_eq!(edited.receipt_image_url, None);
        assert!(edited.category.is_empty());
        assert_eq!(edited.description, "Lunch");
    }

    #[test]
    fn test_summary_totals() {
        let list = vec![
            TransactionDraft::income("Salary", 100.0, day(1))
                .into_transaction("a".into(), "u1".into())
                .unwrap(),
            TransactionDraft::expense("Rent", 40.0, day(2))
                .into_transaction("b".into(), "u1".into())
                .unwrap(),
            TransactionDraft::expense("Food", 10.0, day(3))
                .into_transaction("c".into(), "u1".into())
                .unwrap(),
        ];
        let summary = Summary::of(&list);
        assert_eq!(summary.income, 100.0);
        assert_eq!(summary.expense, 50.0);
        assert_eq!(summary.balance(), 50.0);
    }
}
