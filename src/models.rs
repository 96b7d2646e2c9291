use serde::{Deserialize, Serialize};

/// Envelope every YNAB response is wrapped in.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BudgetSummaryResponse {
    pub budgets: Vec<BudgetSummary>,
    #[serde(default)]
    pub default_budget: Option<BudgetSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BudgetSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub last_modified_on: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cleared {
    Cleared,
    Uncleared,
    Reconciled,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: String,
    /// Milliunits: 1000 == 1.00 in the budget's currency.
    pub amount: i64,
    pub cleared: Cleared,
    pub approved: bool,
    #[serde(default)]
    pub deleted: bool,
    pub account_id: String,
    #[serde(default)]
    pub payee_name: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub flag_color: Option<String>,
    #[serde(default)]
    pub import_payee_name: Option<String>,
    #[serde(default)]
    pub import_memo: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
}

/// Full replace payload for one transaction in a bulk update.
///
/// `payee_id` is always sent as an explicit `null`; if it were left out YNAB would
/// keep matching against the old payee and ignore `payee_name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateRequest {
    pub id: String,
    pub account_id: String,
    pub date: String,
    pub amount: i64,
    pub payee_id: Option<String>,
    pub payee_name: String,
    pub category_id: Option<String>,
    pub memo: Option<String>,
    pub cleared: Cleared,
    pub approved: bool,
    pub flag_color: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PatchTransactions<'a> {
    pub transactions: &'a [UpdateRequest],
}

#[derive(Debug, Deserialize)]
pub struct SaveTransactionsResponse {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_tolerates_missing_optionals() {
        let json = r#"{
            "id": "t1",
            "date": "2026-01-01",
            "amount": -10000,
            "cleared": "cleared",
            "approved": false,
            "account_id": "acc",
            "payee_name": "John Doe - Rent",
            "import_payee_name": "John Doe - Rent",
            "subtransactions": []
        }"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.cleared, Cleared::Cleared);
        assert!(!t.deleted);
        assert!(t.memo.is_none());
        assert_eq!(t.import_payee_name.as_deref(), Some("John Doe - Rent"));
    }

    #[test]
    fn test_update_request_sends_explicit_null_payee_id() {
        let req = UpdateRequest {
            id: "t1".to_string(),
            account_id: "acc".to_string(),
            date: "2026-01-01".to_string(),
            amount: -10000,
            payee_id: None,
            payee_name: "John Doe".to_string(),
            category_id: None,
            memo: Some("Rent".to_string()),
            cleared: Cleared::Uncleared,
            approved: true,
            flag_color: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("payee_id"));
        assert!(obj["payee_id"].is_null());
        assert_eq!(obj["cleared"], "uncleared");
        assert_eq!(obj["payee_name"], "John Doe");
    }
}
