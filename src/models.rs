use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Deserialize, Debug)]
pub struct RegisterPayload {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl MessageResponse {
    pub fn new(msg: &str) -> Self {
        Self {
            msg: msg.to_string(),
            id: None,
        }
    }

    pub fn with_id(msg: &str, id: String) -> Self {
        Self {
            msg: msg.to_string(),
            id: Some(id),
        }
    }
}

/// Direction of a monetary flow.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!(
                "type must be either 'income' or 'expense', got '{}'",
                other
            )),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: Option<i64>,
    pub amount: f64,
    pub date: String,
    pub description: String,
}

/// Body of add/update requests as sent by the client. Every field is optional
/// here so that missing fields surface as validation errors.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct TransactionPayload {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<i64>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub description: Option<String>,
}

/// Validated add/update command.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub category: Option<i64>,
    pub amount: f64,
    pub date: String,
    pub description: String,
}

/// Summary query string as sent. Values stay strings so that blank ones can
/// mean "no restriction".
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Validated summary filters; `None` means unrestricted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SummaryFilter {
    pub category: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
}

impl Summary {
    pub fn new(total_income: f64, total_expense: f64) -> Self {
        Self {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }
}
