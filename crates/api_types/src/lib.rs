use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Generic `{ "msg": ... }` body used for confirmations and errors.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub msg: String,
}

impl Message {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// A single violated field, as returned in a 400 response.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub param: String,
    pub msg: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

/// Reads a free-text field that clients may also send as a JSON number.
/// `4.5` is kept as `"4.5"`.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(
        Option::<TextOrNumber>::deserialize(deserializer)?.map(|value| match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Integer(number) => number.to_string(),
            TextOrNumber::Float(number) => number.to_string(),
        }),
    )
}

pub mod user {
    use super::*;

    /// Registration body. Fields are optional so that missing ones surface as
    /// validation errors instead of a JSON rejection.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserNew {
        pub name: Option<String>,
        pub email: Option<String>,
        pub password: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct Login {
        pub email: Option<String>,
        pub password: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Token {
        pub token: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub name: String,
        pub email: String,
        pub date: DateTime<Utc>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub name: Option<String>,
        /// Free text, not checked to be numeric. A JSON number is accepted
        /// and kept in its text form.
        #[serde(default, deserialize_with = "super::text_or_number")]
        pub amount: Option<String>,
        pub category: Option<String>,
        pub note: Option<String>,
        /// RFC3339 timestamp. If absent, server uses now().
        pub date: Option<DateTime<FixedOffset>>,
    }

    /// Partial update. Absent or empty fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub name: Option<String>,
        #[serde(default, deserialize_with = "super::text_or_number")]
        pub amount: Option<String>,
        pub category: Option<String>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub user: Uuid,
        pub name: String,
        pub amount: String,
        pub category: String,
        pub note: String,
        pub date: DateTime<Utc>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub name: Option<String>,
        /// Free text, not checked to be numeric. A JSON number is accepted
        /// and kept in its text form.
        #[serde(default, deserialize_with = "super::text_or_number")]
        pub amount: Option<String>,
        pub category: Option<String>,
        pub note: Option<String>,
        /// Inflow/outflow flag, e.g. `"in"` or `"out"`.
        #[serde(rename = "inOrOut")]
        pub in_or_out: Option<String>,
        /// RFC3339 timestamp. If absent, server uses now().
        pub date: Option<DateTime<FixedOffset>>,
    }

    /// Partial update. Absent or empty fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub name: Option<String>,
        #[serde(default, deserialize_with = "super::text_or_number")]
        pub amount: Option<String>,
        pub category: Option<String>,
        pub note: Option<String>,
        #[serde(rename = "inOrOut")]
        pub in_or_out: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub user: Uuid,
        pub name: String,
        pub amount: String,
        pub category: String,
        pub note: String,
        #[serde(rename = "inOrOut")]
        pub in_or_out: String,
        pub date: DateTime<Utc>,
    }
}
