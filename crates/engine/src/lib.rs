//! Record store for the expense tracker.
//!
//! The [`Engine`] owns the database connection and exposes the generic,
//! ownership-checked operations (`list`, `create`, `update`, `delete`) for
//! every [`Resource`] kind, plus user registration and login.

pub use error::EngineError;
pub use expenses::{Expense, ExpenseDraft, ExpensePatch};
pub use ids::{RecordId, UserId};
pub use ops::{Engine, EngineBuilder};
pub use resource::Resource;
pub use transactions::{Transaction, TransactionDraft, TransactionPatch};
pub use users::{NewUser, User};
pub use validation::FieldViolation;

mod error;
mod expenses;
mod ids;
mod ops;
mod password;
mod record;
mod resource;
mod transactions;
mod users;
mod validation;

type ResultEngine<T> = Result<T, EngineError>;
