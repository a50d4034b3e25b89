//! Handlers shared by every owned record collection.
//!
//! Each collection plugs its wire types into [`ApiResource`]; the handlers
//! themselves only know about the generic engine operations.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    ServerError, ServerState,
    auth::AuthUser,
    extract::ApiJson,
    types::{
        Message,
        expense::{ExpenseNew, ExpenseUpdate, ExpenseView},
        transaction::{TransactionNew, TransactionUpdate, TransactionView},
    },
};
use engine::{
    EngineError, Expense, ExpenseDraft, ExpensePatch, RecordId, Resource, Transaction,
    TransactionDraft, TransactionPatch,
};

pub(crate) trait ApiResource: Resource {
    type New: DeserializeOwned + Send;
    type Update: DeserializeOwned + Send;
    type View: Serialize + Send;

    fn draft(new: Self::New) -> Self::Draft;
    fn patch(update: Self::Update) -> Self::Patch;
    fn view(self) -> Self::View;
}

impl ApiResource for Expense {
    type New = ExpenseNew;
    type Update = ExpenseUpdate;
    type View = ExpenseView;

    fn draft(new: ExpenseNew) -> ExpenseDraft {
        ExpenseDraft {
            name: new.name,
            amount: new.amount,
            category: new.category,
            note: new.note,
            date: new.date.map(|date| date.with_timezone(&Utc)),
        }
    }

    fn patch(update: ExpenseUpdate) -> ExpensePatch {
        ExpensePatch {
            name: update.name,
            amount: update.amount,
            category: update.category,
            note: update.note,
        }
    }

    fn view(self) -> ExpenseView {
        ExpenseView {
            id: self.id.into(),
            user: self.user.into(),
            name: self.name,
            amount: self.amount,
            category: self.category,
            note: self.note,
            date: self.date,
        }
    }
}

impl ApiResource for Transaction {
    type New = TransactionNew;
    type Update = TransactionUpdate;
    type View = TransactionView;

    fn draft(new: TransactionNew) -> TransactionDraft {
        TransactionDraft {
            name: new.name,
            amount: new.amount,
            category: new.category,
            note: new.note,
            in_or_out: new.in_or_out,
            date: new.date.map(|date| date.with_timezone(&Utc)),
        }
    }

    fn patch(update: TransactionUpdate) -> TransactionPatch {
        TransactionPatch {
            name: update.name,
            amount: update.amount,
            category: update.category,
            note: update.note,
            in_or_out: update.in_or_out,
        }
    }

    fn view(self) -> TransactionView {
        TransactionView {
            id: self.id.into(),
            user: self.user.into(),
            name: self.name,
            amount: self.amount,
            category: self.category,
            note: self.note,
            in_or_out: self.in_or_out,
            date: self.date,
        }
    }
}

/// A path id that is not a valid record id cannot name any record.
fn parse_id<R: Resource>(raw: &str) -> Result<RecordId, ServerError> {
    raw.parse()
        .map_err(|_| ServerError::from(EngineError::KeyNotFound(R::NAME.to_string())))
}

pub(crate) async fn list<R: ApiResource>(
    AuthUser(user): AuthUser,
    State(state): State<ServerState>,
) -> Result<Json<Vec<R::View>>, ServerError> {
    let records = state.engine.list::<R>(user.id).await?;
    Ok(Json(records.into_iter().map(R::view).collect()))
}

pub(crate) async fn create<R: ApiResource>(
    AuthUser(user): AuthUser,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<R::New>,
) -> Result<Json<R::View>, ServerError> {
    let record = state.engine.create::<R>(user.id, R::draft(payload)).await?;
    Ok(Json(record.view()))
}

pub(crate) async fn update<R: ApiResource>(
    AuthUser(user): AuthUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<R::Update>,
) -> Result<Json<R::View>, ServerError> {
    let id = parse_id::<R>(&id)?;
    let record = state
        .engine
        .update::<R>(id, user.id, R::patch(payload))
        .await?;
    Ok(Json(record.view()))
}

pub(crate) async fn delete<R: ApiResource>(
    AuthUser(user): AuthUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ServerError> {
    let id = parse_id::<R>(&id)?;
    state.engine.delete::<R>(id, user.id).await?;
    Ok(Json(Message::new(format!("{} deleted", R::NAME))))
}
