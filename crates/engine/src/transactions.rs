//! Transaction records.
//!
//! A `Transaction` is shaped like an [`Expense`](crate::Expense) with one more
//! required flag, `in_or_out`, telling money coming in from money going out.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{
    FieldViolation, RecordId, Resource, UserId,
    record::{CommonColumns, CommonText, record_columns, record_entity},
    validation::{Violations, patch_text},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: RecordId,
    pub user: UserId,
    pub name: String,
    pub amount: String,
    pub category: String,
    pub note: String,
    pub in_or_out: String,
    pub date: DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
pub struct TransactionDraft {
    pub name: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub note: Option<String>,
    pub in_or_out: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default)]
pub struct TransactionPatch {
    pub name: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub note: Option<String>,
    pub in_or_out: Option<String>,
}

record_entity!("transactions", in_or_out);

impl Resource for Transaction {
    const NAME: &'static str = "transaction";

    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;
    type Column = Column;
    type Draft = TransactionDraft;
    type Patch = TransactionPatch;

    record_columns!();

    fn validate(draft: &TransactionDraft) -> Vec<FieldViolation> {
        let mut violations = Violations::default();
        CommonText {
            name: draft.name.as_deref(),
            amount: draft.amount.as_deref(),
            category: draft.category.as_deref(),
            note: draft.note.as_deref(),
        }
        .require(&mut violations);
        violations.require_text("inOrOut", draft.in_or_out.as_deref(), "inOrOut is required");
        violations.into_inner()
    }

    fn new_active_model(
        id: RecordId,
        owner: UserId,
        draft: TransactionDraft,
        now: DateTime<Utc>,
    ) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(id.into()),
            user_id: ActiveValue::Set(owner.into()),
            name: ActiveValue::Set(draft.name.unwrap_or_default()),
            amount: ActiveValue::Set(draft.amount.unwrap_or_default()),
            category: ActiveValue::Set(draft.category.unwrap_or_default()),
            note: ActiveValue::Set(draft.note.unwrap_or_default()),
            in_or_out: ActiveValue::Set(draft.in_or_out.unwrap_or_default()),
            date: ActiveValue::Set(draft.date.unwrap_or(now)),
        }
    }

    fn apply_patch(active: &mut ActiveModel, patch: TransactionPatch) -> bool {
        let changed = CommonColumns {
            name: &mut active.name,
            amount: &mut active.amount,
            category: &mut active.category,
            note: &mut active.note,
        }
        .patch(patch.name, patch.amount, patch.category, patch.note);
        patch_text(&mut active.in_or_out, patch.in_or_out) | changed
    }

    fn from_model(model: Model) -> Self {
        Self {
            id: RecordId::from(model.id),
            user: UserId::from(model.user_id),
            name: model.name,
            amount: model.amount,
            category: model.category,
            note: model.note,
            in_or_out: model.in_or_out,
            date: model.date,
        }
    }
}
