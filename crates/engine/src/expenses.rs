//! The module contains the `Expense` record and its table.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{
    FieldViolation, RecordId, Resource, UserId,
    record::{CommonColumns, CommonText, record_columns, record_entity},
    validation::Violations,
};

/// An expense owned by a single user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: RecordId,
    pub user: UserId,
    pub name: String,
    /// Kept as entered; never parsed as a number.
    pub amount: String,
    pub category: String,
    pub note: String,
    pub date: DateTime<Utc>,
}

/// Submitted fields for a new expense.
#[derive(Clone, Debug, Default)]
pub struct ExpenseDraft {
    pub name: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub note: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Settable fields of an existing expense.
#[derive(Clone, Debug, Default)]
pub struct ExpensePatch {
    pub name: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub note: Option<String>,
}

record_entity!("expenses");

impl Resource for Expense {
    const NAME: &'static str = "expense";

    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;
    type Column = Column;
    type Draft = ExpenseDraft;
    type Patch = ExpensePatch;

    record_columns!();

    fn validate(draft: &ExpenseDraft) -> Vec<FieldViolation> {
        let mut violations = Violations::default();
        CommonText {
            name: draft.name.as_deref(),
            amount: draft.amount.as_deref(),
            category: draft.category.as_deref(),
            note: draft.note.as_deref(),
        }
        .require(&mut violations);
        violations.into_inner()
    }

    fn new_active_model(
        id: RecordId,
        owner: UserId,
        draft: ExpenseDraft,
        now: DateTime<Utc>,
    ) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(id.into()),
            user_id: ActiveValue::Set(owner.into()),
            name: ActiveValue::Set(draft.name.unwrap_or_default()),
            amount: ActiveValue::Set(draft.amount.unwrap_or_default()),
            category: ActiveValue::Set(draft.category.unwrap_or_default()),
            note: ActiveValue::Set(draft.note.unwrap_or_default()),
            date: ActiveValue::Set(draft.date.unwrap_or(now)),
        }
    }

    fn apply_patch(active: &mut ActiveModel, patch: ExpensePatch) -> bool {
        CommonColumns {
            name: &mut active.name,
            amount: &mut active.amount,
            category: &mut active.category,
            note: &mut active.note,
        }
        .patch(patch.name, patch.amount, patch.category, patch.note)
    }

    fn from_model(model: Model) -> Self {
        Self {
            id: RecordId::from(model.id),
            user: UserId::from(model.user_id),
            name: model.name,
            amount: model.amount,
            category: model.category,
            note: model.note,
            date: model.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_is_required_like_the_other_text_fields() {
        let draft = ExpenseDraft {
            name: Some("Rent".to_string()),
            amount: Some("900".to_string()),
            category: Some("home".to_string()),
            ..Default::default()
        };
        let violations = Expense::validate(&draft);
        assert_eq!(
            violations,
            vec![FieldViolation {
                field: "note",
                message: "Note is required"
            }]
        );
    }
}
