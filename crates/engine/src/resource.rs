//! The `Resource` trait: everything the engine needs to know about a kind of
//! user-owned record to list, create, update and delete it.
//!
//! The generic operations live in `ops::records`; each record kind only
//! describes its table, its validation and its patch rules.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelBehavior, ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel};

use crate::{FieldViolation, RecordId, UserId};

pub trait Resource: Sized + Send + Sync + 'static {
    /// Singular lowercase name, used in messages ("expense deleted").
    const NAME: &'static str;

    type Entity: EntityTrait<Model = Self::Model, Column = Self::Column>;
    type Model: IntoActiveModel<Self::ActiveModel> + Clone + Send + Sync;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + 'static;
    type Column: ColumnTrait;

    /// Fields submitted on creation, before validation.
    type Draft: Send;
    /// Fields submitted on update. Only these can change after creation.
    type Patch: Send;

    fn id_column() -> Self::Column;
    fn owner_column() -> Self::Column;
    fn date_column() -> Self::Column;

    fn owner(model: &Self::Model) -> UserId;

    /// Every violated field of `draft`, in declaration order.
    fn validate(draft: &Self::Draft) -> Vec<FieldViolation>;

    /// Build the row for an already validated draft. `now` is used when the
    /// draft carries no date.
    fn new_active_model(
        id: RecordId,
        owner: UserId,
        draft: Self::Draft,
        now: DateTime<Utc>,
    ) -> Self::ActiveModel;

    /// Returns `false` when the patch touched nothing.
    fn apply_patch(active: &mut Self::ActiveModel, patch: Self::Patch) -> bool;

    fn from_model(model: Self::Model) -> Self;
}
