use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::{EngineError, RecordId, Resource, ResultEngine, UserId};

use super::{Engine, with_tx};

impl Engine {
    /// All records of kind `R` owned by `owner`, newest first.
    pub async fn list<R: Resource>(&self, owner: UserId) -> ResultEngine<Vec<R>> {
        let models = <R::Entity as EntityTrait>::find()
            .filter(R::owner_column().eq(Uuid::from(owner)))
            .order_by_desc(R::date_column())
            .all(&self.database)
            .await?;

        Ok(models.into_iter().map(R::from_model).collect())
    }

    /// Validates `draft` and stores it as a new record owned by `owner`.
    ///
    /// Fails with [`EngineError::Validation`] listing every violated field.
    pub async fn create<R: Resource>(&self, owner: UserId, draft: R::Draft) -> ResultEngine<R> {
        let violations = R::validate(&draft);
        if !violations.is_empty() {
            return Err(EngineError::Validation(violations));
        }

        let id = RecordId::new();
        let model = R::new_active_model(id, owner, draft, Utc::now())
            .insert(&self.database)
            .await?;
        tracing::debug!(kind = R::NAME, %id, %owner, "record created");

        Ok(R::from_model(model))
    }

    /// Applies `patch` to a record owned by `owner`.
    ///
    /// Fields missing from the patch keep their value. A patch that touches
    /// nothing returns the stored record without writing.
    pub async fn update<R: Resource>(
        &self,
        id: RecordId,
        owner: UserId,
        patch: R::Patch,
    ) -> ResultEngine<R> {
        with_tx!(self, |db_tx| {
            let model = Self::owned_record::<R>(&db_tx, id, owner).await?;
            let mut active: R::ActiveModel = model.clone().into_active_model();
            let model = if R::apply_patch(&mut active, patch) {
                active.update(&db_tx).await?
            } else {
                model
            };
            Ok(R::from_model(model))
        })
    }

    /// Removes a record owned by `owner`.
    pub async fn delete<R: Resource>(&self, id: RecordId, owner: UserId) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            Self::owned_record::<R>(&db_tx, id, owner).await?;
            <R::Entity as EntityTrait>::delete_many()
                .filter(R::id_column().eq(Uuid::from(id)))
                .exec(&db_tx)
                .await?;
            tracing::debug!(kind = R::NAME, %id, %owner, "record deleted");
            Ok(())
        })
    }

    /// Loads a record and checks it belongs to `owner`.
    ///
    /// Another user's record yields [`EngineError::Forbidden`] without
    /// disclosing its content.
    async fn owned_record<R: Resource>(
        db: &DatabaseTransaction,
        id: RecordId,
        owner: UserId,
    ) -> ResultEngine<R::Model> {
        let model = <R::Entity as EntityTrait>::find()
            .filter(R::id_column().eq(Uuid::from(id)))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(R::NAME.to_string()))?;

        if R::owner(&model) != owner {
            return Err(EngineError::Forbidden(format!(
                "{} {id} is not owned by {owner}",
                R::NAME
            )));
        }
        Ok(model)
    }
}
