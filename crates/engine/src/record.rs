//! Pieces shared by every user-owned record table.
//!
//! Each table has an id, an owner, the `name`/`amount`/`category`/`note` text
//! columns, optional extra text columns and a date.

use sea_orm::ActiveValue;

use crate::validation::{Violations, patch_text};

/// Declares the sea-orm entity of a record table. Extra text columns go
/// after the table name. Expects `sea_orm::entity::prelude::*` in scope.
macro_rules! record_entity {
    ($table:tt $(, $extra:ident)* $(,)?) => {
        #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
        #[sea_orm(table_name = $table)]
        pub struct Model {
            #[sea_orm(primary_key, auto_increment = false)]
            pub id: Uuid,
            pub user_id: Uuid,
            pub name: String,
            pub amount: String,
            pub category: String,
            pub note: String,
            $(pub $extra: String,)*
            pub date: DateTimeUtc,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {
            #[sea_orm(
                belongs_to = "super::users::Entity",
                from = "Column::UserId",
                to = "super::users::Column::Id"
            )]
            User,
        }

        impl Related<super::users::Entity> for Entity {
            fn to() -> RelationDef {
                Relation::User.def()
            }
        }

        impl ActiveModelBehavior for ActiveModel {}
    };
}

/// The column accessors of `Resource` for a table declared with
/// [`record_entity!`].
macro_rules! record_columns {
    () => {
        fn id_column() -> Column {
            Column::Id
        }

        fn owner_column() -> Column {
            Column::UserId
        }

        fn date_column() -> Column {
            Column::Date
        }

        fn owner(model: &Model) -> UserId {
            UserId::from(model.user_id)
        }
    };
}

pub(crate) use {record_columns, record_entity};

/// Submitted values of the shared text columns.
pub(crate) struct CommonText<'a> {
    pub name: Option<&'a str>,
    pub amount: Option<&'a str>,
    pub category: Option<&'a str>,
    pub note: Option<&'a str>,
}

impl CommonText<'_> {
    pub(crate) fn require(&self, violations: &mut Violations) {
        violations.require_text("name", self.name, "Name is required");
        violations.require_text("amount", self.amount, "Amount is required");
        violations.require_text("category", self.category, "Category is required");
        violations.require_text("note", self.note, "Note is required");
    }
}

/// Active values of the shared text columns of one row.
pub(crate) struct CommonColumns<'a> {
    pub name: &'a mut ActiveValue<String>,
    pub amount: &'a mut ActiveValue<String>,
    pub category: &'a mut ActiveValue<String>,
    pub note: &'a mut ActiveValue<String>,
}

impl CommonColumns<'_> {
    /// Returns whether any column was touched.
    pub(crate) fn patch(
        self,
        name: Option<String>,
        amount: Option<String>,
        category: Option<String>,
        note: Option<String>,
    ) -> bool {
        let mut changed = patch_text(self.name, name);
        changed |= patch_text(self.amount, amount);
        changed |= patch_text(self.category, category);
        changed |= patch_text(self.note, note);
        changed
    }
}
