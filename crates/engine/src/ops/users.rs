use chrono::Utc;
use email_address::EmailAddress;
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, QueryFilter, SqlErr};
use uuid::Uuid;

use crate::{
    EngineError, NewUser, ResultEngine, User, UserId,
    password::{hash_password, verify_password},
    users,
    validation::Violations,
};

use super::Engine;

const MIN_PASSWORD_LEN: usize = 6;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_valid_email(email: Option<&str>) -> bool {
    email.is_some_and(|email| EmailAddress::is_valid(email.trim()))
}

impl Engine {
    /// Registers a new user and returns it.
    ///
    /// Every invalid field is reported at once. An e-mail that is already
    /// registered fails with [`EngineError::ExistingKey`].
    pub async fn register_user(&self, new: NewUser) -> ResultEngine<User> {
        let mut violations = Violations::default();
        violations.require_text("name", new.name.as_deref(), "Please add name");
        violations.check(
            "email",
            is_valid_email(new.email.as_deref()),
            "Please include a valid email",
        );
        violations.check(
            "password",
            new.password
                .as_deref()
                .is_some_and(|p| p.chars().count() >= MIN_PASSWORD_LEN),
            "Please enter a password with 6 or more characters",
        );
        violations.into_result()?;

        let (Some(name), Some(email), Some(password)) = (new.name, new.email, new.password) else {
            return Err(EngineError::InvalidCredentials);
        };
        let email = normalize_email(&email);

        let exists = users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&self.database)
            .await?
            .is_some();
        if exists {
            return Err(EngineError::ExistingKey("User".to_string()));
        }

        let model = users::ActiveModel {
            id: ActiveValue::Set(UserId::new().into()),
            name: ActiveValue::Set(name),
            email: ActiveValue::Set(email),
            password: ActiveValue::Set(hash_password(&password)?),
            date: ActiveValue::Set(Utc::now()),
        }
        .insert(&self.database)
        .await
        .map_err(|err| match err.sql_err() {
            // A concurrent registration won the race past the lookup above.
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                EngineError::ExistingKey("User".to_string())
            }
            _ => EngineError::Database(err),
        })?;

        tracing::debug!(user = %model.id, "user registered");
        Ok(model.into())
    }

    /// Checks an e-mail/password pair.
    ///
    /// An unknown e-mail and a wrong password both fail with
    /// [`EngineError::InvalidCredentials`].
    pub async fn authenticate(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> ResultEngine<User> {
        let mut violations = Violations::default();
        violations.check("email", is_valid_email(email), "Please include a valid email");
        violations.require_text("password", password, "Password is required");
        violations.into_result()?;

        let (Some(email), Some(password)) = (email, password) else {
            return Err(EngineError::InvalidCredentials);
        };

        let model = users::Entity::find()
            .filter(users::Column::Email.eq(normalize_email(email)))
            .one(&self.database)
            .await?
            .ok_or(EngineError::InvalidCredentials)?;

        if !verify_password(password, &model.password)? {
            return Err(EngineError::InvalidCredentials);
        }
        Ok(model.into())
    }

    /// Looks up a user by id. `None` when the user no longer exists.
    pub async fn user(&self, id: UserId) -> ResultEngine<Option<User>> {
        let model = users::Entity::find_by_id(Uuid::from(id))
            .one(&self.database)
            .await?;
        Ok(model.map(User::from))
    }
}
