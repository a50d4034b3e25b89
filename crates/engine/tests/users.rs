use sea_orm::Database;

use engine::{Engine, EngineError, NewUser, UserId};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn alice() -> NewUser {
    NewUser {
        name: Some("Alice".to_string()),
        email: Some("Alice@Example.com".to_string()),
        password: Some("correct horse".to_string()),
    }
}

#[tokio::test]
async fn register_then_authenticate() {
    let engine = engine_with_db().await;

    let user = engine.register_user(alice()).await.unwrap();
    assert_eq!(user.name, "Alice");
    assert_eq!(user.email, "alice@example.com");

    let logged_in = engine
        .authenticate(Some("alice@example.com"), Some("correct horse"))
        .await
        .unwrap();
    assert_eq!(logged_in, user);

    assert_eq!(engine.user(user.id).await.unwrap(), Some(user));
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let engine = engine_with_db().await;
    engine.register_user(alice()).await.unwrap();

    let err = engine
        .register_user(NewUser {
            email: Some("alice@example.com".to_string()),
            ..alice()
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("User".to_string()));
}

#[tokio::test]
async fn concurrent_registrations_with_one_email_leave_one_user() {
    let engine = engine_with_db().await;

    let (first, second) = tokio::join!(engine.register_user(alice()), engine.register_user(alice()));

    let (winner, loser) = match (first, second) {
        (Ok(user), Err(err)) | (Err(err), Ok(user)) => (user, err),
        (first, second) => panic!("expected one success and one failure, got {first:?} / {second:?}"),
    };
    assert_eq!(winner.email, "alice@example.com");
    assert_eq!(loser, EngineError::ExistingKey("User".to_string()));
}

#[tokio::test]
async fn register_reports_all_invalid_fields() {
    let engine = engine_with_db().await;

    let err = engine
        .register_user(NewUser {
            name: None,
            email: Some("not-an-email".to_string()),
            password: Some("short".to_string()),
        })
        .await
        .unwrap_err();

    let EngineError::Validation(violations) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
    assert_eq!(fields, ["name", "email", "password"]);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let engine = engine_with_db().await;
    engine.register_user(alice()).await.unwrap();

    let wrong_password = engine
        .authenticate(Some("alice@example.com"), Some("wrong horse"))
        .await
        .unwrap_err();
    let unknown_email = engine
        .authenticate(Some("bob@example.com"), Some("correct horse"))
        .await
        .unwrap_err();

    assert_eq!(wrong_password, EngineError::InvalidCredentials);
    assert_eq!(unknown_email, EngineError::InvalidCredentials);
}

#[tokio::test]
async fn unknown_user_id_is_none() {
    let engine = engine_with_db().await;
    assert_eq!(engine.user(UserId::new()).await.unwrap(), None);
}
