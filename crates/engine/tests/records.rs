use chrono::{Duration, Utc};
use sea_orm::Database;

use engine::{
    Engine, EngineError, Expense, ExpenseDraft, ExpensePatch, FieldViolation, NewUser, RecordId,
    Transaction, TransactionDraft, TransactionPatch, UserId,
};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn register(engine: &Engine, name: &str) -> UserId {
    engine
        .register_user(NewUser {
            name: Some(name.to_string()),
            email: Some(format!("{name}@example.com")),
            password: Some("password".to_string()),
        })
        .await
        .unwrap()
        .id
}

fn expense(name: &str) -> ExpenseDraft {
    ExpenseDraft {
        name: Some(name.to_string()),
        amount: Some("12.30".to_string()),
        category: Some("food".to_string()),
        note: Some("lunch".to_string()),
        date: None,
    }
}

fn coffee() -> TransactionDraft {
    TransactionDraft {
        name: Some("Coffee".to_string()),
        amount: Some("4.50".to_string()),
        category: Some("food".to_string()),
        note: Some("morning".to_string()),
        in_or_out: Some("out".to_string()),
        date: None,
    }
}

#[tokio::test]
async fn create_echoes_fields_and_assigns_owner_and_date() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;

    let before = Utc::now();
    let tx = engine.create::<Transaction>(alice, coffee()).await.unwrap();

    assert_eq!(tx.user, alice);
    assert_eq!(tx.name, "Coffee");
    assert_eq!(tx.amount, "4.50");
    assert_eq!(tx.category, "food");
    assert_eq!(tx.note, "morning");
    assert_eq!(tx.in_or_out, "out");
    assert!(tx.date >= before - Duration::seconds(1));
    assert!(tx.date <= Utc::now() + Duration::seconds(1));

    let listed = engine.list::<Transaction>(alice).await.unwrap();
    assert_eq!(listed, vec![tx]);
}

#[tokio::test]
async fn create_reports_every_missing_field() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;

    let err = engine
        .create::<Transaction>(
            alice,
            TransactionDraft {
                name: Some("Coffee".to_string()),
                amount: Some(String::new()),
                note: Some("morning".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::Validation(vec![
            FieldViolation {
                field: "amount",
                message: "Amount is required"
            },
            FieldViolation {
                field: "category",
                message: "Category is required"
            },
            FieldViolation {
                field: "inOrOut",
                message: "inOrOut is required"
            },
        ])
    );
    assert!(engine.list::<Transaction>(alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_is_newest_first_even_with_backdated_records() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;
    let now = Utc::now();

    for (name, days_ago) in [("middle", 5), ("oldest", 30), ("newest", 0)] {
        engine
            .create::<Expense>(
                alice,
                ExpenseDraft {
                    date: Some(now - Duration::days(days_ago)),
                    ..expense(name)
                },
            )
            .await
            .unwrap();
    }

    let names: Vec<_> = engine
        .list::<Expense>(alice)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, ["newest", "middle", "oldest"]);
}

#[tokio::test]
async fn records_are_invisible_and_immutable_to_other_users() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;
    let bob = register(&engine, "bob").await;

    let tx = engine.create::<Transaction>(alice, coffee()).await.unwrap();

    assert!(engine.list::<Transaction>(bob).await.unwrap().is_empty());

    let err = engine
        .update::<Transaction>(
            tx.id,
            bob,
            TransactionPatch {
                name: Some("Stolen".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine.delete::<Transaction>(tx.id, bob).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    assert_eq!(engine.list::<Transaction>(alice).await.unwrap(), vec![tx]);
}

#[tokio::test]
async fn update_applies_only_present_fields() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;
    let created = engine.create::<Expense>(alice, expense("Lunch")).await.unwrap();

    let updated = engine
        .update::<Expense>(
            created.id,
            alice,
            ExpensePatch {
                amount: Some("15.00".to_string()),
                note: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(
        updated,
        Expense {
            amount: "15.00".to_string(),
            ..created
        }
    );
}

#[tokio::test]
async fn empty_update_changes_nothing() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;
    let created = engine.create::<Expense>(alice, expense("Lunch")).await.unwrap();

    let updated = engine
        .update::<Expense>(created.id, alice, ExpensePatch::default())
        .await
        .unwrap();

    assert_eq!(updated, created);
    assert_eq!(engine.list::<Expense>(alice).await.unwrap(), vec![created]);
}

#[tokio::test]
async fn update_of_unknown_id_is_not_found() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;

    let err = engine
        .update::<Expense>(RecordId::new(), alice, ExpensePatch::default())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("expense".to_string()));
}

#[tokio::test]
async fn delete_twice_is_not_found_the_second_time() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;
    let created = engine.create::<Expense>(alice, expense("Lunch")).await.unwrap();

    engine.delete::<Expense>(created.id, alice).await.unwrap();
    assert!(engine.list::<Expense>(alice).await.unwrap().is_empty());

    let err = engine
        .delete::<Expense>(created.id, alice)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("expense".to_string()));
}

#[tokio::test]
async fn expenses_and_transactions_are_separate_collections() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;

    let expense = engine.create::<Expense>(alice, expense("Lunch")).await.unwrap();
    engine.create::<Transaction>(alice, coffee()).await.unwrap();

    assert_eq!(engine.list::<Expense>(alice).await.unwrap().len(), 1);
    let err = engine
        .delete::<Transaction>(expense.id, alice)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("transaction".to_string()));
}
