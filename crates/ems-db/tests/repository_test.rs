//! Integration tests for User and Employee repository implementations
//! using in-memory SurrealDB.

use ems_core::error::EmsError;
use ems_core::models::employee::{CreateEmployee, UpdateEmployee};
use ems_core::models::user::{CreateUser, Role};
use ems_core::repository::{EmployeeRepository, UserRepository};
use ems_db::repository::{SurrealEmployeeRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    ems_db::run_migrations(&db).await.unwrap();
    db
}

// -----------------------------------------------------------------------
// User tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_user() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(CreateUser {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: "correct-horse-battery".into(),
            role: Role::Admin,
        })
        .await
        .unwrap();

    assert_eq!(user.name, "Alice");
    assert_eq!(user.role, Role::Admin);
    // The hash must never be the raw password.
    assert_ne!(user.password_hash, "correct-horse-battery");
    assert!(user.password_hash.starts_with("$argon2id$"));

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);
    assert_eq!(fetched.email, user.email);
}

#[tokio::test]
async fn get_user_by_email() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(CreateUser {
            name: "Bob".into(),
            email: "bob@example.com".into(),
            password: "hunter2hunter2".into(),
            role: Role::Employee,
        })
        .await
        .unwrap();

    let fetched = repo.get_by_email("bob@example.com").await.unwrap();
    assert_eq!(fetched.id, user.id);
    assert_eq!(fetched.role, Role::Employee);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let err = repo.get_by_email("ghost@example.com").await.unwrap_err();
    assert!(matches!(err, EmsError::NotFound { .. }));

    let err = repo.get_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, EmsError::NotFound { .. }));
}

#[tokio::test]
async fn duplicate_user_email_is_rejected_by_index() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let input = CreateUser {
        name: "Carol".into(),
        email: "carol@example.com".into(),
        password: "a-long-password".into(),
        role: Role::Employee,
    };
    repo.create(input.clone()).await.unwrap();
    assert!(matches!(
        repo.create(input).await.unwrap_err(),
        EmsError::AlreadyExists { .. }
    ));
}

// -----------------------------------------------------------------------
// Employee tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn employee_crud_roundtrip() {
    let db = setup().await;
    let repo = SurrealEmployeeRepository::new(db);

    let employee = repo
        .create(CreateEmployee {
            name: "Dave".into(),
            email: "dave@example.com".into(),
            position: "Engineer".into(),
            department: "R&D".into(),
            salary: 50_000.0,
            user_id: None,
        })
        .await
        .unwrap();

    let fetched = repo.get_by_id(employee.id).await.unwrap();
    assert_eq!(fetched.department, "R&D");
    assert_eq!(fetched.salary, 50_000.0);

    let updated = repo
        .update(
            employee.id,
            UpdateEmployee {
                position: Some("Senior Engineer".into()),
                salary: Some(60_000.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.position, "Senior Engineer");
    assert_eq!(updated.salary, 60_000.0);
    // Untouched fields survive a partial update.
    assert_eq!(updated.email, "dave@example.com");

    repo.delete(employee.id).await.unwrap();
    assert!(matches!(
        repo.get_by_id(employee.id).await.unwrap_err(),
        EmsError::NotFound { .. }
    ));
}

#[tokio::test]
async fn delete_missing_employee_is_not_found() {
    let db = setup().await;
    let repo = SurrealEmployeeRepository::new(db);

    assert!(matches!(
        repo.delete(Uuid::new_v4()).await.unwrap_err(),
        EmsError::NotFound { .. }
    ));
}

#[tokio::test]
async fn list_by_user_scopes_to_owner() {
    let db = setup().await;
    let repo = SurrealEmployeeRepository::new(db);
    let owner = Uuid::new_v4();

    repo.create(CreateEmployee {
        name: "Mine".into(),
        email: "mine@example.com".into(),
        position: "Clerk".into(),
        department: "Ops".into(),
        salary: 20_000.0,
        user_id: Some(owner),
    })
    .await
    .unwrap();
    repo.create(CreateEmployee {
        name: "Theirs".into(),
        email: "theirs@example.com".into(),
        position: "Clerk".into(),
        department: "Ops".into(),
        salary: 20_000.0,
        user_id: Some(Uuid::new_v4()),
    })
    .await
    .unwrap();

    let mine = repo.list_by_user(owner).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].name, "Mine");

    let all = repo.list().await.unwrap();
    assert_eq!(all.len(), 2);
}
