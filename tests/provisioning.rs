use link_tracker::application::services::AccountService;
use link_tracker::domain::entities::{AccountStatus, NewAccount, Role};
use link_tracker::error::AppError;
use link_tracker::infrastructure::persistence::PgAccountRepository;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::sync::Arc;

fn account(email: &str, name: &str, role: Role) -> NewAccount {
    NewAccount {
        email: email.to_string(),
        name: name.to_string(),
        role,
    }
}

async fn make_service(
    pool_options: PgPoolOptions,
    options: &PgConnectOptions,
) -> (AccountService<PgAccountRepository>, PgPool) {
    let pool = pool_options.connect_with(options.clone()).await.unwrap();
    let repo = PgAccountRepository::new(Arc::new(pool.clone()));
    (AccountService::new(options.clone(), Arc::new(repo)), pool)
}

async fn account_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test]
async fn test_provision_creates_active_account(
    pool_options: PgPoolOptions,
    options: PgConnectOptions,
) {
    let (service, pool) = make_service(pool_options, &options).await;

    let created = service
        .provision(account("Ops@Example.com", "Ops", Role::Admin))
        .await
        .unwrap();

    assert_eq!(created.email, "ops@example.com");
    assert_eq!(created.role, Role::Admin);
    assert_eq!(created.status, AccountStatus::Active);
    assert_eq!(created.uid.len(), 12);
    assert_eq!(account_count(&pool).await, 1);
}

#[sqlx::test]
async fn test_provision_twice_updates_in_place(
    pool_options: PgPoolOptions,
    options: PgConnectOptions,
) {
    let (service, pool) = make_service(pool_options, &options).await;

    let first = service
        .provision(account("aff@example.com", "Affiliate", Role::Affiliate))
        .await
        .unwrap();
    let second = service
        .provision(account("aff@example.com", "Renamed", Role::Admin))
        .await
        .unwrap();

    assert_eq!(first.uid, second.uid);
    assert_eq!(second.name, "Renamed");
    assert_eq!(second.role, Role::Admin);
    assert_eq!(account_count(&pool).await, 1);
}

#[sqlx::test]
async fn test_provision_reactivates_account(
    pool_options: PgPoolOptions,
    options: PgConnectOptions,
) {
    let (service, _pool) = make_service(pool_options, &options).await;
    service
        .provision(account("aff@example.com", "Affiliate", Role::Affiliate))
        .await
        .unwrap();
    service
        .set_status("aff@example.com", AccountStatus::Inactive)
        .await
        .unwrap();

    let again = service
        .provision(account("aff@example.com", "Affiliate", Role::Affiliate))
        .await
        .unwrap();

    assert_eq!(again.status, AccountStatus::Active);
}

#[sqlx::test]
async fn test_provision_rejects_invalid_email(
    pool_options: PgPoolOptions,
    options: PgConnectOptions,
) {
    let (service, pool) = make_service(pool_options, &options).await;

    let result = service
        .provision(account("not-an-email", "Someone", Role::Affiliate))
        .await;

    assert!(matches!(result, Err(AppError::Validation { .. })));
    assert_eq!(account_count(&pool).await, 0);
}

#[sqlx::test]
async fn test_list_accounts_by_role(pool_options: PgPoolOptions, options: PgConnectOptions) {
    let (service, _pool) = make_service(pool_options, &options).await;
    for (email, role) in [
        ("b-aff@example.com", Role::Affiliate),
        ("ops@example.com", Role::Admin),
        ("a-aff@example.com", Role::Affiliate),
    ] {
        service
            .provision(account(email, "Someone", role))
            .await
            .unwrap();
    }

    let affiliates = service.list(Some(Role::Affiliate)).await.unwrap();
    let everyone = service.list(None).await.unwrap();

    let emails: Vec<_> = affiliates.iter().map(|a| a.email.as_str()).collect();
    assert_eq!(emails, ["a-aff@example.com", "b-aff@example.com"]);
    assert_eq!(everyone.len(), 3);
}

#[sqlx::test]
async fn test_set_status_toggles(pool_options: PgPoolOptions, options: PgConnectOptions) {
    let (service, _pool) = make_service(pool_options, &options).await;
    service
        .provision(account("aff@example.com", "Affiliate", Role::Affiliate))
        .await
        .unwrap();

    let inactive = service
        .set_status("AFF@example.com", AccountStatus::Inactive)
        .await
        .unwrap();
    assert_eq!(inactive.status, AccountStatus::Inactive);

    let listed = service.list(Some(Role::Affiliate)).await.unwrap();
    assert_eq!(listed[0].status, AccountStatus::Inactive);

    let missing = service
        .set_status("ghost@example.com", AccountStatus::Active)
        .await;
    assert!(matches!(missing, Err(AppError::NotFound { .. })));
}

#[sqlx::test]
async fn test_delete_account(pool_options: PgPoolOptions, options: PgConnectOptions) {
    let (service, pool) = make_service(pool_options, &options).await;
    let created = service
        .provision(account("aff@example.com", "Affiliate", Role::Affiliate))
        .await
        .unwrap();

    let deleted = service.delete("aff@example.com").await.unwrap();

    assert_eq!(deleted.uid, created.uid);
    assert_eq!(account_count(&pool).await, 0);
    assert!(matches!(
        service.delete("aff@example.com").await,
        Err(AppError::NotFound { .. })
    ));
}
