//! Integration tests for the store service over real storage backends.
//!
//! These tests run the generator, the retry loop and the file backend
//! together, the way the `storecode` binary wires them.

use std::collections::HashSet;
use std::sync::Arc;

use tempfile::TempDir;

use storecode::config::{FileStorageConfig, StorageBackend, StorageConfig};
use storecode::domain::{
    Company, CustomUser, DocType, GeneratorConfig, StoreEntity, UserProfile, UserType,
};
use storecode::error::AppError;
use storecode::service::{StoreCodeGen, StoreService};
use storecode::storage::{Storage, create_storage};

// ============================================================================
// Test Harness
// ============================================================================

async fn file_storage(temp_dir: &TempDir) -> Arc<dyn Storage> {
    let config = StorageConfig {
        backend: StorageBackend::File,
        file: FileStorageConfig {
            data_dir: temp_dir.path().to_path_buf(),
        },
    };
    create_storage(&config).await.expect("Failed to create storage")
}

fn seeded_generator(seed: u64) -> Arc<StoreCodeGen> {
    Arc::new(StoreCodeGen::new(&GeneratorConfig::seeded(seed)).expect("Invalid generator config"))
}

// ============================================================================
// Create / Read
// ============================================================================

#[tokio::test]
async fn test_company_round_trips_through_file_storage() {
    let temp_dir = TempDir::new().unwrap();
    let service = StoreService::new(file_storage(&temp_dir).await, seeded_generator(1));

    let company = Company::new("Acme Corp").with_tax_document(DocType::Ein, "12-3456789");
    let saved = service.create(company.clone()).await.unwrap();

    assert!(saved.store_code.validate(Company::STORE_CODE_PREFIX).is_ok());
    assert_eq!(saved.entity, company);

    let loaded = service.get::<Company>(&saved.store_code).await.unwrap();
    assert_eq!(loaded, Some(saved));
}

#[tokio::test]
async fn test_records_survive_reopening_storage() {
    let temp_dir = TempDir::new().unwrap();

    let code = {
        let service = StoreService::new(file_storage(&temp_dir).await, seeded_generator(2));
        let user = CustomUser::new("jane", "Jane@Example.COM", UserType::Staff).unwrap();
        service.create(user).await.unwrap().store_code
    };

    let service = StoreService::new(file_storage(&temp_dir).await, seeded_generator(3));
    let user = service
        .get::<CustomUser>(&code)
        .await
        .unwrap()
        .expect("user should be persisted");
    assert_eq!(user.entity.email, "Jane@example.com");
    assert_eq!(user.entity.user_type, UserType::Staff);
}

#[tokio::test]
async fn test_profile_links_to_user() {
    let temp_dir = TempDir::new().unwrap();
    let service = StoreService::new(file_storage(&temp_dir).await, seeded_generator(4));

    let user = service
        .create(CustomUser::superuser("root", "root@example.com").unwrap())
        .await
        .unwrap();

    let mut profile = UserProfile::for_user(user.store_code.clone());
    profile.city = "Lisbon".to_string();
    let profile = service.create(profile).await.unwrap();

    assert!(profile.store_code.as_str().starts_with("USRP"));
    assert_eq!(profile.entity.user, user.store_code);
    assert_eq!(service.list::<UserProfile>(false).await.unwrap().len(), 1);
    assert_eq!(service.list::<CustomUser>(false).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_field_constraints_hold_across_reopen() {
    let temp_dir = TempDir::new().unwrap();

    let user = {
        let service = StoreService::new(file_storage(&temp_dir).await, seeded_generator(5));
        let user = service
            .create(CustomUser::new("jane", "jane@example.com", UserType::Client).unwrap())
            .await
            .unwrap();
        service
            .create(UserProfile::for_user(user.store_code.clone()))
            .await
            .unwrap();
        user
    };

    let service = StoreService::new(file_storage(&temp_dir).await, seeded_generator(6));

    let duplicate = CustomUser::new("jane", "jane2@example.com", UserType::Client).unwrap();
    assert!(matches!(
        service.create(duplicate).await,
        Err(AppError::Validation(ref e)) if e.field == "username"
    ));
    assert!(matches!(
        service.create(UserProfile::for_user(user.store_code)).await,
        Err(AppError::Validation(ref e)) if e.field == "user"
    ));
}

// ============================================================================
// Collisions
// ============================================================================

#[tokio::test]
async fn test_same_seed_collision_is_retried() {
    let temp_dir = TempDir::new().unwrap();
    let storage = file_storage(&temp_dir).await;

    let first = StoreService::new(storage.clone(), seeded_generator(9));
    let taken = first.create(Company::new("First")).await.unwrap();

    // Same seed: the first candidate is the code already taken.
    let second = StoreService::new(storage, seeded_generator(9));
    let saved = second.create(Company::new("Second")).await.unwrap();

    assert_ne!(saved.store_code, taken.store_code);
    assert_eq!(second.list::<Company>(false).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_same_seed_collision_exhausts_single_attempt() {
    let temp_dir = TempDir::new().unwrap();
    let storage = file_storage(&temp_dir).await;

    let first = StoreService::new(storage.clone(), seeded_generator(9));
    first.create(Company::new("First")).await.unwrap();

    let second = StoreService::new(storage, seeded_generator(9)).with_max_attempts(1);
    let err = second.create(Company::new("Second")).await.unwrap_err();

    assert!(matches!(err, AppError::SaveFailed(_)));
    assert_eq!(
        err.to_string(),
        "Failed to save Company instance after 1 tries"
    );
    assert_eq!(second.list::<Company>(true).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_same_code_in_different_tables_is_allowed() {
    let temp_dir = TempDir::new().unwrap();
    let storage = file_storage(&temp_dir).await;

    // Both services draw the same numbers, only the prefixes differ.
    let companies = StoreService::new(storage.clone(), seeded_generator(11));
    let users = StoreService::new(storage, seeded_generator(11));

    let company = companies.create(Company::new("Acme")).await.unwrap();
    let user = users
        .create(CustomUser::new("bob", "bob@example.com", UserType::Client).unwrap())
        .await
        .unwrap();

    assert_eq!(
        &company.store_code.as_str()[4..],
        &user.store_code.as_str()[3..]
    );
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_get_unique_codes() {
    let temp_dir = TempDir::new().unwrap();
    let service = Arc::new(StoreService::new(
        file_storage(&temp_dir).await,
        seeded_generator(21),
    ));

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.create(Company::new(format!("Company {i}"))).await })
        })
        .collect();

    let mut codes = HashSet::new();
    for handle in handles {
        let record = handle.await.unwrap().unwrap();
        assert!(codes.insert(record.store_code));
    }

    assert_eq!(service.list::<Company>(false).await.unwrap().len(), 32);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_usernames_save_once() {
    let temp_dir = TempDir::new().unwrap();
    let service = Arc::new(StoreService::new(
        file_storage(&temp_dir).await,
        seeded_generator(22),
    ));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                let email = format!("jane{i}@example.com");
                let user = CustomUser::new("jane", &email, UserType::Client).unwrap();
                service.create(user).await
            })
        })
        .collect();

    let mut saved = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            saved += 1;
        }
    }

    assert_eq!(saved, 1);
    assert_eq!(service.list::<CustomUser>(true).await.unwrap().len(), 1);
}

// ============================================================================
// Soft delete
// ============================================================================

#[tokio::test]
async fn test_soft_delete_persists() {
    let temp_dir = TempDir::new().unwrap();
    let storage = file_storage(&temp_dir).await;
    let service = StoreService::new(storage.clone(), seeded_generator(30));

    let kept = service.create(Company::new("Kept")).await.unwrap();
    let removed = service.create(Company::new("Removed")).await.unwrap();
    assert!(service.soft_delete::<Company>(&removed.store_code).await.unwrap());

    let reopened = StoreService::new(storage, seeded_generator(31));
    let live = reopened.list::<Company>(false).await.unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].store_code, kept.store_code);

    let all = reopened.list::<Company>(true).await.unwrap();
    assert_eq!(all.len(), 2);

    let tombstone = reopened
        .get_including_removed::<Company>(&removed.store_code)
        .await
        .unwrap()
        .unwrap();
    assert!(tombstone.is_removed);
    assert!(tombstone.modified >= tombstone.created);
}

#[tokio::test]
async fn test_memory_backend_through_factory() {
    let storage = create_storage(&StorageConfig {
        backend: StorageBackend::Memory,
        ..Default::default()
    })
    .await
    .unwrap();
    let service = StoreService::new(storage, seeded_generator(40));

    let original = service.create(Company::new("Acme")).await.unwrap();
    let copy = service.copy(&original).await.unwrap();

    assert_ne!(copy.store_code, original.store_code);
    assert_eq!(service.list::<Company>(false).await.unwrap().len(), 2);
}
