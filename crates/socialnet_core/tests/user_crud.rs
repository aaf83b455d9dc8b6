use socialnet_core::db::open_db_in_memory;
use socialnet_core::doc::open_store_in_memory;
use socialnet_core::{
    DocStatusRepository, DocUserRepository, RepoError, SocialService, SqliteStatusRepository,
    SqliteUserRepository, User, UserRepository,
};

fn sample_user() -> User {
    User::new("dave03", "dave@example.com", "Dave", "Yuen")
}

#[test]
fn sqlite_create_and_find_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let user = sample_user();
    repo.create_user(&user).unwrap();

    let loaded = repo.find_user("dave03").unwrap().unwrap();
    assert_eq!(loaded, user);
}

#[test]
fn doc_create_and_find_roundtrip() {
    let store = open_store_in_memory().unwrap();
    let repo = DocUserRepository::try_new(&store).unwrap();

    let user = sample_user();
    repo.create_user(&user).unwrap();

    let loaded = repo.find_user("dave03").unwrap().unwrap();
    assert_eq!(loaded, user);
}

#[test]
fn sqlite_absent_id_behaviors() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    assert!(repo.find_user("ghost").unwrap().is_none());
    assert!(matches!(
        repo.update_user(&User::new("ghost", "g@example.com", "Gone", "Ghost")),
        Err(RepoError::NotFound { record: "user", .. })
    ));
    assert!(matches!(
        repo.delete_user("ghost"),
        Err(RepoError::NotFound { record: "user", .. })
    ));
}

#[test]
fn doc_absent_id_behaviors() {
    let store = open_store_in_memory().unwrap();
    let repo = DocUserRepository::try_new(&store).unwrap();

    assert!(repo.find_user("ghost").unwrap().is_none());
    assert!(matches!(
        repo.update_user(&User::new("ghost", "g@example.com", "Gone", "Ghost")),
        Err(RepoError::NotFound { record: "user", .. })
    ));
    assert!(matches!(
        repo.delete_user("ghost"),
        Err(RepoError::NotFound { record: "user", .. })
    ));
}

#[test]
fn sqlite_duplicate_create_keeps_first_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    repo.create_user(&sample_user()).unwrap();

    let conflicting = User::new("dave03", "other@example.com", "Other", "Name");
    let err = repo.create_user(&conflicting).unwrap_err();
    assert!(matches!(
        err,
        RepoError::DuplicateId { record: "user", ref id } if id == "dave03"
    ));

    let stored = repo.find_user("dave03").unwrap().unwrap();
    assert_eq!(stored, sample_user());
}

#[test]
fn doc_duplicate_create_keeps_first_record() {
    let store = open_store_in_memory().unwrap();
    let repo = DocUserRepository::try_new(&store).unwrap();

    repo.create_user(&sample_user()).unwrap();

    let conflicting = User::new("dave03", "other@example.com", "Other", "Name");
    let err = repo.create_user(&conflicting).unwrap_err();
    assert!(matches!(
        err,
        RepoError::DuplicateId { record: "user", ref id } if id == "dave03"
    ));

    let stored = repo.find_user("dave03").unwrap().unwrap();
    assert_eq!(stored, sample_user());
}

#[test]
fn sqlite_update_replaces_all_mutable_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    repo.create_user(&sample_user()).unwrap();

    let updated = User::new("dave03", "dave.yuen@example.com", "David", "Yuen-Smith");
    repo.update_user(&updated).unwrap();

    let stored = repo.find_user("dave03").unwrap().unwrap();
    assert_eq!(stored, updated);
}

#[test]
fn doc_update_replaces_all_mutable_fields() {
    let store = open_store_in_memory().unwrap();
    let repo = DocUserRepository::try_new(&store).unwrap();

    repo.create_user(&sample_user()).unwrap();

    let updated = User::new("dave03", "dave.yuen@example.com", "David", "Yuen-Smith");
    repo.update_user(&updated).unwrap();

    let stored = repo.find_user("dave03").unwrap().unwrap();
    assert_eq!(stored, updated);
}

#[test]
fn create_rejects_blank_required_field() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let invalid = User::new("dave03", " ", "Dave", "Yuen");
    assert!(matches!(
        repo.create_user(&invalid),
        Err(RepoError::Validation(_))
    ));
    assert!(repo.find_user("dave03").unwrap().is_none());
}

#[test]
fn service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let statuses = SqliteStatusRepository::try_new(&conn).unwrap();
    let service = SocialService::new(users, statuses);

    let user = sample_user();
    service.add_user(&user).unwrap();

    let fetched = service.find_user("dave03").unwrap().unwrap();
    assert_eq!(fetched.email, "dave@example.com");

    service.delete_user("dave03").unwrap();
    assert!(service.find_user("dave03").unwrap().is_none());
}

#[test]
fn service_accepts_document_backend() {
    let store = open_store_in_memory().unwrap();
    let users = DocUserRepository::try_new(&store).unwrap();
    let statuses = DocStatusRepository::try_new(&store).unwrap();
    let service = SocialService::new(users, statuses);

    service.add_user(&sample_user()).unwrap();
    assert!(service.find_user("dave03").unwrap().is_some());
}
