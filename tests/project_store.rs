//! Integration tests for the SQLite-backed project store: version
//! bookkeeping, ownership scoping, and payload fidelity.

mod support;

use boltning::domain::ports::{ProjectStore, ProjectStoreError};
use boltning::domain::{
    ChatMessage, ChatRole, ProjectDraft, ProjectFile, ProjectId, ProjectName,
};
use boltning::outbound::persistence::DieselProjectStore;
use chrono::{TimeZone, Utc};

use support::{create_user, test_pool};

fn draft(name: &str) -> ProjectDraft {
    ProjectDraft {
        id: None,
        name: ProjectName::new(name).expect("valid name"),
        files: Vec::new(),
        conversation: Vec::new(),
        last_modified: Some(Utc::now()),
    }
}

#[tokio::test]
async fn versions_count_up_from_one() {
    let (_dir, pool) = test_pool();
    let owner = create_user(&pool, "ada").await;
    let store = DieselProjectStore::new(pool);

    let first = store.save(owner, draft("demo")).await.expect("first save");
    assert_eq!(first.version, 1);

    let mut update = draft("demo renamed");
    update.id = Some(first.id);
    let second = store.save(owner, update.clone()).await.expect("second save");
    assert_eq!(second.id, first.id);
    assert_eq!(second.version, 2);

    let third = store.save(owner, update).await.expect("third save");
    assert_eq!(third.version, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_never_lose_an_update() {
    let (_dir, pool) = test_pool();
    let owner = create_user(&pool, "ada").await;
    let store = std::sync::Arc::new(DieselProjectStore::new(pool));

    let receipt = store.save(owner, draft("contended")).await.expect("seed save");

    let mut handles = Vec::new();
    for n in 0..8 {
        let store = store.clone();
        let mut update = draft(&format!("contended-{n}"));
        update.id = Some(receipt.id);
        handles.push(tokio::spawn(async move { store.save(owner, update).await }));
    }
    let mut versions = Vec::new();
    for handle in handles {
        let saved = handle.await.expect("task join").expect("save ok");
        versions.push(saved.version);
    }

    // Eight writers after version 1 must land on versions 2..=9 with no
    // duplicates.
    versions.sort_unstable();
    assert_eq!(versions, (2..=9).collect::<Vec<i64>>());

    let stored = store
        .find_for_owner(owner, receipt.id)
        .await
        .expect("fetch")
        .expect("present");
    assert_eq!(stored.version, 9);
}

#[tokio::test]
async fn save_with_an_unknown_id_creates_at_version_one() {
    let (_dir, pool) = test_pool();
    let owner = create_user(&pool, "ada").await;
    let store = DieselProjectStore::new(pool);

    let supplied = ProjectId::random();
    let mut fresh = draft("imported");
    fresh.id = Some(supplied);
    let receipt = store.save(owner, fresh).await.expect("save");
    assert_eq!(receipt.id, supplied);
    assert_eq!(receipt.version, 1);
}

#[tokio::test]
async fn save_against_a_foreign_project_reads_as_not_found() {
    let (_dir, pool) = test_pool();
    let ada = create_user(&pool, "ada").await;
    let grace = create_user(&pool, "grace").await;
    let store = DieselProjectStore::new(pool);

    let receipt = store.save(ada, draft("private")).await.expect("save");

    let mut theft = draft("stolen");
    theft.id = Some(receipt.id);
    let result = store.save(grace, theft).await;
    assert_eq!(result, Err(ProjectStoreError::NotFound));

    // The original is untouched.
    let stored = store
        .find_for_owner(ada, receipt.id)
        .await
        .expect("fetch")
        .expect("present");
    assert_eq!(stored.version, 1);
    assert_eq!(stored.name.as_ref(), "private");
}

#[tokio::test]
async fn files_and_conversation_round_trip_exactly() {
    let (_dir, pool) = test_pool();
    let owner = create_user(&pool, "ada").await;
    let store = DieselProjectStore::new(pool);

    let files = vec![
        ProjectFile {
            filename: "index.html".to_owned(),
            kind: "html".to_owned(),
            content: "<p>quotes \" and unicode \u{1F980} and\nnewlines</p>".to_owned(),
        },
        ProjectFile {
            filename: "style.css".to_owned(),
            kind: "css".to_owned(),
            content: "body { color: red; }".to_owned(),
        },
    ];
    let conversation = vec![
        ChatMessage {
            role: ChatRole::User,
            content: "make it red".to_owned(),
        },
        ChatMessage {
            role: ChatRole::Assistant,
            content: "{\"files\": [\"style.css\"]}".to_owned(),
        },
    ];
    let stamp = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 45).unwrap();
    let receipt = store
        .save(
            owner,
            ProjectDraft {
                id: None,
                name: ProjectName::new("fidelity").expect("valid name"),
                files: files.clone(),
                conversation: conversation.clone(),
                last_modified: Some(stamp),
            },
        )
        .await
        .expect("save");

    let stored = store
        .find_for_owner(owner, receipt.id)
        .await
        .expect("fetch")
        .expect("present");
    assert_eq!(stored.files, files);
    assert_eq!(stored.conversation, conversation);
    assert_eq!(stored.last_modified, stamp);
}

#[tokio::test]
async fn listing_is_scoped_and_ordered_by_recency() {
    let (_dir, pool) = test_pool();
    let ada = create_user(&pool, "ada").await;
    let grace = create_user(&pool, "grace").await;
    let store = DieselProjectStore::new(pool);

    let older = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let newer = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
    let mut first = draft("old");
    first.last_modified = Some(older);
    store.save(ada, first).await.expect("save old");
    let mut second = draft("new");
    second.last_modified = Some(newer);
    store.save(ada, second).await.expect("save new");
    store.save(grace, draft("other")).await.expect("save other");

    let listed = store.list_for_owner(ada).await.expect("list");
    let names: Vec<&str> = listed.iter().map(|entry| entry.name.as_ref()).collect();
    assert_eq!(names, ["new", "old"]);
}

#[tokio::test]
async fn fetch_and_delete_are_scoped_to_the_owner() {
    let (_dir, pool) = test_pool();
    let ada = create_user(&pool, "ada").await;
    let grace = create_user(&pool, "grace").await;
    let store = DieselProjectStore::new(pool);

    let receipt = store.save(ada, draft("mine")).await.expect("save");

    let foreign = store
        .find_for_owner(grace, receipt.id)
        .await
        .expect("fetch ok");
    assert!(foreign.is_none());

    // A foreign delete succeeds but removes nothing.
    store
        .delete_for_owner(grace, receipt.id)
        .await
        .expect("foreign delete");
    assert!(store
        .find_for_owner(ada, receipt.id)
        .await
        .expect("fetch")
        .is_some());

    store
        .delete_for_owner(ada, receipt.id)
        .await
        .expect("own delete");
    assert!(store
        .find_for_owner(ada, receipt.id)
        .await
        .expect("fetch")
        .is_none());
}

#[tokio::test]
async fn deleting_an_absent_project_succeeds() {
    let (_dir, pool) = test_pool();
    let owner = create_user(&pool, "ada").await;
    let store = DieselProjectStore::new(pool);

    store
        .delete_for_owner(owner, ProjectId::random())
        .await
        .expect("absent delete");
}
