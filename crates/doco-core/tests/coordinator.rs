//! Integration tests for the application coordinator.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use doco_core::{
    AppCoordinator, AuthProvider, Content, CoreConfig, DocumentSource, Intent, Screen,
    SourceError, StateError, StaticAuthProvider, StaticDocumentSource,
};
use doco_model::{AuthFailure, AuthStatus, Document, DocumentId, User, UserId};
use tokio::sync::Notify;

fn id(value: &str) -> DocumentId {
    DocumentId::new(value).unwrap()
}

fn doc(value: &str) -> Document {
    Document::new(id(value), format!("{value}.pdf"))
}

fn user(value: &str) -> User {
    User::new(UserId::new(value).unwrap(), value.to_uppercase())
}

fn coordinator_with(config: CoreConfig, ids: &[&str]) -> AppCoordinator {
    AppCoordinator::new(
        config,
        Arc::new(StaticAuthProvider::authenticated(user("ada"))),
        Arc::new(StaticDocumentSource::new(ids.iter().map(|v| doc(v)).collect())),
    )
}

async fn signed_in(ids: &[&str]) -> AppCoordinator {
    let coordinator = coordinator_with(CoreConfig::default(), ids);
    coordinator.check_auth().await;
    coordinator
}

// =========================================================================
// Session gate
// =========================================================================

#[tokio::test]
async fn intents_before_first_check_are_not_ready() {
    let coordinator = coordinator_with(CoreConfig::default(), &["a", "b"]);
    let before = coordinator.snapshot();
    assert!(before.status.is_loading());

    assert_eq!(coordinator.activate(&id("a")), Err(StateError::SessionNotReady));
    assert_eq!(coordinator.toggle_flag("showFileManager"), Err(StateError::SessionNotReady));

    assert_eq!(coordinator.snapshot(), before);
}

#[tokio::test]
async fn check_auth_builds_workspace_from_source() {
    let coordinator = signed_in(&["a", "b"]).await;
    let snapshot = coordinator.snapshot();

    assert_eq!(snapshot.status, AuthStatus::Authenticated(user("ada")));
    assert_eq!(snapshot.documents, vec![doc("a"), doc("b")]);
    assert!(snapshot.opened_documents.is_empty());
    assert!(snapshot.active_document.is_none());
}

#[tokio::test]
async fn anonymous_session_rejects_document_intents() {
    let coordinator = AppCoordinator::new(
        CoreConfig::default(),
        Arc::new(StaticAuthProvider::anonymous()),
        Arc::new(StaticDocumentSource::new(vec![doc("a")])),
    );
    assert_eq!(coordinator.check_auth().await, AuthStatus::Anonymous);
    assert_eq!(coordinator.open(&id("a")), Err(StateError::Unauthenticated));
    assert!(coordinator.snapshot().documents.is_empty());
}

#[tokio::test]
async fn auth_failure_is_a_status_not_an_error() {
    let coordinator = AppCoordinator::new(
        CoreConfig::default(),
        Arc::new(StaticAuthProvider::failing("token expired")),
        Arc::new(StaticDocumentSource::default()),
    );
    let status = coordinator.check_auth().await;
    assert_eq!(status, AuthStatus::Anonymous);

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.auth_failure.as_deref(), Some("token expired"));
    assert_eq!(
        snapshot.screen(),
        Screen::Login {
            failure: Some("token expired")
        }
    );
}

// =========================================================================
// Document intents
// =========================================================================

#[tokio::test]
async fn activating_unopened_document_opens_it() {
    let coordinator = signed_in(&["a", "b"]).await;

    coordinator.activate(&id("a")).unwrap();

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.opened_documents, vec![id("a")]);
    assert_eq!(snapshot.active_document, Some(id("a")));
}

#[tokio::test]
async fn activating_unknown_document_is_not_found() {
    let coordinator = signed_in(&["a"]).await;
    let before = coordinator.snapshot();

    assert_eq!(coordinator.activate(&id("zz")), Err(StateError::NotFound(id("zz"))));
    assert_eq!(coordinator.snapshot(), before);
}

#[tokio::test]
async fn removing_active_document_clears_activation() {
    let coordinator = signed_in(&["a", "b"]).await;
    coordinator.open(&id("b")).unwrap();
    coordinator.activate(&id("a")).unwrap();

    coordinator.remove(&id("a")).unwrap();

    let snapshot = coordinator.snapshot();
    assert!(snapshot.active_document.is_none());
    assert_eq!(snapshot.opened_documents, vec![id("b")]);
    assert!(snapshot.find_document(&id("a")).is_none());
}

#[tokio::test]
async fn removing_other_document_keeps_activation() {
    let coordinator = signed_in(&["a", "b"]).await;
    coordinator.activate(&id("a")).unwrap();
    coordinator.remove(&id("b")).unwrap();
    assert_eq!(coordinator.snapshot().active_document, Some(id("a")));
}

#[tokio::test]
async fn reopening_moves_to_front() {
    let coordinator = signed_in(&["a", "b"]).await;
    coordinator.open(&id("b")).unwrap();
    coordinator.open(&id("a")).unwrap();
    assert_eq!(coordinator.snapshot().opened_documents, vec![id("a"), id("b")]);

    coordinator.open(&id("b")).unwrap();
    assert_eq!(coordinator.snapshot().opened_documents, vec![id("b"), id("a")]);
}

#[tokio::test]
async fn recent_window_holds_five_most_recent() {
    let ids = ["a", "b", "c", "d", "e", "f"];
    let coordinator = signed_in(&ids).await;
    for value in ids {
        coordinator.open(&id(value)).unwrap();
    }

    let snapshot = coordinator.snapshot();
    let recent: Vec<&str> = snapshot
        .recent_documents
        .iter()
        .map(|d| d.id.as_str())
        .collect();
    assert_eq!(recent, vec!["f", "e", "d", "c", "b"]);
    assert_eq!(snapshot.opened_documents.len(), 6);
}

#[tokio::test]
async fn recent_limit_is_configurable() {
    let config = CoreConfig {
        recent_limit: 2,
        ..CoreConfig::default()
    };
    let coordinator = coordinator_with(config, &["a", "b", "c"]);
    coordinator.check_auth().await;
    for value in ["a", "b", "c"] {
        coordinator.open(&id(value)).unwrap();
    }
    assert_eq!(coordinator.snapshot().recent_documents, vec![doc("c"), doc("b")]);
}

#[tokio::test]
async fn closing_active_document_keeps_it_unlisted() {
    let coordinator = signed_in(&["a"]).await;
    coordinator.activate(&id("a")).unwrap();
    coordinator.close(&id("a")).unwrap();

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.active_document, Some(id("a")));
    assert!(snapshot.opened_documents.is_empty());
    assert!(snapshot.is_active_unlisted());
}

#[tokio::test]
async fn closing_active_document_can_deactivate() {
    let config = CoreConfig {
        close_deactivates_active: true,
        ..CoreConfig::default()
    };
    let coordinator = coordinator_with(config, &["a"]);
    coordinator.check_auth().await;
    coordinator.activate(&id("a")).unwrap();
    coordinator.close(&id("a")).unwrap();
    assert!(coordinator.snapshot().active_document.is_none());
}

#[tokio::test]
async fn close_is_idempotent_and_accepts_unknown_ids() {
    let coordinator = signed_in(&["a"]).await;
    assert_eq!(coordinator.close(&id("a")), Ok(()));
    assert_eq!(coordinator.close(&id("missing")), Ok(()));
}

#[tokio::test]
async fn deactivate_keeps_opened_documents() {
    let coordinator = signed_in(&["a", "b"]).await;
    coordinator.activate(&id("a")).unwrap();
    coordinator.activate(&id("b")).unwrap();
    coordinator.deactivate().unwrap();

    let snapshot = coordinator.snapshot();
    assert!(snapshot.active_document.is_none());
    assert_eq!(snapshot.opened_documents, vec![id("b"), id("a")]);
}

#[tokio::test]
async fn add_document_then_activate() {
    let coordinator = signed_in(&[]).await;
    assert_eq!(coordinator.activate(&id("new")), Err(StateError::NotFound(id("new"))));

    coordinator
        .add_document(doc("new").with_metadata("pages", "3"))
        .unwrap();
    coordinator.activate(&id("new")).unwrap();

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.active().map(|d| d.metadata["pages"].as_str()), Some("3"));
}

// =========================================================================
// UI flags
// =========================================================================

#[tokio::test]
async fn toggle_flag_flips_and_rejects_unknown_names() {
    let coordinator = signed_in(&[]).await;
    assert_eq!(coordinator.toggle_flag("showFileManager"), Ok(true));
    assert!(coordinator.snapshot().ui.show_file_manager());

    let revision = coordinator.snapshot().revision;
    assert_eq!(
        coordinator.toggle_flag("showSidebar"),
        Err(StateError::UnknownFlag("showSidebar".to_string()))
    );
    assert_eq!(coordinator.snapshot().revision, revision);
}

// =========================================================================
// Logout
// =========================================================================

#[tokio::test]
async fn logout_resets_session_state() {
    let config = CoreConfig::default();
    let coordinator = coordinator_with(config, &["a", "b", "c"]);
    coordinator.check_auth().await;
    coordinator.open(&id("c")).unwrap();
    coordinator.activate(&id("a")).unwrap();
    coordinator.set_flag("showFileManager", true).unwrap();

    coordinator.logout();

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.status, AuthStatus::Anonymous);
    assert!(snapshot.opened_documents.is_empty());
    assert!(snapshot.active_document.is_none());
    assert!(!snapshot.ui.show_file_manager());
    assert_eq!(coordinator.open(&id("a")), Err(StateError::Unauthenticated));
}

#[tokio::test]
async fn signing_back_in_starts_fresh() {
    let coordinator = signed_in(&["a"]).await;
    coordinator.activate(&id("a")).unwrap();
    coordinator.logout();
    coordinator.check_auth().await;

    let snapshot = coordinator.snapshot();
    assert!(snapshot.active_document.is_none());
    assert!(snapshot.opened_documents.is_empty());
    assert_eq!(snapshot.documents, vec![doc("a")]);
}

// =========================================================================
// Stale and superseded checks
// =========================================================================

/// First call blocks until released and returns `first`; later calls
/// return `later` immediately.
struct GatedProvider {
    calls: AtomicUsize,
    gate: Notify,
    first: Option<User>,
    later: Option<User>,
}

#[async_trait]
impl AuthProvider for GatedProvider {
    async fn verify_session(&self) -> Result<Option<User>, AuthFailure> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.gate.notified().await;
            Ok(self.first.clone())
        } else {
            Ok(self.later.clone())
        }
    }
}

fn gated(first: Option<User>, later: Option<User>) -> Arc<GatedProvider> {
    Arc::new(GatedProvider {
        calls: AtomicUsize::new(0),
        gate: Notify::new(),
        first,
        later,
    })
}

#[tokio::test]
async fn check_resolving_after_logout_is_discarded() {
    let provider = gated(Some(user("ada")), None);
    let coordinator = Arc::new(AppCoordinator::new(
        CoreConfig::default(),
        provider.clone(),
        Arc::new(StaticDocumentSource::new(vec![doc("a")])),
    ));
    let mut snapshots = coordinator.subscribe();

    let pending = tokio::spawn({
        let coordinator = Arc::clone(&coordinator);
        async move { coordinator.check_auth().await }
    });
    snapshots
        .wait_for(|s| s.revision >= 1 && s.status.is_loading())
        .await
        .unwrap();

    coordinator.logout();
    provider.gate.notify_one();

    assert_eq!(pending.await.unwrap(), AuthStatus::Anonymous);
    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.status, AuthStatus::Anonymous);
    assert!(snapshot.documents.is_empty());
}

#[tokio::test]
async fn superseded_check_is_discarded() {
    let provider = gated(Some(user("stale")), Some(user("ada")));
    let coordinator = Arc::new(AppCoordinator::new(
        CoreConfig::default(),
        provider.clone(),
        Arc::new(StaticDocumentSource::default()),
    ));
    let mut snapshots = coordinator.subscribe();

    let first = tokio::spawn({
        let coordinator = Arc::clone(&coordinator);
        async move { coordinator.check_auth().await }
    });
    snapshots
        .wait_for(|s| s.revision >= 1 && s.status.is_loading())
        .await
        .unwrap();

    let second = coordinator.check_auth().await;
    assert_eq!(second, AuthStatus::Authenticated(user("ada")));

    provider.gate.notify_one();
    first.await.unwrap();

    assert_eq!(
        coordinator.snapshot().status,
        AuthStatus::Authenticated(user("ada"))
    );
}

#[tokio::test]
async fn recheck_for_same_user_keeps_opened_documents() {
    let coordinator = signed_in(&["a", "b"]).await;
    coordinator.activate(&id("b")).unwrap();
    coordinator.open(&id("a")).unwrap();

    coordinator.check_auth().await;

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.opened_documents, vec![id("a"), id("b")]);
    assert_eq!(snapshot.active_document, Some(id("b")));
}

/// Lists fewer documents on every call.
struct ShrinkingSource {
    calls: AtomicUsize,
}

#[async_trait]
impl DocumentSource for ShrinkingSource {
    async fn list_documents(&self, _user: &User) -> Result<Vec<Document>, SourceError> {
        match self.calls.fetch_add(1, Ordering::SeqCst) {
            0 => Ok(vec![doc("a"), doc("b")]),
            1 => Ok(vec![doc("b")]),
            _ => Err(SourceError::Listing {
                message: "backend unavailable".to_string(),
            }),
        }
    }
}

#[tokio::test]
async fn recheck_prunes_documents_that_disappeared() {
    let coordinator = AppCoordinator::new(
        CoreConfig::default(),
        Arc::new(StaticAuthProvider::authenticated(user("ada"))),
        Arc::new(ShrinkingSource {
            calls: AtomicUsize::new(0),
        }),
    );
    coordinator.check_auth().await;
    coordinator.open(&id("b")).unwrap();
    coordinator.activate(&id("a")).unwrap();

    coordinator.check_auth().await;
    let snapshot = coordinator.snapshot();
    assert!(snapshot.active_document.is_none());
    assert_eq!(snapshot.opened_documents, vec![id("b")]);

}

#[tokio::test]
async fn failed_relisting_keeps_current_documents() {
    let coordinator = AppCoordinator::new(
        CoreConfig::default(),
        Arc::new(StaticAuthProvider::authenticated(user("ada"))),
        Arc::new(ShrinkingSource {
            calls: AtomicUsize::new(1),
        }),
    );
    coordinator.check_auth().await;
    coordinator.activate(&id("b")).unwrap();
    let before = coordinator.snapshot();

    coordinator.check_auth().await;
    let after = coordinator.snapshot();
    assert!(after.user().is_some());
    assert_eq!(after.documents, before.documents);
    assert_eq!(after.opened_documents, vec![id("b")]);
    assert_eq!(after.active_document, Some(id("b")));
}

#[tokio::test]
async fn failed_first_listing_starts_empty() {
    let coordinator = AppCoordinator::new(
        CoreConfig::default(),
        Arc::new(StaticAuthProvider::authenticated(user("ada"))),
        Arc::new(ShrinkingSource {
            calls: AtomicUsize::new(2),
        }),
    );
    coordinator.check_auth().await;
    let snapshot = coordinator.snapshot();
    assert!(snapshot.user().is_some());
    assert!(snapshot.documents.is_empty());
    assert_eq!(coordinator.open(&id("a")), Err(StateError::NotFound(id("a"))));
}

// =========================================================================
// Snapshots and subscription
// =========================================================================

#[tokio::test]
async fn subscribers_see_every_accepted_intent() {
    let coordinator = signed_in(&["a"]).await;
    let mut snapshots = coordinator.subscribe();
    let start = snapshots.borrow_and_update().revision;

    coordinator.activate(&id("a")).unwrap();
    assert!(snapshots.has_changed().unwrap());
    let latest = snapshots.borrow_and_update().clone();
    assert_eq!(latest.revision, start + 1);
    assert_eq!(latest.active_document, Some(id("a")));

    assert!(coordinator.activate(&id("missing")).is_err());
    assert!(!snapshots.has_changed().unwrap());
}

#[tokio::test]
async fn screen_follows_session_and_activation() {
    let coordinator = coordinator_with(CoreConfig::default(), &["a", "b"]);
    assert_eq!(coordinator.snapshot().screen(), Screen::Loading);

    coordinator.check_auth().await;
    let snapshot = coordinator.snapshot();
    assert_eq!(
        snapshot.screen(),
        Screen::Workspace {
            file_manager: false,
            content: Content::Welcome { recent: vec![] },
        }
    );

    coordinator.activate(&id("b")).unwrap();
    coordinator.set_flag("showFileManager", true).unwrap();
    let snapshot = coordinator.snapshot();
    assert_eq!(
        snapshot.screen(),
        Screen::Workspace {
            file_manager: true,
            content: Content::Viewer(&doc("b")),
        }
    );

    coordinator.deactivate().unwrap();
    let snapshot = coordinator.snapshot();
    let expected = doc("b");
    assert_eq!(
        snapshot.screen(),
        Screen::Workspace {
            file_manager: true,
            content: Content::Welcome {
                recent: vec![&expected]
            },
        }
    );
}

#[tokio::test]
async fn dispatch_routes_every_intent() {
    let coordinator = coordinator_with(CoreConfig::default(), &["a", "b"]);
    let script = vec![
        Intent::CheckAuth,
        Intent::Open { id: id("a") },
        Intent::Activate { id: id("b") },
        Intent::ToggleFlag {
            name: "showFileManager".to_string(),
        },
        Intent::AddDocument {
            document: doc("c"),
        },
        Intent::Close { id: id("a") },
        Intent::Remove { id: id("b") },
    ];
    for intent in script {
        coordinator.dispatch(intent).await.unwrap();
    }

    let snapshot = coordinator.snapshot();
    assert!(snapshot.opened_documents.is_empty());
    assert!(snapshot.active_document.is_none());
    assert_eq!(snapshot.documents, vec![doc("a"), doc("c")]);
    assert!(snapshot.ui.show_file_manager());

    coordinator.dispatch(Intent::Logout).await.unwrap();
    assert_eq!(
        coordinator
            .dispatch(Intent::SetFlag {
                name: "showFileManager".to_string(),
                value: false
            })
            .await,
        Err(StateError::Unauthenticated)
    );
}

#[tokio::test]
async fn snapshot_serializes_for_consumers() {
    let coordinator = signed_in(&["a"]).await;
    coordinator.activate(&id("a")).unwrap();
    let json = serde_json::to_value(&*coordinator.snapshot()).unwrap();

    assert_eq!(json["status"]["status"], "authenticated");
    assert_eq!(json["active_document"], "a");
    assert_eq!(json["opened_documents"][0], "a");
    assert_eq!(json["ui"]["showFileManager"], false);
}

// =========================================================================
// Concurrency
// =========================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_intents_apply_one_at_a_time() {
    const IDS: [&str; 6] = ["a", "b", "c", "d", "e", "f"];
    let coordinator = Arc::new(signed_in(&IDS).await);
    let start = coordinator.snapshot().revision;

    let mut tasks = Vec::new();
    for worker in 0..4usize {
        let coordinator = Arc::clone(&coordinator);
        tasks.push(tokio::spawn(async move {
            let mut accepted = 0u64;
            let mut last_seen = 0u64;
            for round in 0..60usize {
                let target = id(IDS[(worker + round) % IDS.len()]);
                let result = match round % 5 {
                    0 => coordinator.open(&target),
                    1 => coordinator.activate(&target),
                    2 => coordinator.close(&target),
                    3 if worker == 0 && round % 20 == 3 => coordinator.remove(&target),
                    _ => coordinator.deactivate(),
                };
                if result.is_ok() {
                    accepted += 1;
                }
                let revision = coordinator.snapshot().revision;
                assert!(revision >= last_seen);
                last_seen = revision;
                tokio::task::yield_now().await;
            }
            accepted
        }));
    }

    let mut accepted = 0;
    for task in tasks {
        accepted += task.await.unwrap();
    }

    // Every accepted intent published exactly one revision.
    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.revision, start + accepted);
    assert_eq!(snapshot.documents.len(), IDS.len() - 3);
    for opened in &snapshot.opened_documents {
        assert!(snapshot.find_document(opened).is_some());
    }
    let mut distinct = snapshot.opened_documents.clone();
    distinct.sort();
    distinct.dedup();
    assert_eq!(distinct.len(), snapshot.opened_documents.len());
    if let Some(active) = &snapshot.active_document {
        assert!(snapshot.find_document(active).is_some());
    }
}
