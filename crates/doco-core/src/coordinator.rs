//! Application coordinator.
//!
//! Owns the auth session and, while a user is signed in, the workspace
//! (registry + view state). Every intent takes the state lock for its whole
//! duration, so intents apply atomically and in order; every accepted intent
//! publishes a fresh [`Snapshot`] on a watch channel.
//!
//! The workspace exists only for an authenticated session. It is built when a
//! check resolves to a user and dropped on logout or when a check resolves to
//! anonymous, so opened/active/UI state can never outlive the session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use doco_model::{AuthStatus, Document, DocumentId, User, UserId};
use tokio::sync::watch;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::auth::{AuthProvider, AuthSession};
use crate::config::CoreConfig;
use crate::error::StateError;
use crate::intent::Intent;
use crate::registry::DocumentRegistry;
use crate::snapshot::Snapshot;
use crate::source::DocumentSource;
use crate::view::{UiState, ViewState};

/// Session-scoped document and view state.
#[derive(Debug)]
struct Workspace {
    user_id: UserId,
    registry: DocumentRegistry,
    view: ViewState,
}

impl Workspace {
    fn new(user: &User, documents: Vec<Document>, config: &CoreConfig) -> Self {
        Self {
            user_id: user.id.clone(),
            registry: DocumentRegistry::new(documents),
            view: ViewState::new(&config.ui),
        }
    }

    fn activate(&mut self, id: &DocumentId) -> Result<(), StateError> {
        // Opening fails with NotFound for unknown ids, so activation
        // never points at a document the registry does not hold.
        self.registry.open(id)?;
        self.view.set_active(Some(id.clone()));
        Ok(())
    }

    fn deactivate(&mut self) {
        self.view.set_active(None);
    }

    fn close(&mut self, id: &DocumentId, config: &CoreConfig) {
        self.registry.close(id);
        if config.close_deactivates_active && self.view.active_document() == Some(id) {
            self.deactivate();
        }
    }

    fn remove(&mut self, id: &DocumentId) -> Result<(), StateError> {
        let removed = self.registry.remove(id)?;
        self.on_remove(&removed.document.id);
        Ok(())
    }

    fn on_remove(&mut self, id: &DocumentId) {
        if self.view.active_document() == Some(id) {
            self.deactivate();
        }
    }

    /// Swap in a fresh listing after a re-check for the same user.
    fn refresh(&mut self, documents: Vec<Document>) {
        for id in self.registry.replace_all(documents) {
            self.on_remove(&id);
        }
    }
}

#[derive(Debug)]
struct State {
    auth: AuthSession,
    workspace: Option<Workspace>,
    revision: u64,
}

impl State {
    fn workspace_mut(&mut self) -> Result<&mut Workspace, StateError> {
        match self.auth.status() {
            AuthStatus::Loading => Err(StateError::SessionNotReady),
            AuthStatus::Anonymous => Err(StateError::Unauthenticated),
            AuthStatus::Authenticated(_) => {
                self.workspace.as_mut().ok_or(StateError::Unauthenticated)
            }
        }
    }

    fn snapshot(&self, config: &CoreConfig) -> Snapshot {
        let status = self.auth.status().clone();
        let auth_failure = self.auth.last_failure().map(|f| f.message.clone());
        match &self.workspace {
            Some(workspace) => Snapshot {
                revision: self.revision,
                status,
                auth_failure,
                documents: workspace.registry.list_documents().to_vec(),
                opened_documents: workspace.registry.opened().to_vec(),
                recent_documents: workspace
                    .registry
                    .recent(config.recent_limit)
                    .into_iter()
                    .cloned()
                    .collect(),
                active_document: workspace.view.active_document().cloned(),
                ui: workspace.view.ui().clone(),
            },
            None => Snapshot {
                revision: self.revision,
                status,
                auth_failure,
                documents: Vec::new(),
                opened_documents: Vec::new(),
                recent_documents: Vec::new(),
                active_document: None,
                ui: UiState::from_defaults(&config.ui),
            },
        }
    }
}

/// Single authority for session, document and view state.
///
/// Share it as `Arc<AppCoordinator>`; all methods take `&self`.
pub struct AppCoordinator {
    config: CoreConfig,
    auth_provider: Arc<dyn AuthProvider>,
    document_source: Arc<dyn DocumentSource>,
    state: Mutex<State>,
    snapshots: watch::Sender<Arc<Snapshot>>,
}

impl AppCoordinator {
    pub fn new(
        config: CoreConfig,
        auth_provider: Arc<dyn AuthProvider>,
        document_source: Arc<dyn DocumentSource>,
    ) -> Self {
        let state = State {
            auth: AuthSession::new(),
            workspace: None,
            revision: 0,
        };
        let (snapshots, _) = watch::channel(Arc::new(state.snapshot(&config)));
        Self {
            config,
            auth_provider,
            document_source,
            state: Mutex::new(state),
            snapshots,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshots.borrow())
    }

    /// Receive every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshots.subscribe()
    }

    /// Resolve the session against the auth provider.
    ///
    /// Failures never surface as errors: the session becomes anonymous and
    /// the failure message lands on the snapshot. A resolution that was
    /// superseded by a newer check or a logout is discarded.
    pub async fn check_auth(&self) -> AuthStatus {
        self.run_check().instrument(info_span!("check_auth")).await
    }

    async fn run_check(&self) -> AuthStatus {
        let token = {
            let mut state = self.lock();
            let token = state.auth.begin_check();
            self.publish(&mut state);
            token
        };
        debug!(generation = token.generation(), "session check started");

        let outcome = self.auth_provider.verify_session().await;
        // `None` when the listing failed; the current registry is kept then.
        let documents = match &outcome {
            Ok(Some(user)) => match self.document_source.list_documents(user).await {
                Ok(documents) => Some(documents),
                Err(error) => {
                    warn!(%error, user = %user.id, "document listing failed");
                    None
                }
            },
            Ok(None) | Err(_) => None,
        };

        let mut state = self.lock();
        if !state.auth.resolve(token, outcome) {
            warn!(
                generation = token.generation(),
                "discarding stale session check"
            );
            return state.auth.status().clone();
        }

        let status = state.auth.status().clone();
        match &status {
            AuthStatus::Authenticated(user) => {
                let same_user = state
                    .workspace
                    .as_ref()
                    .is_some_and(|workspace| workspace.user_id == user.id);
                if same_user {
                    match (state.workspace.as_mut(), documents) {
                        (Some(workspace), Some(documents)) => workspace.refresh(documents),
                        _ => debug!(user = %user.id, "keeping current documents"),
                    }
                } else {
                    state.workspace = Some(Workspace::new(
                        user,
                        documents.unwrap_or_default(),
                        &self.config,
                    ));
                }
                info!(user = %user.id, "session authenticated");
            }
            AuthStatus::Anonymous => {
                state.workspace = None;
                match state.auth.last_failure() {
                    Some(failure) => warn!(%failure, "session check failed"),
                    None => info!("no session, anonymous"),
                }
            }
            AuthStatus::Loading => {}
        }
        self.publish(&mut state);
        status
    }

    /// End the session and drop all session-scoped state.
    pub fn logout(&self) {
        let mut state = self.lock();
        state.auth.logout();
        state.workspace = None;
        self.publish(&mut state);
        info!("logged out");
    }

    /// Show `id` in the viewer, opening it first if needed.
    pub fn activate(&self, id: &DocumentId) -> Result<(), StateError> {
        self.mutate("activate", |workspace, _| workspace.activate(id))
    }

    pub fn deactivate(&self) -> Result<(), StateError> {
        self.mutate("deactivate", |workspace, _| {
            workspace.deactivate();
            Ok(())
        })
    }

    pub fn open(&self, id: &DocumentId) -> Result<(), StateError> {
        self.mutate("open", |workspace, _| workspace.registry.open(id))
    }

    /// Idempotent; closing an id that is not open is accepted.
    pub fn close(&self, id: &DocumentId) -> Result<(), StateError> {
        self.mutate("close", |workspace, config| {
            workspace.close(id, config);
            Ok(())
        })
    }

    pub fn remove(&self, id: &DocumentId) -> Result<(), StateError> {
        self.mutate("remove", |workspace, _| workspace.remove(id))
    }

    /// Returns the new value of the flag.
    pub fn toggle_flag(&self, name: &str) -> Result<bool, StateError> {
        self.mutate("toggle_flag", |workspace, _| workspace.view.toggle(name))
    }

    pub fn set_flag(&self, name: &str, value: bool) -> Result<(), StateError> {
        self.mutate("set_flag", |workspace, _| workspace.view.set_flag(name, value))
    }

    /// Upload path: add a document or update an existing one.
    pub fn add_document(&self, document: Document) -> Result<(), StateError> {
        self.mutate("add_document", |workspace, _| {
            workspace.registry.insert(document);
            Ok(())
        })
    }

    /// Apply any intent by name.
    pub async fn dispatch(&self, intent: Intent) -> Result<(), StateError> {
        match intent {
            Intent::CheckAuth => {
                self.check_auth().await;
                Ok(())
            }
            Intent::Activate { id } => self.activate(&id),
            Intent::Deactivate => self.deactivate(),
            Intent::Open { id } => self.open(&id),
            Intent::Close { id } => self.close(&id),
            Intent::Remove { id } => self.remove(&id),
            Intent::ToggleFlag { name } => self.toggle_flag(&name).map(|_| ()),
            Intent::SetFlag { name, value } => self.set_flag(&name, value),
            Intent::AddDocument { document } => self.add_document(document),
            Intent::Logout => {
                self.logout();
                Ok(())
            }
        }
    }

    fn mutate<T>(
        &self,
        intent: &'static str,
        apply: impl FnOnce(&mut Workspace, &CoreConfig) -> Result<T, StateError>,
    ) -> Result<T, StateError> {
        let mut state = self.lock();
        let result = state
            .workspace_mut()
            .and_then(|workspace| apply(workspace, &self.config));
        match &result {
            Ok(_) => {
                self.publish(&mut state);
                debug!(intent, revision = state.revision, "intent applied");
            }
            Err(error) => debug!(intent, %error, "intent rejected"),
        }
        result
    }

    fn publish(&self, state: &mut State) {
        state.revision += 1;
        self.snapshots
            .send_replace(Arc::new(state.snapshot(&self.config)));
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for AppCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("AppCoordinator")
            .field("config", &self.config)
            .field("status", &state.auth.status().label())
            .field("revision", &state.revision)
            .field("has_workspace", &state.workspace.is_some())
            .finish()
    }
}
