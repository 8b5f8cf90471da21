//! The live session store.
//!
//! `SessionStore` is the single source of truth for the playground. Each
//! operation derives the next [`Session`] from the current one, swaps it in,
//! mirrors the new token into the address bar and publishes it to
//! subscribers.

use std::sync::{Arc, Mutex, PoisonError};

use playground_core::codec::{Decoded, SnapshotCodec};
use playground_core::dependency::{DependencyResolver, VersionKey, Versions};
use playground_core::error::Result;
use playground_core::import_map::ImportMap;
use playground_core::location::{self, AddressBar};
use playground_core::session::{Files, Session, SessionSnapshot};
use tokio::sync::watch;

/// How the store was seeded on mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSource {
    Token,
    Defaults,
}

pub struct SessionStore {
    resolver: DependencyResolver,
    codec: Arc<dyn SnapshotCodec>,
    address_bar: Arc<dyn AddressBar>,
    current: Mutex<Arc<Session>>,
    updates: watch::Sender<Arc<Session>>,
    seeded_from: SeedSource,
}

impl SessionStore {
    /// Seeds the store from the address bar fragment, or from defaults when
    /// it is absent or unreadable, and writes the canonical token back.
    ///
    /// The store is only handed out once seeding is complete.
    pub fn mount(
        resolver: DependencyResolver,
        codec: Arc<dyn SnapshotCodec>,
        address_bar: Arc<dyn AddressBar>,
    ) -> Self {
        let (session, seeded_from) = match address_bar.fragment().map(|token| codec.decode(&token)) {
            Some(Decoded::Restored(snapshot)) => (Session::from_snapshot(snapshot), SeedSource::Token),
            Some(Decoded::NoPriorState) | None => (Session::with_defaults(&resolver), SeedSource::Defaults),
        };
        tracing::info!(seeded_from = ?seeded_from, files = session.files().len(), "Session store mounted");

        let session = Arc::new(session);
        let (updates, _) = watch::channel(session.clone());
        let store = Self {
            resolver,
            codec,
            address_bar,
            current: Mutex::new(session.clone()),
            updates,
            seeded_from,
        };
        store.persist(&session);
        store
    }

    pub fn seeded_from(&self) -> SeedSource {
        self.seeded_from
    }

    pub fn resolver(&self) -> &DependencyResolver {
        &self.resolver
    }

    /// The current session.
    pub fn session(&self) -> Arc<Session> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn files(&self) -> Files {
        self.session().files().clone()
    }

    pub fn active_file(&self) -> String {
        self.session().active_file().to_string()
    }

    pub fn versions(&self) -> Versions {
        self.session().versions().clone()
    }

    pub fn import_map(&self) -> ImportMap {
        self.session().import_map().clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session().snapshot()
    }

    /// Receives every committed session, starting with the current one.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Session>> {
        self.updates.subscribe()
    }

    // ============================================================================
    // Operations
    // ============================================================================

    pub fn update_file(&self, path: &str, content: impl Into<String>) {
        let content = content.into();
        self.apply("update_file", |s| s.with_file(path, content));
    }

    pub fn set_active_file(&self, path: &str) -> Result<()> {
        self.try_apply("set_active_file", |s| s.with_active_file(path))
    }

    pub fn remove_file(&self, path: &str) -> Result<()> {
        self.try_apply("remove_file", |s| s.without_file(path))
    }

    pub fn set_version(&self, key: VersionKey, version: &str) {
        let resolver = &self.resolver;
        self.apply("set_version", |s| s.with_version(key, version, resolver));
    }

    pub fn set_import_map(&self, import_map: ImportMap) {
        self.apply("set_import_map", |s| s.with_import_map(import_map));
    }

    pub fn reset_files(&self) {
        self.apply("reset_files", Session::with_template_files);
    }

    /// The shareable token for the current session.
    pub fn serialize(&self) -> Result<String> {
        self.codec.encode(&self.snapshot())
    }

    /// The current page URL with the current token as its fragment.
    pub fn share_url(&self) -> Result<String> {
        let token = self.serialize()?;
        Ok(location::share_url(&self.address_bar.href(), &token))
    }

    fn apply<F>(&self, operation: &'static str, transition: F)
    where
        F: FnOnce(&Session) -> Session,
    {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(transition(&current));
        self.commit(&mut *current, operation, next);
    }

    fn try_apply<F>(&self, operation: &'static str, transition: F) -> Result<()>
    where
        F: FnOnce(&Session) -> Result<Session>,
    {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(transition(&current)?);
        self.commit(&mut *current, operation, next);
        Ok(())
    }

    /// Called with the session lock held, so the address bar and subscribers
    /// observe commits in the order they happened.
    fn commit(&self, current: &mut Arc<Session>, operation: &'static str, next: Arc<Session>) {
        tracing::debug!(operation, active_file = next.active_file(), "Session updated");
        self.persist(&next);
        self.updates.send_replace(next.clone());
        *current = next;
    }

    fn persist(&self, session: &Session) {
        match self.codec.encode(&session.snapshot()) {
            Ok(token) => self.address_bar.replace_fragment(&token),
            Err(e) => tracing::error!(error = %e, "Failed to serialize session"),
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("seeded_from", &self.seeded_from)
            .field("session", &self.session())
            .finish_non_exhaustive()
    }
}
