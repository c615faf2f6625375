//! In-memory and failing repository implementations.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use storyloom_core::catalog::CatalogEntry;
use storyloom_core::error::DomainError;
use storyloom_core::profile::UserProfile;
use storyloom_core::repository::{CatalogRepository, ProfileRepository, TaleRepository};
use storyloom_core::tale::{Tale, TaleStatus};
use uuid::Uuid;

type ReadHook = Box<dyn FnOnce(&mut Tale) + Send>;

/// A tale repository backed by a `HashMap`. Behaves like the real store,
/// including newest-first listing and status-guarded writes.
#[derive(Default)]
pub struct InMemoryTaleRepository {
    tales: Mutex<HashMap<Uuid, Tale>>,
    after_next_read: Mutex<Option<ReadHook>>,
    fail_success_writes: AtomicBool,
}

impl std::fmt::Debug for InMemoryTaleRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTaleRepository")
            .field("tales", &self.tales)
            .finish_non_exhaustive()
    }
}

impl InMemoryTaleRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with `tales`.
    #[must_use]
    pub fn with_tales(tales: impl IntoIterator<Item = Tale>) -> Self {
        let repo = Self::new();
        {
            let mut map = repo.tales.lock().unwrap();
            for tale in tales {
                map.insert(tale.id, tale);
            }
        }
        repo
    }

    /// Returns a snapshot of a stored tale.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn get(&self, tale_id: Uuid) -> Option<Tale> {
        self.tales.lock().unwrap().get(&tale_id).cloned()
    }

    /// Number of stored tales.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn len(&self) -> usize {
        self.tales.lock().unwrap().len()
    }

    /// Whether the repository holds no tales.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs `hook` against the stored tale right after the next
    /// `find_by_id` has taken its snapshot, as if another writer got in
    /// between that read and whatever the caller writes next.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn after_next_read(&self, hook: impl FnOnce(&mut Tale) + Send + 'static) {
        *self.after_next_read.lock().unwrap() = Some(Box::new(hook));
    }

    /// Makes every `record_generation_success` fail with an infrastructure
    /// error.
    #[must_use]
    pub fn failing_success_writes(self) -> Self {
        self.fail_success_writes.store(true, Ordering::SeqCst);
        self
    }

    fn modify<F>(&self, tale_id: Uuid, f: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut Tale),
    {
        let mut tales = self.tales.lock().unwrap();
        let tale = tales
            .get_mut(&tale_id)
            .ok_or_else(|| DomainError::tale_not_found(tale_id))?;
        f(tale);
        Ok(())
    }
}

#[async_trait]
impl TaleRepository for InMemoryTaleRepository {
    async fn insert(&self, tale: &Tale) -> Result<(), DomainError> {
        self.tales.lock().unwrap().insert(tale.id, tale.clone());
        Ok(())
    }

    async fn find_by_id(&self, tale_id: Uuid) -> Result<Option<Tale>, DomainError> {
        let mut tales = self.tales.lock().unwrap();
        let snapshot = tales.get(&tale_id).cloned();
        if let Some(hook) = self.after_next_read.lock().unwrap().take() {
            if let Some(stored) = tales.get_mut(&tale_id) {
                hook(stored);
            }
        }
        Ok(snapshot)
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        limit: u32,
        start_after: Option<Uuid>,
    ) -> Result<Vec<Tale>, DomainError> {
        let tales = self.tales.lock().unwrap();
        let cursor = start_after
            .and_then(|id| tales.get(&id))
            .map(|tale| (tale.created_at, tale.id));

        let mut owned: Vec<Tale> = tales
            .values()
            .filter(|tale| tale.user_id == user_id)
            .filter(|tale| cursor.is_none_or(|key| (tale.created_at, tale.id) < key))
            .cloned()
            .collect();
        owned.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        owned.truncate(limit as usize);
        Ok(owned)
    }

    async fn update_content(&self, tale: &Tale, expected: TaleStatus) -> Result<(), DomainError> {
        let mut tales = self.tales.lock().unwrap();
        let stored = tales
            .get_mut(&tale.id)
            .ok_or_else(|| DomainError::tale_not_found(tale.id))?;
        if stored.status != expected {
            return Err(DomainError::tale_status_changed(tale.id));
        }
        stored.title.clone_from(&tale.title);
        stored.body.clone_from(&tale.body);
        stored.components = tale.components.clone();
        stored.style = tale.style.clone();
        stored.updated_at = tale.updated_at;
        Ok(())
    }

    async fn compare_and_set_status(
        &self,
        tale_id: Uuid,
        expected: TaleStatus,
        next: TaleStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut tales = self.tales.lock().unwrap();
        match tales.get_mut(&tale_id) {
            Some(tale) if tale.status == expected => {
                tale.status = next;
                tale.updated_at = at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn record_generation_success(
        &self,
        tale_id: Uuid,
        body: &str,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if self.fail_success_writes.load(Ordering::SeqCst) {
            return Err(DomainError::Infrastructure("write timed out".into()));
        }
        self.modify(tale_id, |tale| {
            body.clone_into(&mut tale.body);
            tale.status = TaleStatus::Completed;
            tale.updated_at = at;
        })
    }

    async fn record_generation_failure(
        &self,
        tale_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.modify(tale_id, |tale| {
            tale.status = TaleStatus::Failed;
            tale.updated_at = at;
        })
    }

    async fn delete(&self, tale_id: Uuid) -> Result<(), DomainError> {
        self.tales.lock().unwrap().remove(&tale_id);
        Ok(())
    }
}

/// A tale repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingTaleRepository;

#[async_trait]
impl TaleRepository for FailingTaleRepository {
    async fn insert(&self, _tale: &Tale) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn find_by_id(&self, _tale_id: Uuid) -> Result<Option<Tale>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn list_for_user(
        &self,
        _user_id: &str,
        _limit: u32,
        _start_after: Option<Uuid>,
    ) -> Result<Vec<Tale>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn update_content(
        &self,
        _tale: &Tale,
        _expected: TaleStatus,
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn compare_and_set_status(
        &self,
        _tale_id: Uuid,
        _expected: TaleStatus,
        _next: TaleStatus,
        _at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn record_generation_success(
        &self,
        _tale_id: Uuid,
        _body: &str,
        _at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn record_generation_failure(
        &self,
        _tale_id: Uuid,
        _at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn delete(&self, _tale_id: Uuid) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

/// A catalog repository that returns a fixed set of rows and counts how
/// often it was queried.
#[derive(Debug, Default)]
pub struct StaticCatalogRepository {
    entries: Vec<CatalogEntry>,
    queries: AtomicUsize,
}

impl StaticCatalogRepository {
    /// Create a repository returning `entries`, which the caller supplies
    /// already filtered and ordered.
    #[must_use]
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries,
            queries: AtomicUsize::new(0),
        }
    }

    /// Number of `list_active` calls so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogRepository for StaticCatalogRepository {
    async fn list_active(&self) -> Result<Vec<CatalogEntry>, DomainError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.clone())
    }
}

/// A catalog repository that always returns an infrastructure error.
#[derive(Debug)]
pub struct FailingCatalogRepository;

#[async_trait]
impl CatalogRepository for FailingCatalogRepository {
    async fn list_active(&self) -> Result<Vec<CatalogEntry>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

/// A profile repository backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    profiles: Mutex<HashMap<String, UserProfile>>,
}

impl InMemoryProfileRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding `profiles`.
    #[must_use]
    pub fn with_profiles(profiles: impl IntoIterator<Item = UserProfile>) -> Self {
        let repo = Self::new();
        {
            let mut map = repo.profiles.lock().unwrap();
            for profile in profiles {
                map.insert(profile.user_id.clone(), profile);
            }
        }
        repo
    }

    /// Returns a snapshot of a stored profile.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn get(&self, user_id: &str) -> Option<UserProfile> {
        self.profiles.lock().unwrap().get(user_id).cloned()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find(&self, user_id: &str) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.get(user_id))
    }

    async fn insert_if_absent(&self, profile: &UserProfile) -> Result<bool, DomainError> {
        let mut profiles = self.profiles.lock().unwrap();
        if profiles.contains_key(&profile.user_id) {
            return Ok(false);
        }
        profiles.insert(profile.user_id.clone(), profile.clone());
        Ok(true)
    }

    async fn update(&self, profile: &UserProfile) -> Result<(), DomainError> {
        let mut profiles = self.profiles.lock().unwrap();
        let stored = profiles
            .get_mut(&profile.user_id)
            .ok_or_else(|| DomainError::profile_not_found(&profile.user_id))?;
        stored.language.clone_from(&profile.language);
        stored.timezone.clone_from(&profile.timezone);
        stored.allow_notifications = profile.allow_notifications;
        stored.updated_at = profile.updated_at;
        Ok(())
    }
}
