// Dashboard store - owns the live collection and every mutation on it
use crate::application::dashboard_repository::{DashboardRepository, RepositoryError};
use crate::application::drag::{DragEngine, MoveRequest};
use crate::application::session::Session;
use crate::domain::schema;
use crate::domain::{Collection, Dashboard, DashboardId, NewWidget, SectionId, WidgetId};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, watch};
use tokio_stream::wrappers::WatchStream;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The change is live in memory but the write did not land.
    #[error("dashboards changed locally but were not saved: {0}")]
    Persist(#[from] RepositoryError),

    /// The stored document could not be decoded on the last load. Saving
    /// stays off until a load succeeds so the partial local copy never
    /// overwrites it.
    #[error("stored dashboards could not be decoded; saving is paused until they load")]
    Unreadable,
}

/// Something was created and is live, but saving it failed. Carries the new
/// id so the caller can still address the item.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct Unsaved<T> {
    pub value: T,
    #[source]
    pub error: StoreError,
}

impl<T> Unsaved<T> {
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> From<Unsaved<T>> for StoreError {
    fn from(unsaved: Unsaved<T>) -> Self {
        unsaved.error
    }
}

/// Write-through cache over a [`DashboardRepository`].
///
/// Every mutation builds a new [`Collection`] from the current one and
/// publishes it in a single step, so observers never see a half-applied
/// change. The new value is adopted before the write goes out (optimistic)
/// and is not rolled back if the write fails; the error is logged and
/// returned. Writes are serialized and always carry the latest snapshot, so
/// the stored document ends up matching the newest local state
/// (last write wins). Unknown ids make a mutation a silent no-op that is
/// neither published nor saved.
///
/// A load that fetched the document but could not decode it leaves the
/// store empty with saving paused ([`StoreError::Unreadable`]); transport
/// failures only degrade to an empty collection.
pub struct DashboardStore {
    repository: Arc<dyn DashboardRepository>,
    collection: watch::Sender<Arc<Collection>>,
    session: watch::Sender<Session>,
    write_gate: Mutex<()>,
    unreadable: AtomicBool,
}

impl DashboardStore {
    pub fn new(repository: Arc<dyn DashboardRepository>) -> Self {
        let (collection, _) = watch::channel(Arc::new(Collection::default()));
        let (session, _) = watch::channel(Session::default());
        Self {
            repository,
            collection,
            session,
            write_gate: Mutex::new(()),
            unreadable: AtomicBool::new(false),
        }
    }

    pub fn snapshot(&self) -> Arc<Collection> {
        self.collection.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Collection>> {
        self.collection.subscribe()
    }

    /// Stream of collection values, starting with the current one.
    pub fn changes(&self) -> WatchStream<Arc<Collection>> {
        WatchStream::new(self.collection.subscribe())
    }

    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    pub fn subscribe_session(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    pub fn active_dashboard(&self) -> Option<Dashboard> {
        let id = self.session.borrow().active_dashboard_id.clone()?;
        self.snapshot().get(&id).cloned()
    }

    /// Fetch and upgrade the stored collection and adopt it as the live
    /// copy. A failed fetch is logged and yields an empty collection.
    pub async fn load(&self) -> Arc<Collection> {
        let records = match self.repository.fetch_all().await {
            Ok(records) => {
                self.unreadable.store(false, Ordering::SeqCst);
                records
            }
            Err(RepositoryError::Json(e)) => {
                tracing::error!("Stored dashboards could not be decoded, saving paused: {}", e);
                self.unreadable.store(true, Ordering::SeqCst);
                Vec::new()
            }
            Err(e) => {
                tracing::error!("Error fetching dashboards: {}", e);
                Vec::new()
            }
        };
        self.adopt_loaded(records)
    }

    /// Re-fetch the stored collection. Unlike [`load`](Self::load), a failed
    /// fetch keeps the current live copy.
    pub async fn refresh(&self) -> Arc<Collection> {
        match self.repository.fetch_all().await {
            Ok(records) => {
                self.unreadable.store(false, Ordering::SeqCst);
                self.adopt_loaded(records)
            }
            Err(e) => {
                tracing::warn!("Refreshing dashboards failed, keeping local copy: {}", e);
                self.snapshot()
            }
        }
    }

    fn adopt_loaded(&self, records: Vec<schema::DashboardRecord>) -> Arc<Collection> {
        let collection = Arc::new(schema::upgrade(records));
        self.publish(collection.clone(), Session::select_default);
        tracing::info!("Loaded {} dashboards", collection.len());
        collection
    }

    /// Adopt `collection` verbatim and save it.
    pub async fn replace_all(&self, collection: Collection) -> Result<(), StoreError> {
        self.publish(Arc::new(collection), Session::reconcile);
        self.persist().await
    }

    /// Append a dashboard with one empty section and make it active.
    pub async fn add_dashboard(
        &self,
        name: impl Into<String>,
        columns: u32,
        path: impl AsRef<str>,
    ) -> Result<DashboardId, Unsaved<DashboardId>> {
        let dashboard = Dashboard::new(name, columns, path);
        let id = dashboard.id.clone();
        self.apply(|collection| {
            collection.push(dashboard);
            Some(())
        });
        self.session.send_modify(|session| {
            session.active_dashboard_id = Some(id.clone());
        });
        tracing::debug!("Added dashboard {}", id);
        match self.persist().await {
            Ok(()) => Ok(id),
            Err(error) => Err(Unsaved { value: id, error }),
        }
    }

    pub async fn delete_dashboard(&self, id: &DashboardId) -> Result<bool, StoreError> {
        let removed = self.apply(|collection| collection.remove(id).then_some(()));
        self.commit(removed).await
    }

    /// Replace the dashboard with the same id (settings edits).
    pub async fn update_dashboard(&self, dashboard: Dashboard) -> Result<bool, StoreError> {
        let replaced = self.apply(|collection| collection.replace(dashboard).then_some(()));
        self.commit(replaced).await
    }

    pub async fn add_section(
        &self,
        dashboard_id: &DashboardId,
        title: impl Into<String>,
        column: Option<u32>,
    ) -> Result<Option<SectionId>, Unsaved<SectionId>> {
        let title = title.into();
        let added = self.apply(|collection| {
            let dashboard = collection.get_mut(dashboard_id)?;
            Some(dashboard.add_section(title, column))
        });
        self.commit_created(added).await
    }

    /// Remove a section together with its widgets.
    pub async fn delete_section(
        &self,
        dashboard_id: &DashboardId,
        section_id: &SectionId,
    ) -> Result<bool, StoreError> {
        let removed = self.apply(|collection| {
            collection
                .get_mut(dashboard_id)?
                .remove_section(section_id)
                .then_some(())
        });
        self.commit(removed).await
    }

    /// Append a widget to the end of a section under a fresh id.
    pub async fn add_widget(
        &self,
        dashboard_id: &DashboardId,
        section_id: &SectionId,
        widget: NewWidget,
    ) -> Result<Option<WidgetId>, Unsaved<WidgetId>> {
        let added = self.apply(|collection| {
            let section = collection.get_mut(dashboard_id)?.section_mut(section_id)?;
            let id = WidgetId::generate();
            section.widgets.push(widget.with_id(id.clone()));
            Some(id)
        });
        self.commit_created(added).await
    }

    pub async fn remove_widget(
        &self,
        dashboard_id: &DashboardId,
        section_id: &SectionId,
        widget_id: &WidgetId,
    ) -> Result<bool, StoreError> {
        let removed = self.apply(|collection| {
            collection
                .get_mut(dashboard_id)?
                .remove_widget(section_id, widget_id)
                .then_some(())
        });
        self.commit(removed).await
    }

    /// See [`Dashboard::move_widget`] for index semantics.
    pub async fn move_widget(
        &self,
        dashboard_id: &DashboardId,
        source: &SectionId,
        destination: &SectionId,
        widget_id: &WidgetId,
        new_index: usize,
    ) -> Result<bool, StoreError> {
        let moved = self.apply(|collection| {
            collection
                .get_mut(dashboard_id)?
                .move_widget(source, destination, widget_id, new_index)
                .then_some(())
        });
        if moved.is_none() {
            tracing::warn!(
                "Ignoring move of widget {} from section {}: not found",
                widget_id,
                source
            );
        }
        self.commit(moved).await
    }

    pub async fn apply_move(&self, request: &MoveRequest) -> Result<bool, StoreError> {
        self.move_widget(
            &request.dashboard_id,
            &request.source_section,
            &request.destination_section,
            &request.widget_id,
            request.new_index,
        )
        .await
    }

    /// End a drag on the active dashboard and apply the resulting move.
    pub async fn complete_drag(
        &self,
        engine: &mut DragEngine,
        over: Option<&str>,
    ) -> Result<bool, StoreError> {
        let Some(dashboard) = self.active_dashboard() else {
            engine.cancel();
            return Ok(false);
        };
        match engine.drop(&dashboard, over) {
            Some(request) => self.apply_move(&request).await,
            None => Ok(false),
        }
    }

    /// Select a dashboard. An id that is not in the collection clears the
    /// selection.
    pub fn set_active_dashboard_id(&self, id: Option<DashboardId>) {
        let snapshot = self.snapshot();
        let id = id.filter(|id| {
            let known = snapshot.contains(id);
            if !known {
                tracing::warn!("Unknown dashboard {} selected, clearing selection", id);
            }
            known
        });
        self.session
            .send_modify(|session| session.active_dashboard_id = id);
    }

    /// Flip edit mode, returning the new value.
    pub fn toggle_editing(&self) -> bool {
        let mut editing = false;
        self.session.send_modify(|session| {
            session.editing = !session.editing;
            editing = session.editing;
        });
        editing
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Publish `next` along with the session it implies. The session is
    /// aligned first, while the collection update is still in progress, so a
    /// session observer never reads a selection outside the published
    /// collection.
    fn publish(&self, next: Arc<Collection>, align: impl FnOnce(&mut Session, &Collection) -> bool) {
        self.collection.send_modify(|current| {
            self.session
                .send_if_modified(|session| align(session, &*next));
            *current = next;
        });
    }

    /// Run `op` on a copy of the live collection and publish the copy if
    /// `op` returns `Some`. `None` means nothing changed.
    fn apply<T>(&self, op: impl FnOnce(&mut Collection) -> Option<T>) -> Option<T> {
        let mut outcome = None;
        self.collection.send_if_modified(|current| {
            let mut next = Collection::clone(current);
            match op(&mut next) {
                Some(value) => {
                    self.session
                        .send_if_modified(|session| session.reconcile(&next));
                    *current = Arc::new(next);
                    outcome = Some(value);
                    true
                }
                None => false,
            }
        });
        outcome
    }

    async fn commit(&self, outcome: Option<()>) -> Result<bool, StoreError> {
        if outcome.is_none() {
            return Ok(false);
        }
        self.persist().await?;
        Ok(true)
    }

    async fn commit_created<T>(&self, outcome: Option<T>) -> Result<Option<T>, Unsaved<T>> {
        let Some(value) = outcome else {
            return Ok(None);
        };
        match self.persist().await {
            Ok(()) => Ok(Some(value)),
            Err(error) => Err(Unsaved { value, error }),
        }
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let _gate = self.write_gate.lock().await;
        if self.unreadable.load(Ordering::SeqCst) {
            tracing::warn!("Not saving dashboards: the stored copy could not be decoded");
            return Err(StoreError::Unreadable);
        }
        let snapshot = self.snapshot();
        match self.repository.replace_all(&snapshot).await {
            Ok(()) => {
                tracing::debug!("Saved {} dashboards", snapshot.len());
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error saving dashboards: {}", e);
                Err(StoreError::Persist(e))
            }
        }
    }
}
