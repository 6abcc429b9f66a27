//! Observable catalog store.
//!
//! Lifecycle of the catalog snapshot:
//!
//! ```text
//! Idle ──fetch──▶ Loading ──ok──▶ Loaded ──fetch──▶ Loading ...
//!                    └──err──▶ Failed ──fetch──▶ Loading ...
//! ```
//!
//! A failed refresh keeps the previously loaded products. Filter mutations are
//! accepted in every state, including while a fetch is in flight; the
//! resolving fetch re-derives the view with whatever filters are current then.
//!
//! Every fetch takes a generation number. A response is applied only while no
//! newer fetch is still in flight and no newer response has been applied, so
//! a slow first request can never overwrite the result of a later one. A fetch
//! whose future is dropped gives up its generation.

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use storefront_core::{ProductId, SubscriptionId};
use storefront_events::{ChangeBus, InMemoryChangeBus, Subscription};

use crate::filter::{ALL_CATEGORIES, categories, filter_products};
use crate::product::Product;
use crate::source::ProductSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogStatus {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// What changed in the catalog store.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogChange {
    LoadingStarted,
    ProductsLoaded { count: usize },
    LoadFailed { message: String },
    /// Every in-flight fetch was dropped; the store is back to `status`.
    LoadAbandoned { status: CatalogStatus },
    CategoryChanged(String),
    SearchChanged(String),
    GridViewToggled(bool),
}

/// Point-in-time copy of the store state, for rendering in one pass.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub all_products: Vec<Arc<Product>>,
    pub visible_products: Vec<Arc<Product>>,
    pub categories: Vec<String>,
    pub active_category: String,
    pub search_text: String,
    pub status: CatalogStatus,
    pub is_loading: bool,
    pub last_error: Option<String>,
    pub last_loaded_at: Option<DateTime<Utc>>,
    pub is_grid_view: bool,
}

#[derive(Debug)]
struct CatalogState {
    all_products: Vec<Arc<Product>>,
    visible: Vec<Arc<Product>>,
    active_category: String,
    search_text: String,
    status: CatalogStatus,
    last_error: Option<String>,
    last_loaded_at: Option<DateTime<Utc>>,
    grid_view: bool,
    next_request: u64,
    applied_request: u64,
    in_flight: BTreeSet<u64>,
    // Status and error to fall back to if every in-flight fetch is abandoned.
    settled_status: CatalogStatus,
    settled_error: Option<String>,
}

impl CatalogState {
    fn new() -> Self {
        Self {
            all_products: Vec::new(),
            visible: Vec::new(),
            active_category: ALL_CATEGORIES.to_string(),
            search_text: String::new(),
            status: CatalogStatus::Idle,
            last_error: None,
            last_loaded_at: None,
            grid_view: true,
            next_request: 0,
            applied_request: 0,
            in_flight: BTreeSet::new(),
            settled_status: CatalogStatus::Idle,
            settled_error: None,
        }
    }

    fn refilter(&mut self) {
        self.visible = filter_products(&self.all_products, &self.active_category, &self.search_text);
    }
}

/// Session catalog: products, filters and load status behind one handle.
pub struct CatalogStore<S> {
    source: S,
    state: RwLock<CatalogState>,
    bus: InMemoryChangeBus<CatalogChange>,
}

impl<S> core::fmt::Debug for CatalogStore<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("state", &self.state)
            .field("subscribers", &self.bus.subscriber_count())
            .finish_non_exhaustive()
    }
}

impl<S> CatalogStore<S>
where
    S: ProductSource,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: RwLock::new(CatalogState::new()),
            bus: InMemoryChangeBus::new(),
        }
    }

    /// Fetch the full catalog and replace the snapshot.
    ///
    /// Errors are absorbed: they move the store to `Failed` and set
    /// `last_error`. Returns the status once this call is done.
    ///
    /// Dropping the returned future before it resolves abandons the request:
    /// older requests still in flight become eligible again, and with none
    /// left the store returns to the status it had before loading.
    pub async fn fetch_products(&self) -> CatalogStatus {
        let generation = {
            let mut state = self.write_state();
            state.next_request += 1;
            let generation = state.next_request;
            if state.status != CatalogStatus::Loading {
                state.settled_status = state.status;
                state.settled_error = state.last_error.take();
            }
            state.in_flight.insert(generation);
            state.status = CatalogStatus::Loading;
            state.last_error = None;
            generation
        };
        let mut pending = PendingFetch {
            store: self,
            generation,
            finished: false,
        };
        tracing::info!(generation, "catalog fetch started");
        self.notify(CatalogChange::LoadingStarted);

        let result = self.source.fetch_products().await;
        pending.finished = true;

        let (change, status) = {
            let mut state = self.write_state();
            state.in_flight.remove(&generation);
            let newest_live = state.in_flight.last().is_none_or(|newest| *newest < generation);
            if !newest_live || generation < state.applied_request {
                tracing::debug!(
                    generation,
                    applied = state.applied_request,
                    "discarding stale catalog response"
                );
                return state.status;
            }
            state.applied_request = generation;

            let change = match result {
                Ok(products) => {
                    let count = products.len();
                    state.all_products = products.into_iter().map(Arc::new).collect();
                    state.refilter();
                    state.status = CatalogStatus::Loaded;
                    state.last_error = None;
                    state.last_loaded_at = Some(Utc::now());
                    tracing::info!(generation, count, "catalog loaded");
                    CatalogChange::ProductsLoaded { count }
                }
                Err(err) => {
                    let message = err.user_message();
                    tracing::warn!(
                        generation,
                        error = %err,
                        kept = state.all_products.len(),
                        "catalog fetch failed"
                    );
                    state.status = CatalogStatus::Failed;
                    state.last_error = Some(message.clone());
                    CatalogChange::LoadFailed { message }
                }
            };
            (change, state.status)
        };

        self.notify(change);
        status
    }
}

/// Marks a fetch generation as abandoned if its future is dropped mid-flight.
struct PendingFetch<'a, S> {
    store: &'a CatalogStore<S>,
    generation: u64,
    finished: bool,
}

impl<S> Drop for PendingFetch<'_, S> {
    fn drop(&mut self) {
        if !self.finished {
            self.store.abandon_fetch(self.generation);
        }
    }
}

impl<S> CatalogStore<S> {
    fn abandon_fetch(&self, generation: u64) {
        let restored = {
            let mut state = self.write_state();
            state.in_flight.remove(&generation);
            if !state.in_flight.is_empty() || state.status != CatalogStatus::Loading {
                None
            } else {
                state.status = state.settled_status;
                state.last_error = state.settled_error.take();
                Some(state.status)
            }
        };
        tracing::debug!(generation, ?restored, "catalog fetch abandoned");
        if let Some(status) = restored {
            self.notify(CatalogChange::LoadAbandoned { status });
        }
    }

    /// Select a category ([`ALL_CATEGORIES`] clears the category filter).
    ///
    /// Setting the active category again is a no-op and notifies nobody.
    pub fn set_category(&self, category: impl Into<String>) {
        let category = category.into();
        {
            let mut state = self.write_state();
            if state.active_category == category {
                return;
            }
            state.active_category = category.clone();
            state.refilter();
            tracing::debug!(category = %category, visible = state.visible.len(), "category changed");
        }
        self.notify(CatalogChange::CategoryChanged(category));
    }

    /// Store the lower-cased search text and re-derive the view.
    pub fn set_search_text(&self, text: &str) {
        let search = text.to_lowercase();
        {
            let mut state = self.write_state();
            state.search_text = search.clone();
            state.refilter();
            tracing::debug!(search = %search, visible = state.visible.len(), "search changed");
        }
        self.notify(CatalogChange::SearchChanged(search));
    }

    /// Flip between grid and list layout. Returns the new value.
    pub fn toggle_grid_view(&self) -> bool {
        let grid_view = {
            let mut state = self.write_state();
            state.grid_view = !state.grid_view;
            state.grid_view
        };
        self.notify(CatalogChange::GridViewToggled(grid_view));
        grid_view
    }

    /// The filtered view.
    pub fn products(&self) -> Vec<Arc<Product>> {
        self.read_state().visible.clone()
    }

    pub fn all_products(&self) -> Vec<Arc<Product>> {
        self.read_state().all_products.clone()
    }

    pub fn categories(&self) -> Vec<String> {
        categories(&self.read_state().all_products)
    }

    /// Look a product up in the whole catalog, ignoring the active filters.
    pub fn product_by_id(&self, id: ProductId) -> Option<Arc<Product>> {
        self.read_state()
            .all_products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn active_category(&self) -> String {
        self.read_state().active_category.clone()
    }

    pub fn search_text(&self) -> String {
        self.read_state().search_text.clone()
    }

    pub fn status(&self) -> CatalogStatus {
        self.read_state().status
    }

    pub fn is_loading(&self) -> bool {
        self.status() == CatalogStatus::Loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.read_state().last_error.clone()
    }

    pub fn last_loaded_at(&self) -> Option<DateTime<Utc>> {
        self.read_state().last_loaded_at
    }

    pub fn is_grid_view(&self) -> bool {
        self.read_state().grid_view
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        let state = self.read_state();
        CatalogSnapshot {
            all_products: state.all_products.clone(),
            visible_products: state.visible.clone(),
            categories: categories(&state.all_products),
            active_category: state.active_category.clone(),
            search_text: state.search_text.clone(),
            status: state.status,
            is_loading: state.status == CatalogStatus::Loading,
            last_error: state.last_error.clone(),
            last_loaded_at: state.last_loaded_at,
            is_grid_view: state.grid_view,
        }
    }

    pub fn subscribe(&self) -> Subscription<CatalogChange> {
        self.bus.subscribe()
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Detach every subscriber (app teardown).
    pub fn close_subscriptions(&self) {
        self.bus.close();
    }

    fn notify(&self, change: CatalogChange) {
        if let Err(err) = self.bus.publish(change) {
            tracing::warn!(?err, "failed to notify catalog subscribers");
        }
    }

    // State is only written in short, non-panicking sections, so a poisoned
    // lock still guards a consistent value.
    fn read_state(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
