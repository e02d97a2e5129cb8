//! Fetch, filter, sort and paginate one collection resource.
//!
//! The controller is a cloneable handle. Clones share the same list, so a
//! refresh action and the view can hold it at once. Overlapping `load`
//! calls are resolved by generation: only the most recently started load
//! may apply its result.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::domain::auth::CredentialProvider;
use crate::domain::resource::ResourceItem;
use crate::domain::types::UserRole;
use crate::dto::list::{ErrorView, ListPageData, ShowingRange};
use crate::filter::FilterState;
use crate::pagination::{PageState, Paginated};
use crate::repository::errors::{ApiError, ApiResult, ErrorKind};
use crate::repository::{HttpRepository, ResourceEndpoint, Transport};
use crate::services::ListError;
use crate::sort::SortOrder;

/// Static settings of one list.
#[derive(Clone, Debug)]
pub struct ListConfig {
    pub endpoint: ResourceEndpoint,
    pub items_per_page: usize,
    /// Role checked locally before contacting the backend.
    pub required_role: Option<UserRole>,
}

impl ListConfig {
    pub fn new(endpoint: ResourceEndpoint, items_per_page: usize) -> Self {
        Self {
            endpoint,
            items_per_page,
            required_role: None,
        }
    }

    pub fn require_role(mut self, role: UserRole) -> Self {
        self.required_role = Some(role);
        self
    }
}

/// How a call to [`ResourceListController::load`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The collection was replaced; carries the number of loaded records.
    Loaded(usize),
    Failed(ErrorKind),
    /// A later load started before this one finished; its result was dropped.
    Superseded,
}

struct ListState<I> {
    items: Vec<I>,
    /// Indices into `items` that pass the filters, in sort order.
    visible: Vec<usize>,
    filters: FilterState,
    sort: SortOrder,
    page: PageState,
    loading: bool,
    error: Option<ApiError>,
    generation: u64,
}

impl<I: ResourceItem> ListState<I> {
    fn refresh(&mut self) {
        let mut visible: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| self.filters.matches(*item))
            .map(|(index, _)| index)
            .collect();
        let items = &self.items;
        let sort = self.sort;
        visible.sort_by(|a, b| sort.compare(&items[*a], &items[*b]));
        self.visible = visible;
        self.page.clamp(self.visible.len());
    }

    fn replace_items(&mut self, items: Vec<I>) {
        self.items = items;
        self.refresh();
    }

    fn upsert(&mut self, item: I) {
        match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
        self.refresh();
    }

    fn remove(&mut self, id: i64) {
        self.items.retain(|item| item.id() != id);
        self.refresh();
    }

    fn fail(&mut self, err: ApiError) -> LoadOutcome {
        let kind = err.kind();
        self.loading = false;
        self.error = Some(err);
        self.replace_items(Vec::new());
        LoadOutcome::Failed(kind)
    }
}

pub struct ResourceListController<I, T, C> {
    repo: Arc<HttpRepository<T>>,
    credentials: Arc<C>,
    config: Arc<ListConfig>,
    state: Arc<Mutex<ListState<I>>>,
    _item: PhantomData<fn() -> I>,
}

impl<I, T, C> Clone for ResourceListController<I, T, C> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            credentials: Arc::clone(&self.credentials),
            config: Arc::clone(&self.config),
            state: Arc::clone(&self.state),
            _item: PhantomData,
        }
    }
}

impl<I, T, C> ResourceListController<I, T, C>
where
    I: ResourceItem,
    T: Transport,
    C: CredentialProvider,
{
    pub fn new(
        config: ListConfig,
        repo: Arc<HttpRepository<T>>,
        credentials: Arc<C>,
    ) -> Result<Self, ListError> {
        let page = PageState::new(config.items_per_page)?;
        let state = ListState {
            items: Vec::new(),
            visible: Vec::new(),
            filters: FilterState::default(),
            sort: SortOrder::default(),
            page,
            loading: false,
            error: None,
            generation: 0,
        };
        Ok(Self {
            repo,
            credentials,
            config: Arc::new(config),
            state: Arc::new(Mutex::new(state)),
            _item: PhantomData,
        })
    }

    fn lock(&self) -> MutexGuard<'_, ListState<I>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn repository(&self) -> &HttpRepository<T> {
        &self.repo
    }

    /// Bearer token of the caller, after the local role check.
    fn authorize(&self) -> ApiResult<String> {
        let credentials = self.credentials.credentials();
        let token = credentials.token().ok_or(ApiError::AuthRequired)?.to_string();
        if let (Some(required), Some(role)) = (self.config.required_role, credentials.role) {
            if required != role {
                return Err(ApiError::AuthInsufficient);
            }
        }
        Ok(token)
    }

    /// Replaces the collection with a fresh copy from the backend.
    pub async fn load(&self) -> LoadOutcome {
        let resource = &self.config.endpoint.resource;

        let token = match self.authorize() {
            Ok(token) => token,
            Err(err) => {
                log::warn!("Not loading {resource}: {err}");
                let mut state = self.lock();
                state.generation += 1;
                return state.fail(err);
            }
        };

        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.loading = true;
            state.generation
        };

        let result = self
            .repo
            .fetch_collection::<I>(&self.config.endpoint, &token)
            .await;

        let mut state = self.lock();
        if state.generation != generation {
            log::debug!("Discarding stale {resource} response (generation {generation})");
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(response) => {
                let count = response.data.len();
                state.loading = false;
                state.error = None;
                state.replace_items(response.data);
                log::info!("Loaded {count} {resource}");
                LoadOutcome::Loaded(count)
            }
            Err(err) => {
                log::error!(
                    "Failed to load {resource}: {err} ({})",
                    err.detail().unwrap_or("-")
                );
                state.fail(err)
            }
        }
    }

    /// Constrains `facet` to `value`; `"all"` or blank lifts the constraint.
    pub fn set_filter(&self, facet: &str, value: &str) -> Result<(), ListError> {
        let facet = I::facet(facet).ok_or_else(|| ListError::UnknownFacet {
            resource: I::RESOURCE,
            facet: facet.to_string(),
        })?;
        let mut state = self.lock();
        state.filters.set(facet, value);
        state.page.reset();
        state.refresh();
        Ok(())
    }

    pub fn filter(&self, facet: &str) -> Option<String> {
        self.lock().filters.get(facet).map(str::to_string)
    }

    pub fn clear_filters(&self) {
        let mut state = self.lock();
        state.filters.clear();
        state.page.reset();
        state.refresh();
    }

    pub fn set_sort(&self, order: SortOrder) {
        let mut state = self.lock();
        state.sort = order;
        state.page.reset();
        state.refresh();
    }

    /// Moves to page `page`; out-of-range pages leave the view unchanged.
    pub fn set_page(&self, page: usize) -> bool {
        let mut state = self.lock();
        let total = state.visible.len();
        state.page.set_page(page, total)
    }

    pub fn current_page(&self) -> usize {
        self.lock().page.current_page()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn error(&self) -> Option<ApiError> {
        self.lock().error.clone()
    }

    /// The whole loaded collection, unfiltered.
    pub fn snapshot(&self) -> Vec<I> {
        self.lock().items.clone()
    }

    pub fn visible_items(&self) -> ListPageData<I> {
        let state = self.lock();
        let total_filtered = state.visible.len();
        let window = state.page.window(total_filtered);
        let items: Vec<I> = state.visible[window.clone()]
            .iter()
            .map(|index| state.items[*index].clone())
            .collect();

        let showing = (!items.is_empty()).then(|| ShowingRange {
            from: window.start + 1,
            to: window.end,
            total: total_filtered,
        });

        ListPageData {
            page: Paginated::new(
                items,
                state.page.current_page(),
                state.page.total_pages(total_filtered),
            ),
            total_filtered,
            total_loaded: state.items.len(),
            showing,
            loading: state.loading,
            error: state.error.as_ref().map(ErrorView::from),
        }
    }

    fn record_error(&self, err: &ApiError) {
        log::error!("{} request failed: {err}", self.config.endpoint.resource);
        self.lock().error = Some(err.clone());
    }

    /// `POST`s a new record and adds the stored version to the list.
    pub async fn create<P>(&self, payload: &P) -> ApiResult<I>
    where
        P: Serialize + Sync + ?Sized,
    {
        let result = match self.authorize() {
            Ok(token) => {
                self.repo
                    .create::<I, P>(&self.config.endpoint.resource, &token, payload)
                    .await
            }
            Err(err) => Err(err),
        };
        match result {
            Ok(response) => {
                let item = response.data;
                let mut state = self.lock();
                state.error = None;
                state.upsert(item.clone());
                Ok(item)
            }
            Err(err) => {
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// `PATCH`es record `id` and replaces it in the list.
    pub async fn update<P>(&self, id: i64, patch: &P) -> ApiResult<I>
    where
        P: Serialize + Sync + ?Sized,
    {
        let result = match self.authorize() {
            Ok(token) => {
                self.repo
                    .update::<I, P>(&self.config.endpoint.resource, id, &token, patch)
                    .await
            }
            Err(err) => Err(err),
        };
        match result {
            Ok(response) => {
                let item = response.data;
                let mut state = self.lock();
                state.error = None;
                state.upsert(item.clone());
                Ok(item)
            }
            Err(err) => {
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// `DELETE`s record `id` and drops it from the list.
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let result = match self.authorize() {
            Ok(token) => {
                self.repo
                    .delete(&self.config.endpoint.resource, id, &token)
                    .await
            }
            Err(err) => Err(err),
        };
        match result {
            Ok(_) => {
                let mut state = self.lock();
                state.error = None;
                state.remove(id);
                Ok(())
            }
            Err(err) => {
                self.record_error(&err);
                Err(err)
            }
        }
    }
}
