use crate::view_model::ListViewModel;
use crate::{
    Effect, FailureKind, FetchError, FilterKey, FilterSet, ListResponse, PageRequest, Phase,
    QueryBuilder, RequestDescriptor, RequestId,
};

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Paging, filters and the currently visible rows of one list screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    query: QueryBuilder,
    filters: FilterSet,
    page_index: u64,
    page_size: u64,
    items: Vec<T>,
    total_count: u64,
    phase: Phase,
    error: Option<FetchError>,
    last_request_id: RequestId,
    latest_request: Option<RequestId>,
}

pub(crate) enum FetchOutcome {
    Stale,
    Loaded,
    Failed(FailureKind),
}

impl<T> ListState<T> {
    pub fn new(query: QueryBuilder) -> Self {
        Self {
            query,
            filters: FilterSet::default(),
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            items: Vec::new(),
            total_count: 0,
            phase: Phase::Idle,
            error: None,
            last_request_id: 0,
            latest_request: None,
        }
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Initial filters for a screen opened with a preset selection. Values
    /// are taken as given; date filters must already be `YYYY-MM-DD`.
    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_page_index(mut self, page_index: u64) -> Self {
        self.page_index = page_index;
        self
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn page_index(&self) -> u64 {
        self.page_index
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// Number of pages implied by `total_count`; at least one.
    pub fn page_count(&self) -> u64 {
        self.total_count.div_ceil(self.page_size).max(1)
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_page(self.page_index, self.page_size)
    }

    pub fn current_request(&self) -> RequestDescriptor {
        self.query.build(&self.filters, self.page_request())
    }

    /// Request id whose completion will be applied, if a fetch is outstanding.
    pub fn pending_request(&self) -> Option<RequestId> {
        if self.is_loading() {
            self.latest_request
        } else {
            None
        }
    }

    pub(crate) fn begin_fetch(&mut self) -> Effect {
        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.latest_request = Some(request_id);
        self.phase = Phase::Loading;
        Effect::Fetch {
            request_id,
            descriptor: self.current_request(),
        }
    }

    /// Any filter change returns to the first page, even when the value is unchanged.
    pub(crate) fn set_filter(&mut self, key: FilterKey, value: Option<String>) {
        self.filters.set(key, value);
        self.page_index = 0;
    }

    pub(crate) fn clear_filters(&mut self) {
        self.filters.clear();
        self.page_index = 0;
    }

    pub(crate) fn set_page_index(&mut self, page_index: u64) {
        self.page_index = page_index;
    }

    pub(crate) fn set_page_size(&mut self, page_size: u64) {
        self.page_size = page_size.max(1);
        self.page_index = 0;
    }

    pub(crate) fn reject_filter(&mut self, error: FetchError) {
        self.error = Some(error);
    }

    pub(crate) fn append_item(&mut self, item: T) {
        self.items.push(item);
        self.total_count += 1;
    }

    /// Applies a completion only if it belongs to the latest outstanding request.
    /// Failures leave the previously loaded rows in place.
    pub(crate) fn apply_fetch_result(
        &mut self,
        request_id: RequestId,
        result: Result<ListResponse<T>, FetchError>,
    ) -> FetchOutcome {
        if self.pending_request() != Some(request_id) {
            return FetchOutcome::Stale;
        }
        match result {
            Ok(response) => {
                self.items = response.items;
                self.total_count = response.total_count;
                self.phase = Phase::Loaded;
                self.error = None;
                FetchOutcome::Loaded
            }
            Err(error) => {
                let kind = error.kind;
                self.phase = Phase::Errored;
                self.error = Some(error);
                FetchOutcome::Failed(kind)
            }
        }
    }
}

impl<T: Clone> ListState<T> {
    pub fn view(&self) -> ListViewModel<T> {
        ListViewModel {
            items: self.items.clone(),
            total_count: self.total_count,
            page_index: self.page_index,
            page_size: self.page_size,
            page_count: self.page_count(),
            phase: self.phase,
            loading: self.is_loading(),
            error: self.error.as_ref().map(ToString::to_string),
            error_kind: self.error.as_ref().map(|err| err.kind),
            filters: self.filters.clone(),
        }
    }
}
