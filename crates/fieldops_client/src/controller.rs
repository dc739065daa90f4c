use std::collections::VecDeque;
use std::sync::Arc;

use fieldops_core::{
    update, Effect, FetchError, FilterKey, FilterSet, ListResponse, ListState, ListViewModel,
    Msg, RequestDescriptor,
};
use fieldops_logging::{ops_debug, ops_info, ops_warn};
use serde::de::DeserializeOwned;

use crate::{decode_rows, ListSource, Resource, SessionStore};

/// Drives a [`ListState`] for one screen: applies messages and executes the
/// resulting effects against a list source and a session store.
pub struct ListController<T> {
    state: ListState<T>,
    resource: Resource,
    source: Arc<dyn ListSource>,
    session: Arc<dyn SessionStore>,
    sign_in_required: bool,
}

impl<T: DeserializeOwned + Clone> ListController<T> {
    pub fn new(
        resource: Resource,
        source: Arc<dyn ListSource>,
        session: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            state: ListState::new(resource.query_builder()),
            resource,
            source,
            session,
            sign_in_required: false,
        }
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.state = self.state.with_page_size(page_size);
        self
    }

    /// Opens the screen on a preset filter selection and page without fetching.
    pub fn with_selection(mut self, filters: FilterSet, page_index: u64) -> Self {
        self.state = self.state.with_filters(filters).with_page_index(page_index);
        self
    }

    pub fn state(&self) -> &ListState<T> {
        &self.state
    }

    pub fn view(&self) -> ListViewModel<T> {
        self.state.view()
    }

    /// Set once a fetch failed for lack of a valid session.
    pub fn sign_in_required(&self) -> bool {
        self.sign_in_required
    }

    pub async fn load(&mut self) {
        self.dispatch(Msg::Load).await;
    }

    pub async fn refresh(&mut self) {
        self.dispatch(Msg::Refresh).await;
    }

    pub async fn set_filter(&mut self, key: FilterKey, value: Option<String>) {
        self.dispatch(Msg::SetFilter { key, value }).await;
    }

    pub async fn clear_filters(&mut self) {
        self.dispatch(Msg::ClearFilters).await;
    }

    pub async fn set_page_index(&mut self, page_index: u64) {
        self.dispatch(Msg::SetPageIndex(page_index)).await;
    }

    pub async fn set_page_size(&mut self, page_size: u64) {
        self.dispatch(Msg::SetPageSize(page_size)).await;
    }

    pub async fn item_created(&mut self, item: T) {
        self.dispatch(Msg::ItemCreated(item)).await;
    }

    /// Applies `msg` and every follow-up message its effects produce.
    pub async fn dispatch(&mut self, msg: Msg<T>) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::replace(
                &mut self.state,
                ListState::new(self.resource.query_builder()),
            );
            let (state, effects) = update(state, msg);
            self.state = state;

            for effect in effects {
                match effect {
                    Effect::Fetch {
                        request_id,
                        descriptor,
                    } => {
                        let result = self.run_fetch(&descriptor).await;
                        inbox.push_back(Msg::FetchCompleted { request_id, result });
                    }
                    Effect::ClearSession => {
                        ops_info!("Clearing session after unauthorized response");
                        if let Err(err) = self.session.clear_token() {
                            ops_warn!("Failed to clear session: {}", err);
                        }
                    }
                    Effect::RedirectToSignIn => {
                        self.sign_in_required = true;
                    }
                }
            }
        }
    }

    async fn run_fetch(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<ListResponse<T>, FetchError> {
        let Some(token) = self.session.token() else {
            ops_warn!("No session token; skipping {}", descriptor);
            return Err(FetchError::unauthenticated());
        };
        ops_debug!("Fetching {} {}", self.resource, descriptor);
        let raw = self.source.fetch(self.resource, descriptor, &token).await?;
        decode_rows(raw)
    }
}
