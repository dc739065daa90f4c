use crate::{FetchError, FilterKey, ListResponse, RequestId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg<T> {
    /// Screen opened.
    Load,
    /// Re-run the current query, e.g. after a successful mutation.
    Refresh,
    /// User changed one filter. `None` or a blank string clears it.
    SetFilter {
        key: FilterKey,
        value: Option<String>,
    },
    /// User clicked Clear.
    ClearFilters,
    SetPageIndex(u64),
    SetPageSize(u64),
    /// A fetch issued by `Effect::Fetch` resolved.
    FetchCompleted {
        request_id: RequestId,
        result: Result<ListResponse<T>, FetchError>,
    },
    /// A row was created; shown immediately until the follow-up fetch lands.
    ItemCreated(T),
}
