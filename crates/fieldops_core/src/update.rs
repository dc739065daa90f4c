use crate::state::FetchOutcome;
use crate::{
    normalize_date, Effect, FailureKind, FetchError, FilterKey, ListState, Msg,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update<T>(mut state: ListState<T>, msg: Msg<T>) -> (ListState<T>, Vec<Effect>) {
    let effects = match msg {
        Msg::Load | Msg::Refresh => vec![state.begin_fetch()],
        Msg::SetFilter { key, value } => {
            let value = match normalize_filter_value(key, value) {
                Ok(value) => value,
                Err(err) => {
                    state.reject_filter(err);
                    return (state, Vec::new());
                }
            };
            state.set_filter(key, value);
            vec![state.begin_fetch()]
        }
        Msg::ClearFilters => {
            state.clear_filters();
            vec![state.begin_fetch()]
        }
        Msg::SetPageIndex(page_index) => {
            state.set_page_index(page_index);
            vec![state.begin_fetch()]
        }
        Msg::SetPageSize(0) => Vec::new(),
        Msg::SetPageSize(page_size) => {
            state.set_page_size(page_size);
            vec![state.begin_fetch()]
        }
        Msg::FetchCompleted { request_id, result } => {
            match state.apply_fetch_result(request_id, result) {
                FetchOutcome::Stale | FetchOutcome::Loaded => Vec::new(),
                FetchOutcome::Failed(FailureKind::Unauthorized) => {
                    vec![Effect::ClearSession, Effect::RedirectToSignIn]
                }
                FetchOutcome::Failed(FailureKind::Unauthenticated) => {
                    vec![Effect::RedirectToSignIn]
                }
                FetchOutcome::Failed(_) => Vec::new(),
            }
        }
        Msg::ItemCreated(item) => {
            // Shown right away; the refetch below overwrites it with server state.
            state.append_item(item);
            vec![state.begin_fetch()]
        }
    };

    (state, effects)
}

fn normalize_filter_value(
    key: FilterKey,
    value: Option<String>,
) -> Result<Option<String>, FetchError> {
    let Some(raw) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    if !key.is_date() {
        return Ok(Some(raw));
    }
    normalize_date(&raw)
        .map(Some)
        .map_err(|err| FetchError::new(FailureKind::InvalidFilter, err.to_string()))
}
