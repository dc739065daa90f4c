//! Fieldops core: pure list-query state machine, query builder and view-model helpers.
mod confirm;
mod effect;
mod error;
mod filter;
mod msg;
mod query;
mod state;
mod types;
mod update;
mod view_model;

pub use confirm::DeleteConfirmation;
pub use effect::Effect;
pub use error::{FailureKind, FetchError};
pub use filter::{normalize_date, FilterKey, FilterSet, InvalidDate};
pub use msg::Msg;
pub use query::{build, PageRequest, QueryBuilder, RequestDescriptor, SiteIdParam};
pub use state::{ListState, DEFAULT_PAGE_SIZE};
pub use types::{ListResponse, Phase, RequestId};
pub use update::update;
pub use view_model::ListViewModel;
