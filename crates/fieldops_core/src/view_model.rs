use crate::{FailureKind, FilterSet, Phase};

#[derive(Debug, Clone, PartialEq)]
pub struct ListViewModel<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_index: u64,
    pub page_size: u64,
    pub page_count: u64,
    pub phase: Phase,
    pub loading: bool,
    /// Single human-readable message for the current failure.
    pub error: Option<String>,
    pub error_kind: Option<FailureKind>,
    pub filters: FilterSet,
}

impl<T> ListViewModel<T> {
    /// 1-based row numbers of the visible slice, e.g. `(11, 20)`.
    pub fn visible_range(&self) -> Option<(u64, u64)> {
        if self.items.is_empty() {
            return None;
        }
        let first = self
            .page_index
            .saturating_mul(self.page_size)
            .saturating_add(1);
        let last = first.saturating_add(self.items.len() as u64 - 1);
        Some((first, last))
    }
}
