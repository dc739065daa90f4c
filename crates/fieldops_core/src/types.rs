pub type RequestId = u64;

/// One page of rows plus the server's count of all matching rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>, total_count: u64) -> Self {
        Self { items, total_count }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListResponse<U> {
        ListResponse {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored,
}
