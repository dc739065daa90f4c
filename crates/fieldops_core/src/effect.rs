use crate::{RequestDescriptor, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue the described request and report back with `Msg::FetchCompleted`.
    Fetch {
        request_id: RequestId,
        descriptor: RequestDescriptor,
    },
    /// Drop the stored session token.
    ClearSession,
    RedirectToSignIn,
}
