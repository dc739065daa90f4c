//! Fieldops client: REST plumbing, sessions, mutations and exports around the core state machine.
mod controller;
mod export;
mod fetch;
mod models;
mod mutate;
mod persist;
mod resource;
mod session;

pub use controller::ListController;
pub use export::{
    export_work_report, save_export, CsvExport, ExportError, ExportOptions, CSV_HEADERS,
    EXPORT_FILENAME,
};
pub use fetch::{decode_rows, ClientSettings, ListSource, ReqwestFetcher};
pub use models::{
    Assignor, AssignorPayload, AssignorRef, Entity, PmUpdate, User, UserPayload, WorkAssignment,
};
pub use mutate::RowMutator;
pub use persist::{ensure_output_dir, write_atomic, PersistError};
pub use resource::{Envelope, EnvelopeTable, Resource};
pub use session::{FileSessionStore, MemorySessionStore, SessionError, SessionStore, TOKEN_KEY};

pub use fieldops_core::{FailureKind, FetchError, ListResponse};
