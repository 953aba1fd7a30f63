//! # Omega State
//!
//! Per-session deck state with whole-value replacement and deep-copy
//! snapshots, plus the export payload built from it.

pub mod diagnostics;
pub mod error;
pub mod export;
pub mod session;

pub use diagnostics::cap_diagnostic;
pub use error::{Result, StateError};
pub use export::{build_export_payload, ExportMeta, ExportOptions, ExportPayload};
pub use session::{
    GenerationTicket, SessionDeckState, SessionLimits, SessionRegistry, SessionStore,
    DEFAULT_MAX_SESSIONS, DEFAULT_SESSION, DEFAULT_SESSION_TTL,
};
