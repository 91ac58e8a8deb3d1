//! # gantry-id
//!
//! Typed identifiers for the scheduling objects gantry reasons about.
//!
//! Every identifier is a ULID wrapped in a newtype with a short prefix, so a
//! task id can never be handed to an API expecting a host id, and log lines
//! carry self-describing values:
//!
//! - `task_01HV4Z2WQXKJNM8GPQY6VBKC3D`
//! - `host_01HV4Z3MXNKPQR9HSTZ7WCLD4E`
//! - `sel_01HV4Z2WQXKJNM8GPQY6VBKC3D`

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;

/// Re-export ulid for consumers that need raw ULID operations
pub use ulid::Ulid;
