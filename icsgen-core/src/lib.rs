//! Core types for icsgen.
//!
//! - `EventRecord` and the recurrence/reminder enums it carries
//! - `ics` renders a record into a single-event .ics document
//! - `store` writes documents to the configured output directory

pub mod config;
pub mod error;
pub mod event;
pub mod ics;
pub mod store;

pub use config::IcsGenConfig;
pub use error::{IcsGenError, IcsGenResult};
pub use event::*;
