//! ipovc Domain Layer
//!
//! Value types and trait interfaces for extracting venture-capital
//! shareholder information from IPO prospectuses. Like the rest of the
//! domain layer it has ZERO external dependencies; regexes, HTTP and file
//! formats live in the crates that depend on it.
//!
//! ## Key Concepts
//!
//! - **ExtractionRecord**: ten string fields, one CSV row per prospectus
//! - **Candidate**: a (name, percent) hit for the largest VC shareholder
//! - **Role**: board / supervisor / executive appointments
//! - **FieldOrigin**: whether a merged value came from rules or the model
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure value logic only
//! - Trait definitions for the model, the text source and the output sink

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod candidate;
pub mod origin;
pub mod percent;
pub mod record;
pub mod role;
pub mod traits;

// Re-exports for convenience
pub use candidate::{rank_candidates, Candidate};
pub use origin::{FieldOrigin, FieldOrigins};
pub use percent::normalize_percent;
pub use record::{ExtractionRecord, Field, NO_VC_PERCENT};
pub use role::{AppointeeType, Role};
