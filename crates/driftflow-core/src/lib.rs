//! driftflow core
//!
//! Resource identity, declared state loading and drift reconciliation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐        ┌──────────────────┐
//! │  StateProvider   │        │ driftflow-remote │
//! │ (declared state) │        │  (live state)    │
//! └────────┬─────────┘        └────────┬─────────┘
//!          │   Vec<Resource>           │
//!          └────────────┬──────────────┘
//!                       │
//!             ┌─────────▼─────────┐
//!             │     Analyzer      │◄──── dyn Filter
//!             │  (diff + classify)│     (driftflow-filter)
//!             └─────────┬─────────┘
//!                       │
//!                   Analysis
//! ```

pub mod analyser;
pub mod diff;
pub mod error;
pub mod filter;
pub mod resource;
pub mod schema;
pub mod state;

// Re-exports
pub use analyser::{Alert, Analysis, Analyzer, Difference, Summary};
pub use diff::{ChangeType, FieldChange};
pub use error::{CoreError, Result};
pub use filter::{Filter, NoopFilter};
pub use resource::{Resource, ResourceSet};
pub use schema::{FieldMeta, ResourceSchema, SchemaRepository};
pub use state::{FileEnumerator, StateProvider, TerraformStateReader};
