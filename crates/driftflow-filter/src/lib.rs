//! driftflow ignore rules
//!
//! Loads `.driftignore` files and answers whether a resource, or a single
//! changed field of a resource, is excluded from drift reporting.
//!
//! # Example
//!
//! ```ignore
//! use driftflow_core::{Analyzer, Filter};
//! use driftflow_filter::DriftIgnore;
//!
//! let ignore = DriftIgnore::parse("aws_iam_user.*\naws_instance.*.tags.LastScanned\n");
//! let analysis = Analyzer::new(&ignore).analyze(&declared, &live);
//! ```

pub mod discovery;
pub mod driftignore;
pub mod error;
pub mod line;
pub mod list;
pub mod wildcard;

// Re-exports
pub use discovery::{DRIFTIGNORE_ENV, DRIFTIGNORE_FILENAME, find_ignore_file};
pub use driftignore::{DriftIgnore, IgnoreRule};
pub use error::{FilterError, Result};
pub use line::{escape, read_line, unescape};
pub use list::{AnalysisListOptions, IgnoreList, analysis_to_list, resource_line};
pub use wildcard::wildcard_match;
