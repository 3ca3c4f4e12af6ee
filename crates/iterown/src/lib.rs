//! Ownership-mode resolution for iterating arrays and vectors
//!
//! Given the facts of one iteration site (container kind, element
//! capability, iteration form, binding mutability) the resolver decides
//! whether elements are copied, moved or borrowed, whether they can be
//! mutated in place, and whether the container is still usable afterwards.
//!
//! # Example
//! ```
//! use iterown::{make_query, resolve, ContainerKind, ElementCapability, IterationForm, OwnershipMode};
//!
//! let query = make_query(
//!     ContainerKind::Growable,
//!     ElementCapability::Duplicable,
//!     IterationForm::OwningIterator,
//!     true,
//! )?;
//! let outcome = resolve(&query);
//! assert_eq!(outcome.ownership_mode, OwnershipMode::Move);
//! assert!(!outcome.container_usable_after);
//! # Ok::<(), iterown::InvalidQuery>(())
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod explain;
pub mod fact;
pub mod outcome;
pub mod resolve;

pub use batch::{Batch, BatchEntry, BatchReport, EntryStatus, QueryRecord};
pub use config::ResolverConfig;
pub use error::{ConfigError, InvalidQuery, IterError, IterResult, ParseError};
pub use explain::{explain, Explanation};
pub use fact::{make_query, Access, ContainerKind, ElementCapability, IterationForm, Query};
pub use outcome::{Outcome, OwnershipMode};
pub use resolve::{decision_table, resolve, Resolver, RuleSet, TableRow};
