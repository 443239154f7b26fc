//! The root database and the two handles callers work with.
//!
//! [`AnalysisHost`] owns the database and is the only way to change inputs. Each
//! change advances the shared [`Generation`](relay_source::Generation) before it
//! touches salsa, so snapshots taken earlier can tell they are stale.
//! [`Analysis`] is such a snapshot; every assist runs against one.

mod database;
mod error;
mod host;

pub use database::RootDatabase;
pub use error::{DbError, DbResult};
pub use host::{Analysis, AnalysisHost};
