// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod id;
mod import_id;

pub use id::{FunctionId, NcaId, VersionId};
pub use import_id::{ImportId, ImportIdError};
