//! Integrity validation for the star schema.
//!
//! Two checkpoints share the report types in [`report`]: the pre-load
//! validator here runs over the in-memory schema before anything is sent to
//! the store; the post-load validator (in the store crate) re-checks the
//! loaded rows through SQL. Both aggregate every finding and leave the
//! gating decision to the caller.

pub mod preload;
pub mod report;

pub use preload::validate;
pub use report::{CheckKind, CheckStatus, Finding, ValidationReport};
