//! High-level orchestration layer over lower-level crates.
//! Intentionally thin: exposes stable functions used by the CLI.

pub use loctable_core::Result;

mod diff;
mod generate;
mod pipeline;
mod reduce;
mod scan;
mod sync;

pub use diff::diff_keys;
pub use generate::{prepare_files, write_files, INDEX_FILE};
pub use pipeline::{run_build, run_export, run_import, BuildOptions};
pub use reduce::{reduce, ReducedTable};
pub use scan::scan_keys;
pub use sync::{
    map_source_to_target, plan_updates, resolve_document_column, resolve_locale_column,
    rows_needing_translation, source_entries, target_entries, PendingCell, SourceEntry,
    TargetEntry,
};
