//! `platekit_mapping` v1:
//! Sample-to-well mapping and benchling workbook preparation.
//!
//! - `conf`       : column/sheet names and fixed values
//! - `spec`       : rows, reports, template, errors
//! - `util`       : text helpers
//! - `assignment` : list-format sheet re-expansion
//! - `timepoints` : timepoint log parsing
//! - `lookup`     : registry CSV lookup
//! - `merge`      : left join and ordering
//! - `workbook`   : `benchling` + `overview` workbook
//! - `pipeline`   : end-to-end run
pub mod assignment;
pub mod conf;
pub mod lookup;
pub mod merge;
pub mod pipeline;
pub mod spec;
pub mod timepoints;
pub mod util;
pub mod workbook;

pub use assignment::{
    SpecListTable, derive_plate_id, expand_plate_assignments, parse_sample_token,
};
pub use conf::{C_LOG_RECORD_PATTERN, C_SHEET_BENCHLING, C_SHEET_OVERVIEW, C_VOLUME_EXCLUDED};
pub use merge::{derive_benchling_rows, merge_assignments_with_timepoints};
pub use pipeline::{SpecMappingInputs, SpecMappingOutput, run_mapping_pipeline};
pub use spec::{
    MappingError, ReportPlateAssignment, ReportTimepoints, SpecBenchlingRow,
    SpecBenchlingTemplate, SpecLookupTable, SpecMergedRow, SpecPlateAssignmentRow, SpecRowError,
    SpecTimepointRecord,
};
pub use timepoints::{
    TimepointLogParser, decode_text_lossy, parse_time_value, parse_timepoint_line, parse_timepoints,
};
pub use workbook::{
    build_mapping_workbook, derive_benchling_cells, derive_benchling_dataframe,
    derive_benchling_formulas, derive_overview_dataframe,
};
