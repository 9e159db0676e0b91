//! `platekit_scheme` v1:
//! Sampling-scheme generation for bioreactor runs.
//!
//! - `conf`     : constants (sentinels, view shapes, sheet names)
//! - `spec`     : plate/sample models, options, errors
//! - `util`     : well addressing and plate naming
//! - `builder`  : plate filling
//! - `exporter` : list/flat/block/matrix views
//! - `workbook` : sampling-scheme workbook
pub mod builder;
pub mod conf;
pub mod exporter;
pub mod spec;
pub mod util;
pub mod workbook;

pub use builder::{create_sampling_scheme, derive_plate_rows};
pub use conf::{C_EMPTY_WELL, C_SHEET_LIST_FORMAT, N_END_BATCH_SAMPLE_INDEX};
pub use exporter::{
    SpecListView, SpecPlateMatrix, SpecSchemeViews, derive_block_view, derive_flat_from_matrices,
    derive_flat_view, derive_list_view, derive_matrix_views, export_scheme_views,
};
pub use spec::{
    EnumPlateFormat, EnumSampleIndex, EnumWellContent, SampleLabel, SchemeError, SpecPlate,
    SpecScheme, SpecSchemeOptions,
};
pub use util::{derive_plate_name, derive_well_positions, derive_well_row_number};
pub use workbook::build_scheme_workbook;
