//! `platekit_io_xlsx` v1:
//! In-memory XLSX workbook kernel shared by the platekit crates.
//!
//! - `conf`   : constants and default presets
//! - `spec`   : specs/models/options/errors
//! - `util`   : pure helper functions
//! - `writer` : DataFrame-to-workbook writer
pub mod conf;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_NUM_FORMAT_TEXT, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    TUP_EXCEL_ILLEGAL, derive_default_xlsx_formats, derive_default_xlsx_write_options,
};
pub use spec::{
    EnumAutofitColumnsRule, EnumCellValue, EnumSheetCellValue, SpecAutofitCellsPolicy,
    SpecCellFormat, SpecSheetCell, SpecSheetSummary, SpecXlsxFormats, SpecXlsxReport,
    SpecXlsxWriteOptions, XlsxWriteError,
};
pub use util::{derive_column_letters, parse_cell_ref, sanitize_sheet_name};
pub use writer::{SpecXlsxSheetWriteOptions, XlsxWriter, derive_cell_value_from_any_value};
