//! Shared XLSX specification models.

use polars::prelude::PolarsError;
use rust_xlsxwriter::XlsxError;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides (`1` thin, anything else none).
    pub border: Option<i64>,

    /// Number format code.
    pub num_format: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
        }
    }
}

/// Named presets consumed by the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxFormats {
    /// Plain text cells.
    pub text: SpecCellFormat,
    /// Header cells.
    pub header: SpecCellFormat,
    /// Integer number cells.
    pub integer: SpecCellFormat,
    /// Decimal number cells.
    pub decimal: SpecCellFormat,
    /// Cells forced to Excel text (`@`).
    pub text_forced: SpecCellFormat,
}

/// Normalized cell value during conversion/write pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
}

/// Value of a free-standing cell written outside a table body.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumSheetCellValue {
    /// Literal text.
    String(String),
    /// Literal number.
    Number(f64),
    /// Formula text including the leading `=`.
    Formula(String),
}

/// One free-standing cell addressed in A1 notation (e.g. `U2`).
#[derive(Debug, Clone, PartialEq)]
pub struct SpecSheetCell {
    /// A1 cell reference.
    pub cell_ref: String,
    /// Cell content.
    pub value: EnumSheetCellValue,
}

impl SpecSheetCell {
    /// Text cell.
    pub fn text(cell_ref: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            cell_ref: cell_ref.into(),
            value: EnumSheetCellValue::String(text.into()),
        }
    }

    /// Number cell.
    pub fn number(cell_ref: impl Into<String>, value: f64) -> Self {
        Self {
            cell_ref: cell_ref.into(),
            value: EnumSheetCellValue::Number(value),
        }
    }

    /// Formula cell.
    pub fn formula(cell_ref: impl Into<String>, formula: impl Into<String>) -> Self {
        Self {
            cell_ref: cell_ref.into(),
            value: EnumSheetCellValue::Formula(formula.into()),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Autofit rule for column width inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumAutofitColumnsRule {
    /// Disable autofit.
    None,
    /// Infer width from header cells (default).
    #[default]
    Header,
}

/// Autofit policy for per-sheet write call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAutofitCellsPolicy {
    /// Autofit width inference rule.
    pub rule_columns: EnumAutofitColumnsRule,
    /// Minimum final width.
    pub width_cell_min: usize,
    /// Maximum final width.
    pub width_cell_max: usize,
    /// Width padding added after inference.
    pub width_cell_padding: usize,
}

impl Default for SpecAutofitCellsPolicy {
    fn default() -> Self {
        Self {
            rule_columns: EnumAutofitColumnsRule::Header,
            width_cell_min: 8,
            width_cell_max: 60,
            width_cell_padding: 2,
        }
    }
}

/// Writer-wide formatting defaults.
///
/// Missing, NaN and infinite values are always written as blank cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxWriteOptions {
    /// Infer numeric columns from dtypes.
    pub infer_numeric_cols: bool,
    /// Infer integer subset from numeric columns.
    pub infer_integer_cols: bool,
    /// Base patch merged into all per-column formats.
    pub base_format_patch: SpecCellFormat,
}

impl Default for SpecXlsxWriteOptions {
    fn default() -> Self {
        Self {
            infer_numeric_cols: true,
            infer_integer_cols: true,
            base_format_patch: SpecCellFormat {
                border: Some(0),
                ..Default::default()
            },
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// One sheet emitted by a write call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetSummary {
    /// Actual unique sheet name in workbook.
    pub sheet_name: String,
    /// Body rows written (header excluded).
    pub n_rows: usize,
    /// Columns written.
    pub n_cols: usize,
}

/// Per-write call report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Sheets produced by the write call.
    pub sheets: Vec<SpecSheetSummary>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Workbook construction failures.
#[derive(Debug, Error)]
pub enum XlsxWriteError {
    /// Writer already produced its buffer.
    #[error("Cannot write after close().")]
    Closed,
    /// Table contains repeated column names.
    #[error("Duplicate column names detected: {0}")]
    DuplicateColumns(String),
    /// A column reference did not resolve.
    #[error("Column not found: {0:?}")]
    ColumnNotFound(String),
    /// A table does not fit in one worksheet.
    #[error("Sheet {sheet:?} exceeds Excel limits: rows={n_rows} cols={n_cols}")]
    SheetTooLarge {
        /// Requested sheet name.
        sheet: String,
        /// Body row count including header.
        n_rows: usize,
        /// Column count.
        n_cols: usize,
    },
    /// Free-standing cells target a sheet that was never written.
    #[error("Sheet not found: {0:?}")]
    SheetNotFound(String),
    /// Malformed A1 reference.
    #[error("Invalid cell reference: {0:?}")]
    InvalidCellRef(String),
    /// Row/column index does not fit Excel's integer width.
    #[error("{0}")]
    IndexOverflow(String),
    /// Autofit policy is inconsistent.
    #[error("{0}")]
    InvalidAutofitPolicy(String),
    /// Reading the source table failed.
    #[error("Failed to access cell value: {0}")]
    Polars(#[from] PolarsError),
    /// Underlying workbook library failed.
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] XlsxError),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
