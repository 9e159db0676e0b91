//! Sample-mapping models, reports, template and errors.

use std::collections::BTreeMap;
use std::fmt;

use platekit_io_xlsx::XlsxWriteError;
use polars::prelude::PolarsError;
use serde::Deserialize;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region PlateAssignment

/// One sample placed in a well, as read back from a list-format sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecPlateAssignmentRow {
    /// Raw sample token (`R5S3`, `Empty`, ...).
    pub sample: String,
    /// Plate identifier (last token of the column header).
    pub plate: String,
    /// Well coordinate (`A1`..).
    pub destination_well: String,
    /// Zero-padded reactor id (`R05`) or `Empty`.
    pub reactor: String,
    /// Zero-padded sample index (`S03`) or `Empty`.
    pub timepoint_index: String,
}

/// A sample token that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRowError {
    /// Plate column the token came from.
    pub plate: String,
    /// 0-based position among the non-null cells of that column.
    pub index: usize,
    /// Offending token.
    pub sample: String,
    /// Reason.
    pub message: String,
}

impl fmt::Display for SpecRowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "plate={} index={} sample={:?}: {}",
            self.plate, self.index, self.sample, self.message
        )
    }
}

/// Result of expanding a list-format table.
#[derive(Debug, Default, Clone)]
pub struct ReportPlateAssignment {
    /// Decoded rows, column by column.
    pub rows: Vec<SpecPlateAssignmentRow>,
    /// Non-null cells seen.
    pub cnt_cells: u64,
    /// Tokens that failed to decode; their rows are skipped.
    pub errors: Vec<SpecRowError>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl ReportPlateAssignment {
    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_cells".to_string(), self.cnt_cells);
        dict_counts.insert("cnt_rows".to_string(), self.rows.len() as u64);
        dict_counts.insert("cnt_errors".to_string(), self.errors.len() as u64);
        dict_counts.insert("cnt_warnings".to_string(), self.warnings.len() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} cells={} rows={} errors={} warnings={}",
            dict_counts["cnt_cells"],
            dict_counts["cnt_rows"],
            dict_counts["cnt_errors"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportPlateAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[ASSIGN]"))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Timepoints

/// One sampling event extracted from the bioreactor log.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecTimepointRecord {
    /// Zero-padded reactor id (`R03`).
    pub reactor: String,
    /// Timepoint token as logged (`48h`).
    pub timepoint_raw: String,
    /// Numeric hours; `None` when the token does not parse.
    pub time_value: Option<f64>,
    /// Volume token as logged (`5.00`).
    pub volume: String,
    /// Plate number token.
    pub plate: String,
    /// Well coordinate (`A1`).
    pub destination_well: String,
    /// 1-based row of the well (`A` -> 1 ... `H` -> 8).
    pub well_row_number: Option<u8>,
    /// Parent culture from the registry.
    pub entity: Option<String>,
    /// Base medium from the registry.
    pub medium: Option<String>,
}

/// Result of parsing a timepoint log.
#[derive(Debug, Default, Clone)]
pub struct ReportTimepoints {
    /// Accepted records in log order.
    pub records: Vec<SpecTimepointRecord>,
    /// Non-empty lines scanned.
    pub cnt_lines: u64,
    /// Lines without a sampling record.
    pub cnt_skipped: u64,
    /// Records dropped for the excluded volume.
    pub cnt_excluded_volume: u64,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl ReportTimepoints {
    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_lines".to_string(), self.cnt_lines);
        dict_counts.insert("cnt_records".to_string(), self.records.len() as u64);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert(
            "cnt_excluded_volume".to_string(),
            self.cnt_excluded_volume,
        );
        dict_counts.insert("cnt_warnings".to_string(), self.warnings.len() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} lines={} records={} skipped={} excluded_volume={} warnings={}",
            dict_counts["cnt_lines"],
            dict_counts["cnt_records"],
            dict_counts["cnt_skipped"],
            dict_counts["cnt_excluded_volume"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportTimepoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[TIMEPOINTS]"))
    }
}

/// Reactor id -> registry attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecLookupTable {
    /// Reactor id -> parent culture.
    pub entity_by_id: BTreeMap<String, String>,
    /// Reactor id -> base medium.
    pub medium_by_id: BTreeMap<String, String>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Merge

/// Plate assignment joined with its matching log record, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecMergedRow {
    /// Left side of the join.
    pub assignment: SpecPlateAssignmentRow,
    /// Matching log record.
    pub timepoint: Option<SpecTimepointRecord>,
}

impl SpecMergedRow {
    /// Numeric hours of the matched record.
    pub fn time_value(&self) -> Option<f64> {
        self.timepoint.as_ref().and_then(|tp| tp.time_value)
    }
}

/// Merged row selected for the benchling sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecBenchlingRow {
    /// 1-based running counter.
    pub counter: usize,
    /// Source row; always carries a time value.
    pub merged: SpecMergedRow,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Template

/// Fixed texts of the benchling sheet's manual-entry block (`U2:V4`).
///
/// Row formulas reference `$U$2`, `$U$4`, `$V$4`, `$U$5` and `$V$5`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpecBenchlingTemplate {
    /// `U2`: project prefix of benchling sample names.
    pub project_prefix: String,
    /// `U3`: label above the plate name.
    pub plate_name_label: String,
    /// `U4`: benchling plate name used for plate `V4`.
    pub plate_name: String,
    /// `V2`: reminder shown above the plate number.
    pub plate_number_note: String,
    /// `V3`: label above the plate number.
    pub plate_number_label: String,
    /// `V4`: plate number matched against column `F`; written as text.
    pub plate_number: String,
    /// Value written into column `T` of every row.
    pub replicate: u32,
}

impl Default for SpecBenchlingTemplate {
    fn default() -> Self {
        Self {
            project_prefix: "XXX_PD_001_AMBR".to_string(),
            plate_name_label: "Plate name benchling".to_string(),
            plate_name: "XXX_PD_001_AMBR_SOA_plate#1".to_string(),
            plate_number_note: "CAREFUL TO WRITE THE PLATE NR AS TEXT".to_string(),
            plate_number_label: "Plate Nr (from AMBR)".to_string(),
            plate_number: "11".to_string(),
            replicate: 1,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Mapping pipeline failures.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Registry export lacks a required header.
    #[error("Registry file is missing required column {0:?}.")]
    MissingRegistryColumn(String),
    /// Timepoint log pattern did not compile or has the wrong group count.
    #[error("{0}")]
    InvalidPattern(String),
    /// Registry export could not be read.
    #[error("Failed to read registry file: {0}")]
    Csv(#[from] csv::Error),
    /// Building a table failed.
    #[error("Failed to build table: {0}")]
    Polars(#[from] PolarsError),
    /// Writing the workbook failed.
    #[error(transparent)]
    Xlsx(#[from] XlsxWriteError),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
