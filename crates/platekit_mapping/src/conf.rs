//! Column names, sheet names and fixed values of the mapping workbook.

/// Volume (mL) of log entries that are not plate samples.
pub const C_VOLUME_EXCLUDED: &str = "2.00";
/// Sampling record of the timepoint log.
///
/// Groups: reactor, timepoint, volume, plate, well. One `"` opening the
/// timepoint field is skipped; the greedy `.+` makes the last `plate/well`
/// pair win.
pub const C_LOG_RECORD_PATTERN: &str =
    r#"Bioreactor\s+(\d+)",(?:")?(\S+),"Sample\s+(\S+)\s+mL+\s.+\s+(\d+)/([A-Z]+\d+)"#;

/// Registry export: identifier column.
pub const C_REGISTRY_COL_ID: &str = "Reactor/Plate/Flask Number";
/// Registry export: entity column.
pub const C_REGISTRY_COL_ENTITY: &str = "Entity";
/// Registry export: base medium column.
pub const C_REGISTRY_COL_MEDIUM: &str = "Base Medium";

/// Sample label as written in the scheme (`R3S5`).
pub const C_COL_SAMPLE: &str = "Sample";
/// Plate identifier (last token of the plate header).
pub const C_COL_PLATE: &str = "Plate";
/// Well the sample was dispensed into (`A1`).
pub const C_COL_DESTINATION_WELL: &str = "Destination Well";
/// Normalised reactor id (`R03`).
pub const C_COL_REACTOR: &str = "Reactor";
/// Sample index within its reactor (`S05`).
pub const C_COL_TIMEPOINT_INDEX: &str = "Timepoint (#)";
/// Timepoint token as logged (`48h`).
pub const C_COL_TIMEPOINT_RAW: &str = "Timepoint (h)";
/// Timepoint in hours.
pub const C_COL_TIME_VALUE: &str = "Time_Value";
/// Sampled volume (mL) as logged.
pub const C_COL_VOLUME: &str = "Volume";
/// 1-based row number of the destination well letter.
pub const C_COL_WELL_NUMBER: &str = "Well_Number";
/// Registry entity of the reactor.
pub const C_COL_ENTITY: &str = "Parent culture";
/// Registry base medium of the reactor.
pub const C_COL_MEDIUM: &str = "Medium";

/// Benchling sheet: running row number.
pub const C_COL_ROW_COUNTER: &str = "#";
/// Benchling sheet: reactor id column.
pub const C_COL_REACTOR_LONG: &str = "Reactor/Plate Number";
/// Blank columns placed before the merged columns of the benchling sheet.
pub const TUP_BENCHLING_COLS_BEFORE: [&str; 3] =
    ["Benchling sample", "Destination Plate", "Benchling sample SOA"];
/// Blank columns placed after the merged columns of the benchling sheet.
pub const TUP_BENCHLING_COLS_AFTER: [&str; 3] =
    ["Dilution", "Raw Absorbance Value #1", "Raw Absorbance Value #2"];

/// Sheet with one row per sample carrying a time value.
pub const C_SHEET_BENCHLING: &str = "benchling";
/// Sheet with the full merged table.
pub const C_SHEET_OVERVIEW: &str = "overview";

/// Benchling sheet columns `P:S` hold user-entered text.
pub const TUP_BENCHLING_TEXT_COLS_IDX: [usize; 4] = [15, 16, 17, 18];
/// Header text of the manual-entry columns right of the table.
pub const TUP_BENCHLING_SIDE_HEADERS: [(&str, &str); 4] = [
    ("S1", "CDW"),
    ("T1", "replicate #"),
    ("U1", "Not used"),
    ("V1", "Not used"),
];
