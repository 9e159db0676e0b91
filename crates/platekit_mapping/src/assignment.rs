//! Re-expansion of a list-format sheet into per-well assignment rows.

use platekit_io_xlsx::{EnumCellValue, derive_cell_value_from_any_value};
use platekit_scheme::{C_EMPTY_WELL, EnumPlateFormat, derive_well_positions};
use polars::prelude::DataFrame;

use crate::spec::{MappingError, ReportPlateAssignment, SpecPlateAssignmentRow, SpecRowError};
use crate::util::pad_zeros_left;

/// Column-oriented list-format table: `(header, cells)` per plate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecListTable {
    /// Columns in sheet order; `None` for blank cells.
    pub columns: Vec<(String, Vec<Option<String>>)>,
}

impl SpecListTable {
    /// Read a table loaded by the front end. Numbers are kept as their text
    /// form; NaN counts as blank.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self, MappingError> {
        let mut l_columns = Vec::with_capacity(df.width());
        for col in df.get_columns() {
            let mut l_cells = Vec::with_capacity(df.height());
            for n_idx in 0..df.height() {
                let cell = match derive_cell_value_from_any_value(col.get(n_idx)?) {
                    EnumCellValue::None => None,
                    EnumCellValue::Number(val) if val.is_nan() => None,
                    EnumCellValue::Number(val) => Some(val.to_string()),
                    EnumCellValue::String(val) => Some(val),
                };
                l_cells.push(cell);
            }
            l_columns.push((col.name().to_string(), l_cells));
        }
        Ok(Self { columns: l_columns })
    }
}

/// Plate identifier from a list-format header: its last whitespace token
/// (`Frozen 11` -> `11`).
pub fn derive_plate_id(header: &str) -> String {
    header.split_whitespace().last().unwrap_or_default().to_string()
}

/// Decode a sample token into `(reactor, timepoint_index)`.
///
/// - `Empty` -> (`Empty`, `Empty`)
/// - `R5S3` -> (`R05`, `S03`), `R12S7` -> (`R12`, `S07`)
///
/// The reactor part is everything before the first `S`; when it is three or
/// more characters long only its 2nd and 3rd characters are kept. The sample
/// part is the text between the first and second `S`.
pub fn parse_sample_token(sample: &str) -> Result<(String, String), String> {
    if sample == C_EMPTY_WELL {
        return Ok((C_EMPTY_WELL.to_string(), C_EMPTY_WELL.to_string()));
    }

    let mut parts = sample.split('S');
    let reactor_part = parts.next().unwrap_or_default();
    let Some(sample_part) = parts.next() else {
        return Err("sample token has no 'S' separator".to_string());
    };

    let l_chars: Vec<char> = reactor_part.chars().collect();
    let reactor = match l_chars.as_slice() {
        [_, first, second, ..] => format!("R{first}{second}"),
        [_, only] => format!("R0{only}"),
        _ => return Err(format!("reactor part {reactor_part:?} is too short")),
    };
    Ok((reactor, format!("S{}", pad_zeros_left(sample_part, 2))))
}

/// Expand every plate column into one row per non-blank cell.
///
/// The i-th non-blank cell of a column sits in well `i % capacity` of the
/// row-major well enumeration. Cells whose token fails to decode are
/// reported and skipped; the well index still advances past them.
pub fn expand_plate_assignments(
    table: &SpecListTable,
    plate_format: EnumPlateFormat,
) -> ReportPlateAssignment {
    let l_wells = derive_well_positions(plate_format);
    let mut report = ReportPlateAssignment::default();

    for (header, cells) in &table.columns {
        let plate = derive_plate_id(header);
        if plate.is_empty() {
            report
                .warnings
                .push(format!("Column header {header:?} has no plate identifier."));
        }
        for (n_idx, sample) in cells.iter().flatten().enumerate() {
            report.cnt_cells += 1;
            let destination_well = l_wells[n_idx % l_wells.len()].clone();
            match parse_sample_token(sample) {
                Ok((reactor, timepoint_index)) => {
                    report.rows.push(SpecPlateAssignmentRow {
                        sample: sample.clone(),
                        plate: plate.clone(),
                        destination_well,
                        reactor,
                        timepoint_index,
                    });
                }
                Err(message) => {
                    tracing::warn!(plate = %plate, index = n_idx, sample = %sample, "{message}");
                    report.errors.push(SpecRowError {
                        plate: plate.clone(),
                        index: n_idx,
                        sample: sample.clone(),
                        message,
                    });
                }
            }
        }
    }

    tracing::debug!("{report}");
    report
}

#[cfg(test)]
mod tests {
    use polars::prelude::Column;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn create_table(columns: &[(&str, &[Option<&str>])]) -> SpecListTable {
        SpecListTable {
            columns: columns
                .iter()
                .map(|(name, cells)| {
                    (
                        name.to_string(),
                        cells.iter().map(|c| c.map(str::to_string)).collect(),
                    )
                })
                .collect(),
        }
    }

    #[rstest]
    #[case("R5S3", "R05", "S03")]
    #[case("R12S7", "R12", "S07")]
    #[case("R1S81", "R01", "S81")]
    #[case("R123S4", "R12", "S04")]
    #[case("R5S", "R05", "S00")]
    #[case("R5S3S9", "R05", "S03")]
    #[case("Empty", "Empty", "Empty")]
    fn test_parse_sample_token(
        #[case] sample: &str,
        #[case] reactor: &str,
        #[case] timepoint: &str,
    ) {
        assert_eq!(
            parse_sample_token(sample).unwrap(),
            (reactor.to_string(), timepoint.to_string())
        );
    }

    #[rstest]
    #[case("R5")]
    #[case("r5s3")]
    #[case("S3")]
    #[case("RS3")]
    #[case("")]
    fn test_parse_sample_token_rejects(#[case] sample: &str) {
        assert!(parse_sample_token(sample).is_err());
    }

    #[test]
    fn test_expand_drops_blanks_and_assigns_wells() {
        let table = create_table(&[
            ("Frozen 11", &[Some("R1S0"), None, Some("R2S0"), Some("Empty")]),
            ("Frozen 21", &[Some("R3S1")]),
        ]);
        let report = expand_plate_assignments(&table, EnumPlateFormat::Wells24);

        assert!(report.errors.is_empty());
        assert_eq!(report.cnt_cells, 4);
        let l_got: Vec<(&str, &str, &str, &str)> = report
            .rows
            .iter()
            .map(|r| {
                (
                    r.plate.as_str(),
                    r.destination_well.as_str(),
                    r.reactor.as_str(),
                    r.timepoint_index.as_str(),
                )
            })
            .collect();
        assert_eq!(
            l_got,
            vec![
                ("11", "A1", "R01", "S00"),
                ("11", "A2", "R02", "S00"),
                ("11", "A3", "Empty", "Empty"),
                ("21", "A1", "R03", "S01"),
            ]
        );
    }

    #[test]
    fn test_expand_reports_bad_tokens_and_keeps_well_order() {
        let table = create_table(&[("Frozen 11", &[Some("R1S0"), Some("bad"), Some("R2S0")])]);
        let report = expand_plate_assignments(&table, EnumPlateFormat::Wells96);

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[1].destination_well, "A3");
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].index, 1);
        assert_eq!(report.errors[0].sample, "bad");
        assert_eq!(report.format("[ASSIGN]"), "[ASSIGN] cells=3 rows=2 errors=1 warnings=0");
    }

    #[test]
    fn test_expand_wraps_well_index_past_capacity() {
        let l_cells: Vec<Option<&str>> = (0..26).map(|_| Some("R1S1")).collect();
        let table = create_table(&[("Frozen 11", &l_cells)]);
        let report = expand_plate_assignments(&table, EnumPlateFormat::Wells24);
        assert_eq!(report.rows[23].destination_well, "D6");
        assert_eq!(report.rows[24].destination_well, "A1");
        assert_eq!(report.rows[25].destination_well, "A2");
    }

    #[test]
    fn test_from_dataframe_maps_nulls_and_numbers() {
        let df = DataFrame::new(vec![
            Column::new("Frozen 11".into(), [Some("R1S0"), None]),
            Column::new("Frozen 21".into(), [Some(5.0), Some(f64::NAN)]),
        ])
        .unwrap();
        let table = SpecListTable::from_dataframe(&df).unwrap();
        assert_eq!(
            table,
            SpecListTable {
                columns: vec![
                    ("Frozen 11".to_string(), vec![Some("R1S0".to_string()), None]),
                    ("Frozen 21".to_string(), vec![Some("5".to_string()), None]),
                ],
            }
        );
    }

    #[rstest]
    #[case("Frozen 11", "11")]
    #[case("  Plate   7 ", "7")]
    #[case("", "")]
    fn test_derive_plate_id(#[case] header: &str, #[case] expected: &str) {
        assert_eq!(derive_plate_id(header), expected);
    }
}
