//! Mapping workbook: `benchling` and `overview` sheets.

use platekit_io_xlsx::{
    SpecSheetCell, SpecXlsxSheetWriteOptions, XlsxWriter, derive_default_xlsx_formats,
    derive_default_xlsx_write_options,
};
use polars::prelude::{Column, DataFrame};

use crate::conf::{
    C_COL_DESTINATION_WELL, C_COL_ENTITY, C_COL_MEDIUM, C_COL_PLATE, C_COL_REACTOR,
    C_COL_REACTOR_LONG, C_COL_ROW_COUNTER, C_COL_SAMPLE, C_COL_TIME_VALUE, C_COL_TIMEPOINT_INDEX,
    C_COL_TIMEPOINT_RAW, C_COL_VOLUME, C_COL_WELL_NUMBER, C_SHEET_BENCHLING, C_SHEET_OVERVIEW,
    TUP_BENCHLING_COLS_AFTER, TUP_BENCHLING_COLS_BEFORE, TUP_BENCHLING_SIDE_HEADERS,
    TUP_BENCHLING_TEXT_COLS_IDX,
};
use crate::merge::derive_benchling_rows;
use crate::spec::{MappingError, SpecBenchlingRow, SpecBenchlingTemplate, SpecMergedRow};

fn create_text_column<'a>(
    name: &str,
    rows: &[&'a SpecMergedRow],
    pick: impl Fn(&'a SpecMergedRow) -> Option<&'a str>,
) -> Column {
    let values: Vec<Option<&str>> = rows.iter().copied().map(pick).collect();
    Column::new(name.into(), values)
}

fn create_blank_column(name: &str, height: usize) -> Column {
    Column::new(name.into(), vec![None::<String>; height])
}

/// Merged columns in overview order; the reactor column is named `reactor_col`.
fn derive_merged_columns(rows: &[&SpecMergedRow], reactor_col: &str) -> Vec<Column> {
    vec![
        create_text_column(C_COL_SAMPLE, rows, |r| Some(r.assignment.sample.as_str())),
        create_text_column(C_COL_PLATE, rows, |r| Some(r.assignment.plate.as_str())),
        create_text_column(C_COL_DESTINATION_WELL, rows, |r| {
            Some(r.assignment.destination_well.as_str())
        }),
        create_text_column(reactor_col, rows, |r| Some(r.assignment.reactor.as_str())),
        create_text_column(C_COL_TIMEPOINT_INDEX, rows, |r| {
            Some(r.assignment.timepoint_index.as_str())
        }),
        create_text_column(C_COL_TIMEPOINT_RAW, rows, |r| {
            r.timepoint.as_ref().map(|tp| tp.timepoint_raw.as_str())
        }),
        Column::new(
            C_COL_TIME_VALUE.into(),
            rows.iter().map(|r| r.time_value()).collect::<Vec<_>>(),
        ),
        create_text_column(C_COL_VOLUME, rows, |r| {
            r.timepoint.as_ref().map(|tp| tp.volume.as_str())
        }),
        Column::new(
            C_COL_WELL_NUMBER.into(),
            rows.iter()
                .map(|r| {
                    r.timepoint
                        .as_ref()
                        .and_then(|tp| tp.well_row_number)
                        .map(i64::from)
                })
                .collect::<Vec<_>>(),
        ),
        create_text_column(C_COL_ENTITY, rows, |r| {
            r.timepoint.as_ref().and_then(|tp| tp.entity.as_deref())
        }),
        create_text_column(C_COL_MEDIUM, rows, |r| {
            r.timepoint.as_ref().and_then(|tp| tp.medium.as_deref())
        }),
    ]
}

/// Full merged table.
pub fn derive_overview_dataframe(merged: &[SpecMergedRow]) -> Result<DataFrame, MappingError> {
    let l_rows: Vec<&SpecMergedRow> = merged.iter().collect();
    Ok(DataFrame::new(derive_merged_columns(&l_rows, C_COL_REACTOR))?)
}

/// Benchling table, columns `A:R`:
/// `#`, three blank name columns, the merged columns (reactor renamed to
/// `Reactor/Plate Number`), three blank measurement columns.
pub fn derive_benchling_dataframe(rows: &[SpecBenchlingRow]) -> Result<DataFrame, MappingError> {
    let n_height = rows.len();
    let l_merged: Vec<&SpecMergedRow> = rows.iter().map(|row| &row.merged).collect();

    let mut l_cols = vec![Column::new(
        C_COL_ROW_COUNTER.into(),
        rows.iter().map(|row| row.counter as i64).collect::<Vec<_>>(),
    )];
    l_cols.extend(
        TUP_BENCHLING_COLS_BEFORE
            .iter()
            .map(|name| create_blank_column(name, n_height)),
    );
    l_cols.extend(derive_merged_columns(&l_merged, C_COL_REACTOR_LONG));
    l_cols.extend(
        TUP_BENCHLING_COLS_AFTER
            .iter()
            .map(|name| create_blank_column(name, n_height)),
    );
    Ok(DataFrame::new(l_cols)?)
}

/// Formulas of columns `B`, `C`, `D` for 1-based sheet row `row`.
///
/// - `B`: `<prefix>_<reactor>__<timepoint>`
/// - `C`: benchling plate name when column `F` matches `V4` (or `V5`)
/// - `D`: `B` plus `_SOA_#<replicate>`
pub fn derive_benchling_formulas(row: usize) -> [String; 3] {
    [
        format!("=$U$2&\"_\"&H{row}&\"__\"&I{row}"),
        format!("=IF(F{row}=$V$4,$U$4,IF(F{row}=$V$5,$U$5))"),
        format!("=$U$2&\"_\"&H{row}&\"__\"&I{row}&\"_\"&\"SOA\"&\"_\"&\"#\"&T{row}"),
    ]
}

/// Template block and per-row cells of a benchling sheet with `n_rows` data rows.
pub fn derive_benchling_cells(
    n_rows: usize,
    template: &SpecBenchlingTemplate,
) -> Vec<SpecSheetCell> {
    let mut l_cells: Vec<SpecSheetCell> = TUP_BENCHLING_SIDE_HEADERS
        .iter()
        .map(|(cell_ref, text)| SpecSheetCell::text(*cell_ref, *text))
        .collect();
    l_cells.extend([
        SpecSheetCell::text("U2", template.project_prefix.as_str()),
        SpecSheetCell::text("U3", template.plate_name_label.as_str()),
        SpecSheetCell::text("U4", template.plate_name.as_str()),
        SpecSheetCell::text("V2", template.plate_number_note.as_str()),
        SpecSheetCell::text("V3", template.plate_number_label.as_str()),
        SpecSheetCell::text("V4", template.plate_number.as_str()),
    ]);

    for n_row in 2..n_rows + 2 {
        let [c_name, c_plate, c_name_soa] = derive_benchling_formulas(n_row);
        l_cells.push(SpecSheetCell::number(
            format!("T{n_row}"),
            f64::from(template.replicate),
        ));
        l_cells.push(SpecSheetCell::formula(format!("B{n_row}"), c_name));
        l_cells.push(SpecSheetCell::formula(format!("C{n_row}"), c_plate));
        l_cells.push(SpecSheetCell::formula(format!("D{n_row}"), c_name_soa));
    }
    l_cells
}

/// Serialize merged rows into the `benchling` + `overview` workbook.
pub fn build_mapping_workbook(
    merged: &[SpecMergedRow],
    template: &SpecBenchlingTemplate,
) -> Result<Vec<u8>, MappingError> {
    let l_benchling = derive_benchling_rows(merged);
    let mut writer = XlsxWriter::new(
        derive_default_xlsx_formats(),
        derive_default_xlsx_write_options(),
    );

    let sheet_benchling = writer.write_sheet_from_dataframe(
        &derive_benchling_dataframe(&l_benchling)?,
        C_SHEET_BENCHLING,
        &SpecXlsxSheetWriteOptions {
            cols_text: Some(
                TUP_BENCHLING_COLS_AFTER
                    .iter()
                    .map(|name| name.to_string())
                    .collect(),
            ),
            ..Default::default()
        },
    )?;
    writer.set_columns_text_format(&sheet_benchling, &TUP_BENCHLING_TEXT_COLS_IDX)?;
    writer.write_cells(
        &sheet_benchling,
        &derive_benchling_cells(l_benchling.len(), template),
    )?;

    writer.write_sheet_from_dataframe(
        &derive_overview_dataframe(merged)?,
        C_SHEET_OVERVIEW,
        &SpecXlsxSheetWriteOptions::default(),
    )?;

    for report in writer.report() {
        for c_msg in &report.warnings {
            tracing::warn!("{c_msg}");
        }
    }
    let v_bytes = writer.close()?;
    tracing::info!(
        n_rows_overview = merged.len(),
        n_rows_benchling = l_benchling.len(),
        n_bytes = v_bytes.len(),
        "mapping workbook built"
    );
    Ok(v_bytes)
}
