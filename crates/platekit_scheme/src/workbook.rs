//! Sampling-scheme workbook (one sheet per view).

use platekit_io_xlsx::{
    SpecXlsxSheetWriteOptions, XlsxWriter, derive_default_xlsx_formats,
    derive_default_xlsx_write_options,
};
use polars::prelude::{Column, DataFrame};

use crate::conf::{
    C_SHEET_BLOCKS, C_SHEET_FLAT_LIST, C_SHEET_LIST_FORMAT, C_SHEET_MATRIX_PREFIX,
    N_BLOCK_VIEW_ROWS, N_MATRIX_COLS, TUP_WELL_ROW_LETTERS,
};
use crate::exporter::{SpecListView, SpecPlateMatrix, SpecSchemeViews};
use crate::spec::{SampleLabel, SchemeError};

fn create_padded_column(name: String, mut values: Vec<Option<String>>, height: usize) -> Column {
    values.resize(height, None);
    Column::new(name.into(), values)
}

/// One column per plate, headed by the plate name.
pub fn derive_list_dataframe(list_view: &SpecListView) -> Result<DataFrame, SchemeError> {
    let n_height = list_view
        .columns
        .iter()
        .map(|(_, wells)| wells.len())
        .max()
        .unwrap_or(0);
    let l_cols = list_view
        .columns
        .iter()
        .map(|(name, wells)| {
            create_padded_column(
                name.clone(),
                wells.iter().map(|w| Some(w.to_string())).collect(),
                n_height,
            )
        })
        .collect();
    Ok(DataFrame::new(l_cols)?)
}

/// Single `Sample` column in generation order.
pub fn derive_flat_dataframe(flat: &[SampleLabel]) -> Result<DataFrame, SchemeError> {
    let values: Vec<Option<String>> = flat.iter().map(|l| Some(l.to_string())).collect();
    Ok(DataFrame::new(vec![Column::new("Sample".into(), values)])?)
}

/// `Block 1`, `Block 2`, ... columns of 16 rows; short last column left blank.
pub fn derive_block_dataframe(blocks: &[Vec<SampleLabel>]) -> Result<DataFrame, SchemeError> {
    let l_cols = blocks
        .iter()
        .enumerate()
        .map(|(n_idx, block)| {
            create_padded_column(
                format!("Block {}", n_idx + 1),
                block.iter().map(|l| Some(l.to_string())).collect(),
                N_BLOCK_VIEW_ROWS,
            )
        })
        .collect();
    Ok(DataFrame::new(l_cols)?)
}

/// `Row` label column (`A`..`H`) followed by columns `1`..`12`.
pub fn derive_matrix_dataframe(matrix: &SpecPlateMatrix) -> Result<DataFrame, SchemeError> {
    let n_rows = matrix.cells.len();
    let mut l_cols = vec![Column::new(
        "Row".into(),
        TUP_WELL_ROW_LETTERS
            .iter()
            .take(n_rows)
            .map(|chr| chr.to_string())
            .collect::<Vec<_>>(),
    )];
    for n_col in 0..N_MATRIX_COLS {
        let values: Vec<Option<String>> = matrix
            .cells
            .iter()
            .map(|row| row.get(n_col).copied().flatten().map(|l| l.to_string()))
            .collect();
        l_cols.push(Column::new((n_col + 1).to_string().into(), values));
    }
    Ok(DataFrame::new(l_cols)?)
}

/// Serialize all scheme views into one workbook.
///
/// Sheets: `List Format`, `Flat List`, `16 Row Blocks`, `Matrix 1..k`.
pub fn build_scheme_workbook(views: &SpecSchemeViews) -> Result<Vec<u8>, SchemeError> {
    let mut writer = XlsxWriter::new(
        derive_default_xlsx_formats(),
        derive_default_xlsx_write_options(),
    );
    let options = SpecXlsxSheetWriteOptions::default();

    writer.write_sheet_from_dataframe(
        &derive_list_dataframe(&views.list)?,
        C_SHEET_LIST_FORMAT,
        &options,
    )?;
    writer.write_sheet_from_dataframe(
        &derive_flat_dataframe(&views.flat)?,
        C_SHEET_FLAT_LIST,
        &options,
    )?;
    writer.write_sheet_from_dataframe(
        &derive_block_dataframe(&views.blocks)?,
        C_SHEET_BLOCKS,
        &options,
    )?;
    for (n_idx, matrix) in views.matrices.iter().enumerate() {
        writer.write_sheet_from_dataframe(
            &derive_matrix_dataframe(matrix)?,
            &format!("{C_SHEET_MATRIX_PREFIX} {}", n_idx + 1),
            &SpecXlsxSheetWriteOptions {
                col_freeze: 1,
                ..Default::default()
            },
        )?;
    }

    let v_bytes = writer.close()?;
    tracing::info!(
        n_plates = views.list.columns.len(),
        n_samples = views.flat.len(),
        n_bytes = v_bytes.len(),
        "sampling scheme workbook built"
    );
    Ok(v_bytes)
}

#[cfg(test)]
mod tests {
    use polars::prelude::AnyValue;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::builder::create_sampling_scheme;
    use crate::exporter::{derive_matrix_views, export_scheme_views};
    use crate::spec::{EnumPlateFormat, SpecSchemeOptions};

    fn create_views() -> SpecSchemeViews {
        let scheme = create_sampling_scheme(&SpecSchemeOptions {
            plate_format: EnumPlateFormat::Wells24,
            num_reactors: 3,
            num_samples: 9,
            starting_reactor: 1,
            include_end_batch: false,
        })
        .unwrap();
        export_scheme_views(&scheme)
    }

    #[test]
    fn test_list_dataframe_headers_are_plate_names() {
        let df = derive_list_dataframe(&create_views().list).unwrap();
        assert_eq!(df.get_column_names_str(), vec!["Frozen 11", "Frozen 21"]);
        assert_eq!(df.height(), 24);
        assert_eq!(
            df.get_columns()[1].get(3).unwrap(),
            AnyValue::String("Empty")
        );
    }

    #[test]
    fn test_block_dataframe_pads_last_column() {
        let df = derive_block_dataframe(&create_views().blocks).unwrap();
        assert_eq!(df.width(), 2);
        assert_eq!(df.height(), 16);
        assert_eq!(df.get_columns()[1].get(10).unwrap(), AnyValue::String("R3S8"));
        assert_eq!(df.get_columns()[1].get(11).unwrap(), AnyValue::Null);
    }

    #[test]
    fn test_matrix_dataframe_layout() {
        let flat: Vec<SampleLabel> = (0..10).map(|idx| SampleLabel::numbered(2, idx)).collect();
        let df = derive_matrix_dataframe(&derive_matrix_views(&flat)[0]).unwrap();
        assert_eq!(df.width(), 13);
        assert_eq!(df.height(), 8);
        assert_eq!(df.get_columns()[0].get(7).unwrap(), AnyValue::String("H"));
        assert_eq!(df.get_columns()[2].get(1).unwrap(), AnyValue::String("R2S9"));
        assert_eq!(df.get_columns()[2].get(2).unwrap(), AnyValue::Null);
    }

    #[test]
    fn test_build_scheme_workbook_returns_xlsx_bytes() {
        let v_bytes = build_scheme_workbook(&create_views()).unwrap();
        assert_eq!(&v_bytes[..2], b"PK");
    }
}
