//! Stateless helper utilities used by the XLSX writer kernel.

use std::collections::{BTreeMap, BTreeSet};

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::spec::{EnumCellValue, XlsxWriteError};

////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Normalize a cell value for its column.
///
/// Numeric columns parse numeric text, other columns keep text. Missing,
/// NaN and infinite values become blank cells in every column.
pub fn convert_cell_value(value: &EnumCellValue, if_is_numeric_col: bool) -> EnumCellValue {
    match value {
        EnumCellValue::None => EnumCellValue::None,
        EnumCellValue::Number(n) if !n.is_finite() => EnumCellValue::None,
        EnumCellValue::String(s) if !if_is_numeric_col => EnumCellValue::String(s.clone()),
        EnumCellValue::Number(n) if !if_is_numeric_col => EnumCellValue::String(n.to_string()),
        EnumCellValue::Number(n) => EnumCellValue::Number(*n),
        EnumCellValue::String(s) => match s.parse::<f64>() {
            Ok(v) if v.is_finite() => EnumCellValue::Number(v),
            Ok(_) => EnumCellValue::None,
            Err(_) => EnumCellValue::String(s.clone()),
        },
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DataFrameLikeUtils

/// Validate that `columns` has no duplicated names.
pub fn validate_unique_columns(columns: &[String]) -> Result<(), XlsxWriteError> {
    if columns.len() == columns.iter().collect::<BTreeSet<_>>().len() {
        return Ok(());
    }

    let mut dict_pos: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (n_idx, c_name) in columns.iter().enumerate() {
        dict_pos.entry(c_name).or_default().push(n_idx);
    }

    let c_msg = dict_pos
        .iter()
        .filter(|(_, l_pos)| l_pos.len() > 1)
        .map(|(c_name, l_pos)| format!("{c_name:?} x{} at indices {l_pos:?}", l_pos.len()))
        .collect::<Vec<_>>()
        .join("; ");

    Err(XlsxWriteError::DuplicateColumns(c_msg))
}

/// Resolve mixed refs (`name` or numeric string index) to sorted unique indices.
pub fn select_sorted_indices_from_refs(
    columns: &[String],
    refs: Option<&[String]>,
) -> Result<Vec<usize>, XlsxWriteError> {
    let Some(refs) = refs else {
        return Ok(vec![]);
    };

    let mut set_idx = BTreeSet::new();
    for ref_col in refs {
        if let Some(n_idx) = columns.iter().position(|c_name| c_name == ref_col) {
            set_idx.insert(n_idx);
            continue;
        }
        match ref_col.parse::<usize>() {
            Ok(n_idx) if n_idx < columns.len() => {
                set_idx.insert(n_idx);
            }
            _ => return Err(XlsxWriteError::ColumnNotFound(ref_col.clone())),
        }
    }

    Ok(set_idx.into_iter().collect())
}

/// Reject tables that would not fit in a single worksheet.
pub fn validate_sheet_size(
    sheet_name: &str,
    height_df: usize,
    width_df: usize,
) -> Result<(), XlsxWriteError> {
    let n_rows_total = height_df + 1;
    if n_rows_total > N_NROWS_EXCEL_MAX || width_df > N_NCOLS_EXCEL_MAX {
        return Err(XlsxWriteError::SheetTooLarge {
            sheet: sheet_name.to_string(),
            n_rows: n_rows_total,
            n_cols: width_df,
        });
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellReferences

/// Zero-based column index to Excel letters (`0` -> `A`, `26` -> `AA`).
pub fn derive_column_letters(col_idx: usize) -> String {
    let mut l_chars = Vec::new();
    let mut n_rest = col_idx + 1;
    while n_rest > 0 {
        let n_rem = (n_rest - 1) % 26;
        l_chars.push((b'A' + n_rem as u8) as char);
        n_rest = (n_rest - 1) / 26;
    }
    l_chars.iter().rev().collect()
}

/// Parse an A1 reference into zero-based `(row, col)`.
pub fn parse_cell_ref(cell_ref: &str) -> Result<(u32, u16), XlsxWriteError> {
    let err = || XlsxWriteError::InvalidCellRef(cell_ref.to_string());

    let c_ref = cell_ref.trim();
    let n_split = c_ref
        .find(|chr: char| !chr.is_ascii_uppercase())
        .ok_or_else(err)?;
    let (c_letters, c_digits) = c_ref.split_at(n_split);
    if c_letters.is_empty() || c_digits.is_empty() || !c_digits.chars().all(|c| c.is_ascii_digit())
    {
        return Err(err());
    }

    let mut n_col = 0usize;
    for chr in c_letters.chars() {
        n_col = n_col * 26 + (chr as usize - 'A' as usize + 1);
        if n_col > N_NCOLS_EXCEL_MAX {
            return Err(err());
        }
    }
    let n_row = c_digits.parse::<usize>().map_err(|_| err())?;
    if n_row == 0 || n_row > N_NROWS_EXCEL_MAX {
        return Err(err());
    }

    Ok((cast_row_num(n_row - 1)?, cast_col_num(n_col - 1)?))
}

/// Checked conversion into Excel's row index type.
pub fn cast_row_num(value: usize) -> Result<u32, XlsxWriteError> {
    u32::try_from(value).map_err(|_| XlsxWriteError::IndexOverflow(format!("row index overflow: {value}")))
}

/// Checked conversion into Excel's column index type.
pub fn cast_col_num(value: usize) -> Result<u16, XlsxWriteError> {
    u16::try_from(value)
        .map_err(|_| XlsxWriteError::IndexOverflow(format!("column index overflow: {value}")))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
