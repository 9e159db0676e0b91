//! Well addressing and plate naming helpers.

use crate::conf::{N_PLATE_RACK_ROWS, TUP_WELL_ROW_LETTERS};
use crate::spec::EnumPlateFormat;

/// Well coordinates of a plate in row-major order (`A1`, `A2`, ..., `H12`).
pub fn derive_well_positions(plate_format: EnumPlateFormat) -> Vec<String> {
    TUP_WELL_ROW_LETTERS
        .iter()
        .take(plate_format.rows())
        .flat_map(|row| (1..=plate_format.columns()).map(move |col| format!("{row}{col}")))
        .collect()
}

/// 1-based row number of a well row letter (`A` -> 1 ... `H` -> 8).
pub fn derive_well_row_number(row_letter: char) -> Option<u8> {
    TUP_WELL_ROW_LETTERS
        .iter()
        .position(|chr| *chr == row_letter)
        .map(|idx| idx as u8 + 1)
}

/// Freezer display name of a 1-based plate number.
///
/// Plates are racked three rows deep: 1 -> `Frozen 11`, 2 -> `Frozen 21`,
/// 4 -> `Frozen 12`.
pub fn derive_plate_name(plate_number: usize) -> String {
    let n_idx = plate_number.saturating_sub(1);
    let n_rack_row = n_idx % N_PLATE_RACK_ROWS + 1;
    let n_rack_col = n_idx / N_PLATE_RACK_ROWS + 1;
    format!("Frozen {n_rack_row}{n_rack_col}")
}
