//! Derived tabular views of a completed scheme.
//!
//! - list view   : one column per plate, slots in fill order (padding kept)
//! - flat view   : real samples only, in generation order
//! - block view  : flat view cut into columns of 16
//! - matrix view : flat view cut into chunks of 96, each laid out 8 x 12
//!   column-major (`row = i % 8`, `col = i / 8`)
//!
//! The matrix layout is column-major on purpose while plates themselves are
//! filled row-major; consumers joining on well positions must use the
//! addressing of the view they read.

use crate::conf::{N_BLOCK_VIEW_ROWS, N_MATRIX_COLS, N_MATRIX_ROWS};
use crate::spec::{EnumWellContent, SampleLabel, SpecPlate, SpecScheme};
use crate::util::derive_plate_name;

/// One column per plate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecListView {
    /// `(plate_name, slots)` in plate order.
    pub columns: Vec<(String, Vec<EnumWellContent>)>,
}

/// One 8 x 12 grid; `cells[row][col]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecPlateMatrix {
    /// Unused positions of a short last chunk are `None`.
    pub cells: Vec<Vec<Option<SampleLabel>>>,
}

impl Default for SpecPlateMatrix {
    fn default() -> Self {
        Self {
            cells: vec![vec![None; N_MATRIX_COLS]; N_MATRIX_ROWS],
        }
    }
}

/// All views derived from one scheme.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecSchemeViews {
    /// List view.
    pub list: SpecListView,
    /// Flat view.
    pub flat: Vec<SampleLabel>,
    /// Block view columns.
    pub blocks: Vec<Vec<SampleLabel>>,
    /// Matrix views.
    pub matrices: Vec<SpecPlateMatrix>,
}

/// Build the list view from named plates.
pub fn derive_list_view<'a>(
    named_plates: impl IntoIterator<Item = (String, &'a SpecPlate)>,
) -> SpecListView {
    SpecListView {
        columns: named_plates
            .into_iter()
            .map(|(name, plate)| (name, plate.wells.clone()))
            .collect(),
    }
}

/// Flatten the list view column by column, dropping empty slots.
pub fn derive_flat_view(list_view: &SpecListView) -> Vec<SampleLabel> {
    list_view
        .columns
        .iter()
        .flat_map(|(_, wells)| wells.iter().filter_map(EnumWellContent::sample).copied())
        .collect()
}

/// Cut the flat view into columns of `n_rows` entries; the last may be short.
pub fn derive_block_view(flat: &[SampleLabel], n_rows: usize) -> Vec<Vec<SampleLabel>> {
    if n_rows == 0 {
        return vec![];
    }
    flat.chunks(n_rows).map(<[SampleLabel]>::to_vec).collect()
}

/// Lay the flat view into 8 x 12 grids, 96 entries per grid, column-major.
pub fn derive_matrix_views(flat: &[SampleLabel]) -> Vec<SpecPlateMatrix> {
    flat.chunks(N_MATRIX_ROWS * N_MATRIX_COLS)
        .map(|chunk| {
            let mut matrix = SpecPlateMatrix::default();
            for (n_idx, label) in chunk.iter().enumerate() {
                let n_row = n_idx % N_MATRIX_ROWS;
                let n_col = n_idx / N_MATRIX_ROWS;
                matrix.cells[n_row][n_col] = Some(*label);
            }
            matrix
        })
        .collect()
}

/// Read matrices back column-major; inverse of [`derive_matrix_views`].
pub fn derive_flat_from_matrices(matrices: &[SpecPlateMatrix]) -> Vec<SampleLabel> {
    let mut l_flat = Vec::new();
    for matrix in matrices {
        for n_col in 0..N_MATRIX_COLS {
            for n_row in 0..N_MATRIX_ROWS {
                let cell = matrix
                    .cells
                    .get(n_row)
                    .and_then(|row| row.get(n_col))
                    .copied()
                    .flatten();
                if let Some(label) = cell {
                    l_flat.push(label);
                }
            }
        }
    }
    l_flat
}

/// Derive every view of `scheme`, naming plates by freezer position.
pub fn export_scheme_views(scheme: &SpecScheme) -> SpecSchemeViews {
    let list = derive_list_view(
        scheme
            .plates
            .iter()
            .map(|(plate_number, plate)| (derive_plate_name(*plate_number), plate)),
    );
    let flat = derive_flat_view(&list);
    let blocks = derive_block_view(&flat, N_BLOCK_VIEW_ROWS);
    let matrices = derive_matrix_views(&flat);

    tracing::debug!(
        n_plates = list.columns.len(),
        n_samples = flat.len(),
        n_blocks = blocks.len(),
        n_matrices = matrices.len(),
        "scheme views derived"
    );

    SpecSchemeViews {
        list,
        flat,
        blocks,
        matrices,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::builder::create_sampling_scheme;
    use crate::spec::{EnumPlateFormat, SpecSchemeOptions};

    fn create_flat(n: u32) -> Vec<SampleLabel> {
        (0..n).map(|idx| SampleLabel::numbered(1, idx)).collect()
    }

    #[test]
    fn test_empty_scheme_yields_empty_views() {
        let scheme = SpecScheme {
            plate_format: EnumPlateFormat::Wells96,
            plates: vec![],
            warnings: vec![],
        };
        assert_eq!(export_scheme_views(&scheme), SpecSchemeViews::default());
    }

    #[test]
    fn test_flat_view_drops_padding_and_keeps_plate_order() {
        let scheme = create_sampling_scheme(&SpecSchemeOptions {
            plate_format: EnumPlateFormat::Wells24,
            num_reactors: 5,
            num_samples: 6,
            starting_reactor: 1,
            include_end_batch: true,
        })
        .unwrap();
        let views = export_scheme_views(&scheme);

        assert_eq!(views.list.columns.len(), 2);
        assert_eq!(views.list.columns[0].0, "Frozen 11");
        assert_eq!(views.list.columns[1].0, "Frozen 21");
        assert_eq!(views.list.columns[1].1.len(), 24);
        assert_eq!(views.flat.len(), 35);
        assert_eq!(views.flat[0], SampleLabel::end_batch(1));
        assert_eq!(views.flat[5], SampleLabel::numbered(1, 0));
        assert_eq!(views.flat[34], SampleLabel::numbered(5, 5));
    }

    #[test]
    fn test_block_view_columns_of_sixteen() {
        let l_blocks = derive_block_view(&create_flat(35), N_BLOCK_VIEW_ROWS);
        assert_eq!(l_blocks.len(), 3);
        assert_eq!(l_blocks[0].len(), 16);
        assert_eq!(l_blocks[2].len(), 3);
        assert_eq!(l_blocks[1][0], SampleLabel::numbered(1, 16));
        assert!(derive_block_view(&[], N_BLOCK_VIEW_ROWS).is_empty());
    }

    #[test]
    fn test_matrix_view_is_column_major() {
        let l_matrices = derive_matrix_views(&create_flat(100));
        assert_eq!(l_matrices.len(), 2);

        let first = &l_matrices[0];
        assert_eq!(first.cells[0][0], Some(SampleLabel::numbered(1, 0)));
        assert_eq!(first.cells[1][0], Some(SampleLabel::numbered(1, 1)));
        assert_eq!(first.cells[7][0], Some(SampleLabel::numbered(1, 7)));
        assert_eq!(first.cells[0][1], Some(SampleLabel::numbered(1, 8)));
        assert_eq!(first.cells[7][11], Some(SampleLabel::numbered(1, 95)));

        let second = &l_matrices[1];
        assert_eq!(second.cells[3][0], Some(SampleLabel::numbered(1, 99)));
        assert_eq!(second.cells[4][0], None);
        assert_eq!(second.cells[0][1], None);
    }

    #[test]
    fn test_matrix_read_back_recovers_flat_order() {
        for n in [0, 1, 8, 95, 96, 97, 250] {
            let flat = create_flat(n);
            assert_eq!(derive_flat_from_matrices(&derive_matrix_views(&flat)), flat);
        }
    }
}
