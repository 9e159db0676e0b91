//! Sampling-scheme constants.

/// Sample index rendered for the end-of-batch sample of every reactor.
pub const N_END_BATCH_SAMPLE_INDEX: u32 = 81;
/// Text written into wells that hold no sample.
pub const C_EMPTY_WELL: &str = "Empty";
/// Freezer racks hold plates in this many rows.
pub const N_PLATE_RACK_ROWS: usize = 3;
/// Row letters of the largest supported plate.
pub const TUP_WELL_ROW_LETTERS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

/// Entries per column of the block view.
pub const N_BLOCK_VIEW_ROWS: usize = 16;
/// Rows of one matrix view.
pub const N_MATRIX_ROWS: usize = 8;
/// Columns of one matrix view.
pub const N_MATRIX_COLS: usize = 12;

/// Sheet holding one column per plate; read back by the plate-assignment step.
pub const C_SHEET_LIST_FORMAT: &str = "List Format";
/// Sheet holding the flat sample order.
pub const C_SHEET_FLAT_LIST: &str = "Flat List";
/// Sheet holding the 16-row block view.
pub const C_SHEET_BLOCKS: &str = "16 Row Blocks";
/// Prefix of the 8x12 matrix sheets (`Matrix 1`, `Matrix 2`, ...).
pub const C_SHEET_MATRIX_PREFIX: &str = "Matrix";
