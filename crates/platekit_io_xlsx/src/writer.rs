//! XLSX writer kernel that converts DataFrames into an in-memory workbook.

use std::collections::BTreeSet;

use polars::prelude::{AnyValue, DataFrame};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::conf::N_LEN_EXCEL_SHEET_NAME_MAX;
use crate::spec::{
    EnumAutofitColumnsRule, EnumCellValue, EnumSheetCellValue, SpecAutofitCellsPolicy,
    SpecCellFormat, SpecSheetCell, SpecSheetSummary, SpecXlsxFormats, SpecXlsxReport,
    SpecXlsxWriteOptions, XlsxWriteError,
};
use crate::util::{
    cast_col_num, cast_row_num, convert_cell_value, derive_column_letters, parse_cell_ref,
    sanitize_sheet_name, select_sorted_indices_from_refs, validate_sheet_size,
    validate_unique_columns,
};

/// Per-sheet call options.
#[derive(Default, Debug, Clone)]
pub struct SpecXlsxSheetWriteOptions {
    /// Columns (by name or index-string) written with Excel text format.
    pub cols_text: Option<Vec<String>>,
    /// Number of frozen columns; the header row is always frozen.
    pub col_freeze: usize,
    /// Column autofit policy.
    pub policy_autofit: SpecAutofitCellsPolicy,
}

/// Inputs for [`plan_column_formats`].
pub struct SpecColumnFormatPlanOptions<'a> {
    /// Number of columns in the sheet.
    pub width_data: usize,
    /// Numeric column indices.
    pub cols_idx_numeric: &'a [usize],
    /// Integer column indices.
    pub cols_idx_integer: &'a [usize],
    /// Forced-text column indices.
    pub cols_idx_text: &'a [usize],
    /// Format presets.
    pub formats: &'a SpecXlsxFormats,
    /// Global write options.
    pub write_options: &'a SpecXlsxWriteOptions,
}

/// Stateful workbook writer.
///
/// The workbook is buffered in memory until [`Self::close`] returns its bytes.
pub struct XlsxWriter {
    workbook: Workbook,
    formats: SpecXlsxFormats,
    write_options: SpecXlsxWriteOptions,
    set_sheet_names_existing: BTreeSet<String>,
    l_reports: Vec<SpecXlsxReport>,
    if_closed: bool,
}

impl XlsxWriter {
    /// Create writer with format/options presets.
    pub fn new(formats: SpecXlsxFormats, write_options: SpecXlsxWriteOptions) -> Self {
        Self {
            workbook: Workbook::new(),
            formats,
            write_options,
            set_sheet_names_existing: BTreeSet::new(),
            l_reports: Vec::new(),
            if_closed: false,
        }
    }

    /// Return immutable snapshot of per-sheet write reports.
    pub fn report(&self) -> Vec<SpecXlsxReport> {
        self.l_reports.clone()
    }

    /// Serialize the workbook. The writer rejects further writes afterwards.
    pub fn close(&mut self) -> Result<Vec<u8>, XlsxWriteError> {
        if self.if_closed {
            return Err(XlsxWriteError::Closed);
        }
        let v_bytes = self.workbook.save_to_buffer()?;
        self.if_closed = true;
        tracing::debug!(
            n_sheets = self.set_sheet_names_existing.len(),
            n_bytes = v_bytes.len(),
            "workbook serialized"
        );
        Ok(v_bytes)
    }

    /// Write one sheet from an in-memory dataframe.
    ///
    /// Returns the unique sheet name actually used in the workbook.
    pub fn write_sheet_from_dataframe(
        &mut self,
        df_data: &DataFrame,
        sheet_name: &str,
        options: &SpecXlsxSheetWriteOptions,
    ) -> Result<String, XlsxWriteError> {
        if self.if_closed {
            return Err(XlsxWriteError::Closed);
        }
        validate_policy_autofit(&options.policy_autofit)?;

        let l_colnames_df: Vec<String> = df_data
            .get_column_names_str()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        validate_unique_columns(&l_colnames_df)?;
        validate_sheet_size(sheet_name, df_data.height(), l_colnames_df.len())?;

        let l_cols_idx_numeric = if self.write_options.infer_numeric_cols {
            derive_numeric_column_indices(df_data)
        } else {
            vec![]
        };
        let l_cols_idx_integer = if self.write_options.infer_integer_cols {
            derive_integer_column_indices(df_data, &l_cols_idx_numeric)
        } else {
            vec![]
        };
        let l_cols_idx_text =
            select_sorted_indices_from_refs(&l_colnames_df, options.cols_text.as_deref())?;

        let l_fmts_by_col = plan_column_formats(SpecColumnFormatPlanOptions {
            width_data: l_colnames_df.len(),
            cols_idx_numeric: &l_cols_idx_numeric,
            cols_idx_integer: &l_cols_idx_integer,
            cols_idx_text: &l_cols_idx_text,
            formats: &self.formats,
            write_options: &self.write_options,
        });
        let l_fmt_data_by_col: Vec<Format> =
            l_fmts_by_col.iter().map(derive_rust_xlsx_format).collect();
        let fmt_header = derive_rust_xlsx_format(&self.formats.header);

        // Forced-text columns are written as strings even when numeric.
        let set_cols_idx_numeric: BTreeSet<usize> = l_cols_idx_numeric
            .iter()
            .copied()
            .filter(|idx| !l_cols_idx_text.contains(idx))
            .collect();

        let sheet_name_unique = self.derive_unique_sheet_name(&sanitize_sheet_name(sheet_name, "_"));
        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(&sheet_name_unique)?;

        let mut l_width_by_col_header = vec![0usize; l_colnames_df.len()];
        let if_autofit_columns = matches!(
            options.policy_autofit.rule_columns,
            EnumAutofitColumnsRule::Header
        );

        for (n_idx_col, c_name) in l_colnames_df.iter().enumerate() {
            worksheet.write_string_with_format(0, cast_col_num(n_idx_col)?, c_name, &fmt_header)?;
            if if_autofit_columns {
                l_width_by_col_header[n_idx_col] = estimate_unicode_string_width(c_name);
            }
        }

        worksheet.set_freeze_panes(1, cast_col_num(options.col_freeze)?)?;

        for (n_idx_col, col) in df_data.get_columns().iter().enumerate() {
            let if_is_numeric_col = set_cols_idx_numeric.contains(&n_idx_col);
            for n_row in 0..df_data.height() {
                let value_raw = derive_cell_value_from_any_value(col.get(n_row)?);
                let value = convert_cell_value(&value_raw, if_is_numeric_col);
                write_cell_with_format(
                    worksheet,
                    n_row + 1,
                    n_idx_col,
                    &value,
                    &l_fmt_data_by_col[n_idx_col],
                )?;
            }
        }

        if if_autofit_columns {
            let n_min = usize::max(1, options.policy_autofit.width_cell_min);
            let n_max = usize::min(
                255,
                usize::max(n_min, options.policy_autofit.width_cell_max),
            );
            let n_pad = options.policy_autofit.width_cell_padding;

            for (n_idx_col, n_width_header) in l_width_by_col_header.iter().enumerate() {
                let n_width_final = derive_column_width(*n_width_header, n_min, n_max, n_pad);
                worksheet.set_column_width(cast_col_num(n_idx_col)?, n_width_final as f64)?;
            }
        }

        let mut report = SpecXlsxReport::default();
        if df_data.height() == 0 {
            report.warn(format!("Sheet {sheet_name_unique:?} has no body rows."));
        }
        if sheet_name_unique != sheet_name {
            report.warn(format!(
                "Sheet name {sheet_name:?} written as {sheet_name_unique:?}."
            ));
        }
        report.sheets.push(SpecSheetSummary {
            sheet_name: sheet_name_unique.clone(),
            n_rows: df_data.height(),
            n_cols: l_colnames_df.len(),
        });
        self.l_reports.push(report);

        tracing::debug!(
            sheet = %sheet_name_unique,
            n_rows = df_data.height(),
            n_cols = l_colnames_df.len(),
            "sheet written"
        );
        Ok(sheet_name_unique)
    }

    /// Write free-standing cells (template text, numbers, formulas) onto an
    /// already written sheet.
    pub fn write_cells(
        &mut self,
        sheet_name: &str,
        cells: &[SpecSheetCell],
    ) -> Result<(), XlsxWriteError> {
        let worksheet = self.derive_worksheet(sheet_name)?;
        for cell in cells {
            let (n_row, n_col) = parse_cell_ref(&cell.cell_ref)?;
            match &cell.value {
                EnumSheetCellValue::String(val) => {
                    worksheet.write_string(n_row, n_col, val)?;
                }
                EnumSheetCellValue::Number(val) => {
                    worksheet.write_number(n_row, n_col, *val)?;
                }
                EnumSheetCellValue::Formula(val) => {
                    worksheet.write_formula(n_row, n_col, val.as_str())?;
                }
            }
        }
        Ok(())
    }

    /// Apply Excel text format (`@`) to whole columns of a written sheet.
    pub fn set_columns_text_format(
        &mut self,
        sheet_name: &str,
        cols_idx: &[usize],
    ) -> Result<(), XlsxWriteError> {
        let fmt_text = derive_rust_xlsx_format(&self.formats.text_forced);
        let worksheet = self.derive_worksheet(sheet_name)?;
        for n_idx_col in cols_idx {
            worksheet.set_column_format(cast_col_num(*n_idx_col)?, &fmt_text)?;
        }
        tracing::debug!(
            sheet = %sheet_name,
            cols = ?cols_idx.iter().map(|idx| derive_column_letters(*idx)).collect::<Vec<_>>(),
            "text format applied"
        );
        Ok(())
    }

    fn derive_worksheet(&mut self, sheet_name: &str) -> Result<&mut Worksheet, XlsxWriteError> {
        if self.if_closed {
            return Err(XlsxWriteError::Closed);
        }
        if !self.set_sheet_names_existing.contains(sheet_name) {
            return Err(XlsxWriteError::SheetNotFound(sheet_name.to_string()));
        }
        Ok(self.workbook.worksheet_from_name(sheet_name)?)
    }

    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        if !self.set_sheet_names_existing.contains(name) {
            self.set_sheet_names_existing.insert(name.to_string());
            return name.to_string();
        }

        let base_name: String = name
            .chars()
            .take(usize::max(1, N_LEN_EXCEL_SHEET_NAME_MAX - 3))
            .collect();

        let mut n_idx = 2usize;
        loop {
            let candidate: String = format!("{base_name}__{n_idx}")
                .chars()
                .take(N_LEN_EXCEL_SHEET_NAME_MAX)
                .collect();
            if !self.set_sheet_names_existing.contains(&candidate) {
                self.set_sheet_names_existing.insert(candidate.clone());
                return candidate;
            }
            n_idx += 1;
        }
    }
}

/// Clamp a header width plus padding into `[n_min, n_max]`.
fn derive_column_width(n_width_header: usize, n_min: usize, n_max: usize, n_pad: usize) -> usize {
    usize::min(n_max, usize::max(n_min, n_width_header + n_pad))
}

fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

/// Build per-column final formats.
pub fn plan_column_formats(options: SpecColumnFormatPlanOptions<'_>) -> Vec<SpecCellFormat> {
    let SpecColumnFormatPlanOptions {
        width_data,
        cols_idx_numeric,
        cols_idx_integer,
        cols_idx_text,
        formats,
        write_options,
    } = options;

    (0..width_data)
        .map(|col_idx| {
            let fmt_base = if cols_idx_text.contains(&col_idx) {
                &formats.text_forced
            } else if cols_idx_integer.contains(&col_idx) {
                &formats.integer
            } else if cols_idx_numeric.contains(&col_idx) {
                &formats.decimal
            } else {
                &formats.text
            };
            fmt_base.merge(&write_options.base_format_patch)
        })
        .collect()
}

fn validate_policy_autofit(policy_autofit: &SpecAutofitCellsPolicy) -> Result<(), XlsxWriteError> {
    if policy_autofit.width_cell_min == 0 {
        return Err(XlsxWriteError::InvalidAutofitPolicy(
            "policy_autofit.width_cell_min must be >= 1.".to_string(),
        ));
    }
    if policy_autofit.width_cell_max < policy_autofit.width_cell_min {
        return Err(XlsxWriteError::InvalidAutofitPolicy(
            "policy_autofit.width_cell_max must be >= policy_autofit.width_cell_min.".to_string(),
        ));
    }
    Ok(())
}

fn derive_numeric_column_indices(df: &DataFrame) -> Vec<usize> {
    df.get_columns()
        .iter()
        .enumerate()
        .filter(|(_, c_col)| c_col.dtype().is_numeric())
        .map(|(n_idx, _)| n_idx)
        .collect()
}

fn derive_integer_column_indices(df: &DataFrame, cols_idx_numeric: &[usize]) -> Vec<usize> {
    cols_idx_numeric
        .iter()
        .copied()
        .filter(|n_idx| df.get_columns()[*n_idx].dtype().is_integer())
        .collect()
}

/// Map one polars value onto the writer's cell model.
pub fn derive_cell_value_from_any_value(value: AnyValue<'_>) -> EnumCellValue {
    match value {
        AnyValue::Null => EnumCellValue::None,
        AnyValue::String(val) => EnumCellValue::String(val.to_string()),
        AnyValue::StringOwned(val) => EnumCellValue::String(val.to_string()),
        AnyValue::Boolean(val) => {
            EnumCellValue::String(if val { "True" } else { "False" }.to_string())
        }
        AnyValue::UInt32(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float64(val) => EnumCellValue::Number(val),
        _ => EnumCellValue::String(value.to_string()),
    }
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), XlsxWriteError> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    match value {
        EnumCellValue::None => {
            worksheet.write_blank(n_row, n_col, format)?;
        }
        EnumCellValue::String(val) => {
            worksheet.write_string_with_format(n_row, n_col, val, format)?;
        }
        EnumCellValue::Number(val) => {
            worksheet.write_number_with_format(n_row, n_col, *val, format)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}
