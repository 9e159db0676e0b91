//! End-to-end mapping run: list sheet + log + registry -> workbook.

use platekit_scheme::EnumPlateFormat;

use crate::assignment::{SpecListTable, expand_plate_assignments};
use crate::merge::merge_assignments_with_timepoints;
use crate::spec::{
    MappingError, ReportPlateAssignment, ReportTimepoints, SpecBenchlingTemplate, SpecLookupTable,
    SpecMergedRow,
};
use crate::timepoints::{decode_text_lossy, parse_timepoints};
use crate::workbook::build_mapping_workbook;

/// Inputs of one mapping run.
#[derive(Debug, Clone, Copy)]
pub struct SpecMappingInputs<'a> {
    /// `List Format` sheet of the sampling-scheme workbook.
    pub list_table: &'a SpecListTable,
    /// Plate format the scheme was filled with.
    pub plate_format: EnumPlateFormat,
    /// Raw timepoint log.
    pub timepoints_log: &'a [u8],
    /// Raw registry export (CSV).
    pub registry_csv: &'a [u8],
    /// Benchling template texts.
    pub template: &'a SpecBenchlingTemplate,
}

/// Outputs of one mapping run.
#[derive(Debug, Clone)]
pub struct SpecMappingOutput {
    /// Re-expansion report, including row-level failures.
    pub assignments: ReportPlateAssignment,
    /// Log parsing report.
    pub timepoints: ReportTimepoints,
    /// Sorted merged table (the `overview` sheet).
    pub merged: Vec<SpecMergedRow>,
    /// Workbook bytes.
    pub workbook: Vec<u8>,
}

/// Re-expand, parse, merge and serialize.
pub fn run_mapping_pipeline(inputs: SpecMappingInputs<'_>) -> Result<SpecMappingOutput, MappingError> {
    let assignments = expand_plate_assignments(inputs.list_table, inputs.plate_format);
    let lookup = SpecLookupTable::from_csv_bytes(inputs.registry_csv)?;
    let timepoints = parse_timepoints(&decode_text_lossy(inputs.timepoints_log), &lookup)?;
    let merged = merge_assignments_with_timepoints(&assignments.rows, &timepoints.records);
    let workbook = build_mapping_workbook(&merged, inputs.template)?;

    tracing::info!("{assignments}");
    tracing::info!("{timepoints}");
    Ok(SpecMappingOutput {
        assignments,
        timepoints,
        merged,
        workbook,
    })
}
