use platekit_mapping::{
    MappingError, SpecBenchlingTemplate, SpecListTable, SpecMappingInputs, parse_sample_token,
    parse_timepoint_line, run_mapping_pipeline,
};
use platekit_scheme::workbook::derive_list_dataframe;
use platekit_scheme::{EnumPlateFormat, SpecSchemeOptions, create_sampling_scheme, export_scheme_views};
use pretty_assertions::assert_eq;

const C_REGISTRY: &str = "Reactor/Plate/Flask Number,Entity,Base Medium\nR05,CL-5,M-5\n";

fn create_list_table() -> SpecListTable {
    let scheme = create_sampling_scheme(&SpecSchemeOptions {
        plate_format: EnumPlateFormat::Wells24,
        num_reactors: 2,
        num_samples: 3,
        starting_reactor: 5,
        include_end_batch: false,
    })
    .unwrap();
    let views = export_scheme_views(&scheme);
    SpecListTable::from_dataframe(&derive_list_dataframe(&views.list).unwrap()).unwrap()
}

#[test]
fn sample_tokens_and_log_lines_decode() {
    assert_eq!(
        parse_sample_token("R5S3").unwrap(),
        ("R05".to_string(), "S03".to_string())
    );
    assert_eq!(
        parse_sample_token("R12S7").unwrap(),
        ("R12".to_string(), "S07".to_string())
    );

    let record = parse_timepoint_line(r#"Bioreactor 3","48h,"Sample 5.00 mL taken 2/A1"#)
        .unwrap()
        .unwrap();
    assert_eq!(record.reactor, "R03");
    assert_eq!(record.time_value, Some(48.0));
    assert_eq!(record.well_row_number, Some(1));
    assert_eq!(record.volume, "5.00");
}

#[test]
fn scheme_list_sheet_maps_to_log_records() {
    let list_table = create_list_table();
    let c_log = [
        r#"t0,"Bioreactor 5","0h,"Sample 5.00 mL to 11/A1"#,
        r#"t0,"Bioreactor 6","0h,"Sample 2.00 mL to 11/A2"#,
        r#"t1,"Bioreactor 5","24h,"Sample 5.00 mL to 11/A3"#,
        "pump calibration done",
    ]
    .join("\n");
    let template = SpecBenchlingTemplate::default();

    let output = run_mapping_pipeline(SpecMappingInputs {
        list_table: &list_table,
        plate_format: EnumPlateFormat::Wells24,
        timepoints_log: c_log.as_bytes(),
        registry_csv: C_REGISTRY.as_bytes(),
        template: &template,
    })
    .unwrap();

    assert!(output.assignments.errors.is_empty());
    assert_eq!(output.assignments.rows.len(), 24);
    assert_eq!(output.timepoints.records.len(), 2);
    assert_eq!(output.timepoints.cnt_excluded_volume, 1);
    assert_eq!(output.timepoints.cnt_skipped, 1);

    assert_eq!(output.merged.len(), 24);
    assert!(output.merged[..18].iter().all(|row| row.assignment.reactor == "Empty"));
    let l_tail: Vec<(&str, &str, Option<f64>)> = output.merged[18..]
        .iter()
        .map(|row| {
            (
                row.assignment.reactor.as_str(),
                row.assignment.destination_well.as_str(),
                row.time_value(),
            )
        })
        .collect();
    assert_eq!(
        l_tail,
        vec![
            ("R05", "A1", Some(0.0)),
            ("R05", "A3", Some(24.0)),
            ("R05", "A5", None),
            ("R06", "A2", None),
            ("R06", "A4", None),
            ("R06", "A6", None),
        ]
    );
    let record = output.merged[18].timepoint.as_ref().unwrap();
    assert_eq!(record.entity.as_deref(), Some("CL-5"));
    assert_eq!(record.medium.as_deref(), Some("M-5"));
    assert_eq!(output.merged[18].assignment.timepoint_index, "S00");
    assert!(output.workbook.starts_with(b"PK"));
}

#[test]
fn registry_without_required_column_fails_the_run() {
    let list_table = create_list_table();
    let template = SpecBenchlingTemplate::default();
    let err = run_mapping_pipeline(SpecMappingInputs {
        list_table: &list_table,
        plate_format: EnumPlateFormat::Wells24,
        timepoints_log: b"",
        registry_csv: b"Entity,Base Medium\nx,y\n",
        template: &template,
    })
    .unwrap_err();
    assert!(matches!(err, MappingError::MissingRegistryColumn(_)));
}

#[test]
fn template_overrides_deserialize_over_defaults() {
    let template: SpecBenchlingTemplate =
        serde_json::from_str(r#"{"project_prefix": "ABC_PD_042_AMBR", "plate_number": "21"}"#)
            .unwrap();
    assert_eq!(template.project_prefix, "ABC_PD_042_AMBR");
    assert_eq!(template.plate_number, "21");
    assert_eq!(template.plate_name_label, "Plate name benchling");
    assert_eq!(template.replicate, 1);
}
