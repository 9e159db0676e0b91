use platekit_scheme::{
    EnumPlateFormat, EnumWellContent, SampleLabel, SchemeError, SpecSchemeOptions,
    build_scheme_workbook, create_sampling_scheme, derive_flat_from_matrices, export_scheme_views,
};
use pretty_assertions::assert_eq;

#[test]
fn scheme_flat_view_matches_generation_order() {
    let options = SpecSchemeOptions {
        plate_format: EnumPlateFormat::Wells96,
        num_reactors: 24,
        num_samples: 10,
        starting_reactor: 3,
        include_end_batch: true,
    };
    let scheme = create_sampling_scheme(&options).unwrap();
    let views = export_scheme_views(&scheme);

    let mut expected: Vec<SampleLabel> = (3..27).map(SampleLabel::end_batch).collect();
    for sample_index in 0..10 {
        expected.extend((3..27).map(|reactor_id| SampleLabel::numbered(reactor_id, sample_index)));
    }

    assert_eq!(views.flat, expected);
    assert_eq!(scheme.plates.len(), 3);
    assert_eq!(views.matrices.len(), 3);
    assert_eq!(derive_flat_from_matrices(&views.matrices), views.flat);

    let n_padding = scheme.plates[2]
        .1
        .wells
        .iter()
        .filter(|w| **w == EnumWellContent::Empty)
        .count();
    assert_eq!(n_padding, 3 * 96 - 264);

    let v_bytes = build_scheme_workbook(&views).unwrap();
    assert!(v_bytes.starts_with(b"PK"));
}

#[test]
fn scheme_options_deserialize_from_json() {
    let options: SpecSchemeOptions = serde_json::from_str(
        r#"{"plate_format": 24, "num_reactors": 2, "num_samples": 1, "include_end_batch": false}"#,
    )
    .unwrap();
    assert_eq!(options.plate_format, EnumPlateFormat::Wells24);
    assert_eq!(options.starting_reactor, 1);

    let scheme = create_sampling_scheme(&options).unwrap();
    let l_tokens: Vec<String> = scheme.plates[0].1.wells.iter().map(ToString::to_string).collect();
    assert_eq!(&l_tokens[..3], ["R1S0", "R2S0", "Empty"]);
    assert_eq!(l_tokens.len(), 24);
}

#[test]
fn scheme_options_reject_unsupported_capacity() {
    let err = serde_json::from_str::<SpecSchemeOptions>(r#"{"plate_format": 48}"#).unwrap_err();
    assert!(err.to_string().contains("Unsupported plate size 48"));
    assert!(matches!(
        EnumPlateFormat::try_from(384),
        Err(SchemeError::UnsupportedPlateCapacity(384))
    ));
}
