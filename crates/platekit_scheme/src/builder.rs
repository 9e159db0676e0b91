//! Plate filling for a sampling run.

use crate::conf::N_END_BATCH_SAMPLE_INDEX;
use crate::spec::{
    EnumPlateFormat, EnumWellContent, SampleLabel, SchemeError, SpecPlate, SpecScheme,
    SpecSchemeOptions,
};

#[derive(Debug)]
struct SpecFillContext {
    plate_format: EnumPlateFormat,
    n_plate_counter: usize,
    l_wells_buffer: Vec<EnumWellContent>,
    l_plates_done: Vec<(usize, SpecPlate)>,
}

impl SpecFillContext {
    fn new(plate_format: EnumPlateFormat) -> Self {
        Self {
            plate_format,
            n_plate_counter: 1,
            l_wells_buffer: Vec::with_capacity(plate_format.capacity()),
            l_plates_done: Vec::new(),
        }
    }

    fn push(&mut self, label: SampleLabel) {
        self.l_wells_buffer.push(EnumWellContent::Filled(label));
        if self.l_wells_buffer.len() == self.plate_format.capacity() {
            self.close_plate();
        }
    }

    fn close_plate(&mut self) {
        let wells = std::mem::replace(
            &mut self.l_wells_buffer,
            Vec::with_capacity(self.plate_format.capacity()),
        );
        self.l_plates_done
            .push((self.n_plate_counter, SpecPlate { wells }));
        self.n_plate_counter += 1;
    }

    fn finish(mut self) -> Vec<(usize, SpecPlate)> {
        if !self.l_wells_buffer.is_empty() {
            self.l_wells_buffer
                .resize(self.plate_format.capacity(), EnumWellContent::Empty);
            self.close_plate();
        }
        self.l_plates_done
    }
}

/// Fill plates with the samples of a sampling run.
///
/// Placement order:
/// 1. one end-of-batch sample per reactor (ascending), when enabled;
/// 2. for each sample index ascending, every reactor ascending.
///
/// A plate is closed as soon as it holds `capacity` samples; the last plate
/// is padded with [`EnumWellContent::Empty`].
pub fn create_sampling_scheme(options: &SpecSchemeOptions) -> Result<SpecScheme, SchemeError> {
    options.validate()?;

    let n_reactor_end = options.starting_reactor + options.num_reactors;
    let mut warnings = Vec::new();
    if options.include_end_batch && options.num_samples > N_END_BATCH_SAMPLE_INDEX {
        let c_msg = format!(
            "End-of-batch samples are labelled S{N_END_BATCH_SAMPLE_INDEX} and collide with \
             regular sample S{N_END_BATCH_SAMPLE_INDEX} (num_samples={}).",
            options.num_samples
        );
        tracing::warn!("{c_msg}");
        warnings.push(c_msg);
    }

    let mut ctx = SpecFillContext::new(options.plate_format);
    if options.include_end_batch {
        for reactor_id in options.starting_reactor..n_reactor_end {
            ctx.push(SampleLabel::end_batch(reactor_id));
        }
    }
    for sample_index in 0..options.num_samples {
        for reactor_id in options.starting_reactor..n_reactor_end {
            ctx.push(SampleLabel::numbered(reactor_id, sample_index));
        }
    }

    let plates = ctx.finish();
    tracing::debug!(
        plate_format = %options.plate_format,
        n_plates = plates.len(),
        "sampling scheme built"
    );

    Ok(SpecScheme {
        plate_format: options.plate_format,
        plates,
        warnings,
    })
}

/// Split a plate into display rows of `columns` wells (row-major).
pub fn derive_plate_rows(
    plate: &SpecPlate,
    plate_format: EnumPlateFormat,
) -> Vec<Vec<EnumWellContent>> {
    plate
        .wells
        .chunks(plate_format.columns())
        .map(<[EnumWellContent]>::to_vec)
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn create_options(
        plate_format: EnumPlateFormat,
        num_reactors: u32,
        num_samples: u32,
        include_end_batch: bool,
    ) -> SpecSchemeOptions {
        SpecSchemeOptions {
            plate_format,
            num_reactors,
            num_samples,
            starting_reactor: 1,
            include_end_batch,
        }
    }

    fn derive_tokens(scheme: &SpecScheme) -> Vec<String> {
        scheme
            .plates
            .iter()
            .flat_map(|(_, plate)| plate.wells.iter().map(ToString::to_string))
            .collect()
    }

    #[test]
    fn test_single_partial_plate_is_padded() {
        let scheme =
            create_sampling_scheme(&create_options(EnumPlateFormat::Wells24, 2, 1, false)).unwrap();

        assert_eq!(scheme.plates.len(), 1);
        assert_eq!(scheme.plates[0].0, 1);
        let mut expected = vec!["R1S0".to_string(), "R2S0".to_string()];
        expected.extend(std::iter::repeat_n("Empty".to_string(), 22));
        assert_eq!(derive_tokens(&scheme), expected);
    }

    #[test]
    fn test_end_batch_samples_come_first() {
        let options = SpecSchemeOptions {
            starting_reactor: 5,
            ..create_options(EnumPlateFormat::Wells24, 2, 2, true)
        };
        let scheme = create_sampling_scheme(&options).unwrap();
        assert_eq!(
            &derive_tokens(&scheme)[..6],
            ["R5S81", "R6S81", "R5S0", "R6S0", "R5S1", "R6S1"]
        );
        assert!(scheme.warnings.is_empty());
    }

    #[test]
    fn test_exact_fill_has_no_padding_plate() {
        let scheme =
            create_sampling_scheme(&create_options(EnumPlateFormat::Wells24, 4, 12, false)).unwrap();
        assert_eq!(scheme.plates.len(), 2);
        assert!(
            scheme
                .plates
                .iter()
                .all(|(_, plate)| plate.wells.iter().all(|w| *w != EnumWellContent::Empty))
        );
    }

    #[test]
    fn test_end_batch_overflowing_first_plate_still_closes_plates() {
        let scheme =
            create_sampling_scheme(&create_options(EnumPlateFormat::Wells24, 30, 1, true)).unwrap();
        assert_eq!(scheme.plates.len(), 3);
        assert!(scheme.plates.iter().all(|(_, plate)| plate.wells.len() == 24));
        assert_eq!(scheme.sample_count(), 60);
    }

    #[rstest]
    #[case(EnumPlateFormat::Wells24, 1, 1, false)]
    #[case(EnumPlateFormat::Wells24, 3, 7, true)]
    #[case(EnumPlateFormat::Wells24, 24, 2, true)]
    #[case(EnumPlateFormat::Wells96, 12, 8, false)]
    #[case(EnumPlateFormat::Wells96, 5, 40, true)]
    #[case(EnumPlateFormat::Wells96, 97, 1, false)]
    fn test_plate_sizes_and_sample_count(
        #[case] plate_format: EnumPlateFormat,
        #[case] num_reactors: u32,
        #[case] num_samples: u32,
        #[case] include_end_batch: bool,
    ) {
        let scheme = create_sampling_scheme(&create_options(
            plate_format,
            num_reactors,
            num_samples,
            include_end_batch,
        ))
        .unwrap();

        let n_expected = (num_reactors * num_samples
            + if include_end_batch { num_reactors } else { 0 }) as usize;
        assert_eq!(scheme.sample_count(), n_expected);
        assert_eq!(
            scheme.plates.len(),
            n_expected.div_ceil(plate_format.capacity())
        );

        for (n_idx, (plate_number, plate)) in scheme.plates.iter().enumerate() {
            assert_eq!(*plate_number, n_idx + 1);
            assert_eq!(plate.wells.len(), plate_format.capacity());
            let n_first_empty = plate
                .wells
                .iter()
                .position(|w| *w == EnumWellContent::Empty)
                .unwrap_or(plate.wells.len());
            assert!(plate.wells[n_first_empty..].iter().all(|w| *w == EnumWellContent::Empty));
            if n_idx + 1 < scheme.plates.len() {
                assert_eq!(n_first_empty, plate.wells.len());
            }
        }
    }

    #[test]
    fn test_generation_order_is_sample_major() {
        let scheme =
            create_sampling_scheme(&create_options(EnumPlateFormat::Wells96, 3, 2, false)).unwrap();
        let l_samples: Vec<SampleLabel> = scheme
            .plates
            .iter()
            .flat_map(|(_, plate)| plate.samples().copied().collect::<Vec<_>>())
            .collect();
        assert_eq!(
            l_samples,
            vec![
                SampleLabel::numbered(1, 0),
                SampleLabel::numbered(2, 0),
                SampleLabel::numbered(3, 0),
                SampleLabel::numbered(1, 1),
                SampleLabel::numbered(2, 1),
                SampleLabel::numbered(3, 1),
            ]
        );
    }

    #[test]
    fn test_end_batch_collision_is_warned() {
        let scheme =
            create_sampling_scheme(&create_options(EnumPlateFormat::Wells96, 1, 90, true)).unwrap();
        assert_eq!(scheme.warnings.len(), 1);
        assert!(scheme.warnings[0].contains("S81"));
    }

    #[rstest]
    #[case(create_options(EnumPlateFormat::Wells24, 0, 1, false), "Number of reactors")]
    #[case(create_options(EnumPlateFormat::Wells24, 1, 0, false), "Samples per reactor")]
    #[case(
        SpecSchemeOptions { starting_reactor: 0, ..Default::default() },
        "Starting reactor"
    )]
    #[case(
        SpecSchemeOptions { starting_reactor: u32::MAX, ..Default::default() },
        "overflows"
    )]
    fn test_invalid_configuration_is_rejected(
        #[case] options: SpecSchemeOptions,
        #[case] msg: &str,
    ) {
        let err = create_sampling_scheme(&options).unwrap_err();
        assert!(err.to_string().contains(msg), "{err}");
    }

    #[test]
    fn test_derive_plate_rows_uses_plate_columns() {
        let scheme =
            create_sampling_scheme(&create_options(EnumPlateFormat::Wells24, 7, 1, false)).unwrap();
        let l_rows = derive_plate_rows(&scheme.plates[0].1, EnumPlateFormat::Wells24);
        assert_eq!(l_rows.len(), 4);
        assert!(l_rows.iter().all(|row| row.len() == 6));
        assert_eq!(l_rows[1][0], EnumWellContent::Filled(SampleLabel::numbered(7, 0)));
        assert_eq!(l_rows[1][1], EnumWellContent::Empty);
    }
}
