//! Sampling-scheme models, options and errors.

use std::fmt;

use platekit_io_xlsx::XlsxWriteError;
use polars::prelude::PolarsError;
use serde::Deserialize;
use thiserror::Error;

use crate::conf::{C_EMPTY_WELL, N_END_BATCH_SAMPLE_INDEX};

////////////////////////////////////////////////////////////////////////////////
// #region PlateFormat

/// Supported microplate formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "usize")]
pub enum EnumPlateFormat {
    /// 4 x 6 wells.
    Wells24,
    /// 8 x 12 wells.
    #[default]
    Wells96,
}

impl EnumPlateFormat {
    /// Wells per plate.
    pub fn capacity(self) -> usize {
        match self {
            Self::Wells24 => 24,
            Self::Wells96 => 96,
        }
    }

    /// Wells per plate row.
    pub fn columns(self) -> usize {
        match self {
            Self::Wells24 => 6,
            Self::Wells96 => 12,
        }
    }

    /// Plate rows.
    pub fn rows(self) -> usize {
        self.capacity() / self.columns()
    }
}

impl TryFrom<usize> for EnumPlateFormat {
    type Error = SchemeError;

    fn try_from(capacity: usize) -> Result<Self, Self::Error> {
        match capacity {
            24 => Ok(Self::Wells24),
            96 => Ok(Self::Wells96),
            _ => Err(SchemeError::UnsupportedPlateCapacity(capacity)),
        }
    }
}

impl fmt::Display for EnumPlateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} well plate", self.capacity())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Samples

/// Position of a sample within its reactor's sampling sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnumSampleIndex {
    /// Regular sample, 0-based.
    Numbered(u32),
    /// Final sample taken at the end of the batch.
    EndBatch,
}

impl EnumSampleIndex {
    /// Index as written into sample tokens.
    pub fn rendered_index(self) -> u32 {
        match self {
            Self::Numbered(idx) => idx,
            Self::EndBatch => N_END_BATCH_SAMPLE_INDEX,
        }
    }
}

/// One sample drawn from one reactor, rendered as `R<reactor>S<index>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleLabel {
    /// Reactor number, >= 1.
    pub reactor_id: u32,
    /// Sample position.
    pub sample: EnumSampleIndex,
}

impl SampleLabel {
    /// Regular sample.
    pub fn numbered(reactor_id: u32, sample_index: u32) -> Self {
        Self {
            reactor_id,
            sample: EnumSampleIndex::Numbered(sample_index),
        }
    }

    /// End-of-batch sample.
    pub fn end_batch(reactor_id: u32) -> Self {
        Self {
            reactor_id,
            sample: EnumSampleIndex::EndBatch,
        }
    }
}

impl fmt::Display for SampleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}S{}", self.reactor_id, self.sample.rendered_index())
    }
}

/// Content of one well slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumWellContent {
    /// Slot holds a sample.
    Filled(SampleLabel),
    /// Padding slot on the last plate.
    Empty,
}

impl EnumWellContent {
    /// Sample in this slot, if any.
    pub fn sample(&self) -> Option<&SampleLabel> {
        match self {
            Self::Filled(label) => Some(label),
            Self::Empty => None,
        }
    }
}

impl fmt::Display for EnumWellContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filled(label) => write!(f, "{label}"),
            Self::Empty => f.write_str(C_EMPTY_WELL),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Scheme

/// One plate; slots in row-major fill order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecPlate {
    /// Exactly `capacity` slots once the plate is closed.
    pub wells: Vec<EnumWellContent>,
}

impl SpecPlate {
    /// Filled slots in fill order.
    pub fn samples(&self) -> impl Iterator<Item = &SampleLabel> {
        self.wells.iter().filter_map(EnumWellContent::sample)
    }
}

/// Completed plate sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecScheme {
    /// Plate format every plate was filled with.
    pub plate_format: EnumPlateFormat,
    /// `(plate_number, plate)` with plate numbers starting at 1.
    pub plates: Vec<(usize, SpecPlate)>,
    /// Non-fatal warnings raised while building.
    pub warnings: Vec<String>,
}

impl SpecScheme {
    /// Number of filled slots across all plates.
    pub fn sample_count(&self) -> usize {
        self.plates.iter().map(|(_, plate)| plate.samples().count()).sum()
    }
}

/// Inputs of [`crate::builder::create_sampling_scheme`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpecSchemeOptions {
    /// Plate format to fill.
    pub plate_format: EnumPlateFormat,
    /// Reactors sampled, >= 1.
    pub num_reactors: u32,
    /// Samples per reactor, >= 1.
    pub num_samples: u32,
    /// First reactor number, >= 1.
    pub starting_reactor: u32,
    /// Place one end-of-batch sample per reactor before the regular samples.
    pub include_end_batch: bool,
}

impl Default for SpecSchemeOptions {
    fn default() -> Self {
        Self {
            plate_format: EnumPlateFormat::Wells96,
            num_reactors: 1,
            num_samples: 1,
            starting_reactor: 1,
            include_end_batch: false,
        }
    }
}

impl SpecSchemeOptions {
    /// Reject configurations the builder cannot fill.
    pub fn validate(&self) -> Result<(), SchemeError> {
        if self.num_reactors == 0 {
            return Err(SchemeError::InvalidNumReactors(self.num_reactors));
        }
        if self.num_samples == 0 {
            return Err(SchemeError::InvalidNumSamples(self.num_samples));
        }
        if self.starting_reactor == 0 {
            return Err(SchemeError::InvalidStartingReactor(self.starting_reactor));
        }
        if self.starting_reactor.checked_add(self.num_reactors).is_none() {
            return Err(SchemeError::ReactorRangeOverflow {
                starting_reactor: self.starting_reactor,
                num_reactors: self.num_reactors,
            });
        }
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Scheme construction/export failures.
#[derive(Debug, Error)]
pub enum SchemeError {
    /// `num_reactors` below 1.
    #[error("Number of reactors must be >= 1, got {0}.")]
    InvalidNumReactors(u32),
    /// `num_samples` below 1.
    #[error("Samples per reactor must be >= 1, got {0}.")]
    InvalidNumSamples(u32),
    /// `starting_reactor` below 1.
    #[error("Starting reactor number must be >= 1, got {0}.")]
    InvalidStartingReactor(u32),
    /// Reactor numbers would overflow.
    #[error("Reactor range overflows: start={starting_reactor} count={num_reactors}.")]
    ReactorRangeOverflow {
        /// Requested first reactor.
        starting_reactor: u32,
        /// Requested reactor count.
        num_reactors: u32,
    },
    /// Plate capacity other than 24 or 96.
    #[error("Unsupported plate size {0}. Choose 24 or 96.")]
    UnsupportedPlateCapacity(usize),
    /// Building a view table failed.
    #[error("Failed to build table: {0}")]
    Polars(#[from] PolarsError),
    /// Writing the workbook failed.
    #[error(transparent)]
    Xlsx(#[from] XlsxWriteError),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
