//! Timepoint log parsing.
//!
//! A sampling record looks like
//!
//! ```text
//! ... Bioreactor 3","48h,"Sample 5.00 mL taken from vessel into 2/A1
//! ```
//!
//! and is matched anywhere in a line by [`C_LOG_RECORD_PATTERN`]. The
//! trailing `plate/well` pair is the last one on the line.

use std::collections::BTreeSet;

use platekit_scheme::derive_well_row_number;
use regex::Regex;

use crate::conf::{C_LOG_RECORD_PATTERN, C_VOLUME_EXCLUDED};
use crate::spec::{MappingError, ReportTimepoints, SpecLookupTable, SpecTimepointRecord};
use crate::util::{derive_reactor_id, is_line_separator};

/// Decode log bytes as UTF-8, dropping invalid sequences.
pub fn decode_text_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

/// Hours from a timepoint token; every `h` is stripped first (`48h` -> 48).
///
/// NaN and unparseable tokens give `None`.
pub fn parse_time_value(timepoint: &str) -> Option<f64> {
    timepoint
        .replace('h', "")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|val| !val.is_nan())
}

/// Compiled sampling-record matcher.
#[derive(Debug, Clone)]
pub struct TimepointLogParser {
    regex: Regex,
}

impl TimepointLogParser {
    /// Compile [`C_LOG_RECORD_PATTERN`].
    pub fn new() -> Result<Self, MappingError> {
        Self::with_pattern(C_LOG_RECORD_PATTERN)
    }

    /// Compile a custom record pattern with the same five capture groups:
    /// reactor, timepoint, volume, plate, well.
    pub fn with_pattern(pattern: &str) -> Result<Self, MappingError> {
        let regex = Regex::new(pattern).map_err(|e| {
            MappingError::InvalidPattern(format!("Invalid timepoint log pattern: {e}"))
        })?;
        if regex.captures_len() != 6 {
            return Err(MappingError::InvalidPattern(format!(
                "Timepoint log pattern needs 5 capture groups, got {}.",
                regex.captures_len() - 1
            )));
        }
        Ok(Self { regex })
    }

    /// Extract one sampling record from a log line.
    ///
    /// Registry attributes are left unset.
    pub fn parse_line(&self, line: &str) -> Option<SpecTimepointRecord> {
        let caps = self.regex.captures(line)?;
        let timepoint_raw = caps.get(2)?.as_str();
        let destination_well = caps.get(5)?.as_str();
        Some(SpecTimepointRecord {
            reactor: derive_reactor_id(caps.get(1)?.as_str()),
            timepoint_raw: timepoint_raw.to_string(),
            time_value: parse_time_value(timepoint_raw),
            volume: caps.get(3)?.as_str().to_string(),
            plate: caps.get(4)?.as_str().to_string(),
            destination_well: destination_well.to_string(),
            well_row_number: destination_well.chars().next().and_then(derive_well_row_number),
            entity: None,
            medium: None,
        })
    }

    /// Parse every sampling record of a log and enrich it from the registry.
    ///
    /// Records logged with volume `2.00` are dropped.
    pub fn parse_text(&self, text: &str, lookup: &SpecLookupTable) -> ReportTimepoints {
        let mut report = ReportTimepoints::default();
        let mut set_unknown_reactors = BTreeSet::new();

        for line in text.split(is_line_separator).filter(|line| !line.is_empty()) {
            report.cnt_lines += 1;
            let Some(mut record) = self.parse_line(line) else {
                report.cnt_skipped += 1;
                continue;
            };
            if record.volume == C_VOLUME_EXCLUDED {
                report.cnt_excluded_volume += 1;
                continue;
            }
            record.entity = lookup.entity_by_id.get(&record.reactor).cloned();
            record.medium = lookup.medium_by_id.get(&record.reactor).cloned();
            if record.entity.is_none() && record.medium.is_none() {
                set_unknown_reactors.insert(record.reactor.clone());
            }
            report.records.push(record);
        }

        if report.records.is_empty() {
            report
                .warnings
                .push("Timepoint log contains no sampling records.".to_string());
        }
        for reactor in set_unknown_reactors {
            report
                .warnings
                .push(format!("Reactor {reactor} is not listed in the registry."));
        }
        for c_msg in &report.warnings {
            tracing::warn!("{c_msg}");
        }
        tracing::debug!("{report}");
        report
    }
}

/// [`TimepointLogParser::parse_line`] with the default pattern.
pub fn parse_timepoint_line(line: &str) -> Result<Option<SpecTimepointRecord>, MappingError> {
    Ok(TimepointLogParser::new()?.parse_line(line))
}

/// [`TimepointLogParser::parse_text`] with the default pattern.
pub fn parse_timepoints(
    text: &str,
    lookup: &SpecLookupTable,
) -> Result<ReportTimepoints, MappingError> {
    Ok(TimepointLogParser::new()?.parse_text(text, lookup))
}
