//! Registry export (CSV) to reactor lookup table.

use std::io::Read;

use serde::Deserialize;

use crate::conf::{C_REGISTRY_COL_ENTITY, C_REGISTRY_COL_ID, C_REGISTRY_COL_MEDIUM};
use crate::spec::{MappingError, SpecLookupTable};

#[derive(Debug, Deserialize)]
struct SpecRegistryRecord {
    #[serde(rename = "Reactor/Plate/Flask Number")]
    id: Option<String>,
    #[serde(rename = "Entity")]
    entity: Option<String>,
    #[serde(rename = "Base Medium")]
    medium: Option<String>,
}

impl SpecLookupTable {
    /// Read a registry export with at least the columns
    /// `Reactor/Plate/Flask Number`, `Entity` and `Base Medium`.
    ///
    /// Other columns are ignored. Rows without an id are skipped, empty
    /// attribute cells are left out, and a repeated id keeps its last row.
    pub fn from_csv_reader(reader: impl Read) -> Result<Self, MappingError> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = rdr.headers()?.clone();
        for c_required in [C_REGISTRY_COL_ID, C_REGISTRY_COL_ENTITY, C_REGISTRY_COL_MEDIUM] {
            if !headers.iter().any(|h| h == c_required) {
                return Err(MappingError::MissingRegistryColumn(c_required.to_string()));
            }
        }

        let mut lookup = Self::default();
        let mut n_rows = 0usize;
        for result in rdr.deserialize::<SpecRegistryRecord>() {
            let record = result?;
            n_rows += 1;
            let Some(id) = record.id else {
                continue;
            };
            match record.entity {
                Some(entity) => lookup.entity_by_id.insert(id.clone(), entity),
                None => lookup.entity_by_id.remove(&id),
            };
            match record.medium {
                Some(medium) => lookup.medium_by_id.insert(id, medium),
                None => lookup.medium_by_id.remove(&id),
            };
        }

        tracing::debug!(
            n_rows,
            n_entities = lookup.entity_by_id.len(),
            n_media = lookup.medium_by_id.len(),
            "registry loaded"
        );
        Ok(lookup)
    }

    /// [`Self::from_csv_reader`] over an in-memory upload.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, MappingError> {
        Self::from_csv_reader(bytes)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_from_csv_bytes_builds_both_maps() {
        let c_csv = "Name,Reactor/Plate/Flask Number,Entity,Base Medium\n\
                     a,R01,CL-1,CD-CHO\n\
                     b,R02,CL-2,\n\
                     c,,CL-9,X\n";
        let lookup = SpecLookupTable::from_csv_bytes(c_csv.as_bytes()).unwrap();

        assert_eq!(lookup.entity_by_id.len(), 2);
        assert_eq!(lookup.entity_by_id["R02"], "CL-2");
        assert_eq!(lookup.medium_by_id.len(), 1);
        assert_eq!(lookup.medium_by_id["R01"], "CD-CHO");
    }

    #[test]
    fn test_repeated_id_keeps_last_row() {
        let c_csv = "Reactor/Plate/Flask Number,Entity,Base Medium\n\
                     R01,old,M1\n\
                     R01,new,\n";
        let lookup = SpecLookupTable::from_csv_bytes(c_csv.as_bytes()).unwrap();
        assert_eq!(lookup.entity_by_id["R01"], "new");
        assert!(!lookup.medium_by_id.contains_key("R01"));
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let err = SpecLookupTable::from_csv_bytes(b"Reactor/Plate/Flask Number,Entity\nR01,x\n")
            .unwrap_err();
        assert!(matches!(err, MappingError::MissingRegistryColumn(ref col) if col == "Base Medium"));
    }

    #[test]
    fn test_header_only_gives_empty_table() {
        let lookup =
            SpecLookupTable::from_csv_bytes(b"Reactor/Plate/Flask Number,Entity,Base Medium\n")
                .unwrap();
        assert_eq!(lookup, SpecLookupTable::default());
    }
}
