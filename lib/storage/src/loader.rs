// Dataset loading: CSV rows → PropertyRecord
use std::io::Read;
use std::path::Path;

use ahash::AHashSet;
use homex_core::{Error, PropertyRecord, Result};
use tracing::{debug, warn};

pub const COL_NAME: &str = "PropertyName";
pub const COL_SUB_NAME: &str = "PropertySubName";
pub const COL_NEARBY: &str = "NearbyLocations";
pub const COL_FACILITIES: &str = "TopFacilities";
pub const COL_PRICE_DETAILS: &str = "PriceDetails";
pub const COL_LOCATION_ADVANTAGES: &str = "LocationAdvantages";

pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_NAME,
    COL_SUB_NAME,
    COL_NEARBY,
    COL_FACILITIES,
    COL_PRICE_DETAILS,
    COL_LOCATION_ADVANTAGES,
];

/// Data row (0-based, header excluded) known to be malformed in the shipped dataset
pub const MALFORMED_ROW: usize = 22;

/// Load the catalog from a CSV file
pub fn load_records<P: AsRef<Path>>(path: P, drop_row: Option<usize>) -> Result<Vec<PropertyRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    debug!(path = %path.display(), "loading dataset");
    read_records(file, drop_row)
}

/// Read catalog rows from any CSV source.
///
/// `drop_row` is removed first. Rows with an empty or repeated property name
/// are skipped (first occurrence wins). An empty result is a build
/// precondition failure.
pub fn read_records<R: Read>(source: R, drop_row: Option<usize>) -> Result<Vec<PropertyRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| Error::Csv(format!("Failed to read headers: {}", e)))?
        .clone();

    let mut positions = [0usize; 6];
    for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| {
                Error::Csv(format!(
                    "missing column {}; available columns: {:?}",
                    column,
                    headers.iter().collect::<Vec<_>>()
                ))
            })?;
    }

    let mut records = Vec::new();
    let mut seen: AHashSet<String> = AHashSet::new();

    for (row, result) in reader.records().enumerate() {
        let line = result.map_err(|e| Error::Csv(format!("row {}: {}", row, e)))?;

        if Some(row) == drop_row {
            debug!(row, "dropping known malformed row");
            continue;
        }

        let field = |i: usize| line.get(positions[i]).unwrap_or("").to_string();
        let name = field(0).trim().to_string();

        if name.is_empty() {
            warn!(row, "skipping row without a property name");
            continue;
        }
        if !seen.insert(name.clone()) {
            warn!(row, property = %name, "skipping duplicate property name");
            continue;
        }

        records.push(PropertyRecord {
            name,
            sub_name: field(1),
            nearby_locations: field(2),
            top_facilities: field(3),
            price_details: field(4),
            location_advantages: field(5),
        });
    }

    if records.is_empty() {
        return Err(Error::BuildPrecondition(
            "dataset has zero usable rows".to_string(),
        ));
    }

    debug!(rows = records.len(), "dataset loaded");
    Ok(records)
}
