//! Load project parameters from JSON and unit schedules from CSV

use super::{Development, ProjectParameters, Unit};
use crate::error::LoadError;
use csv::Reader;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Raw CSV row matching the unit schedule columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    label: String,
    size: f64,
    rate: f64,
    #[serde(default)]
    contingency: f64,
    start: u32,
    duration: u32,
    sale: f64,
}

impl CsvRow {
    fn into_unit(self) -> Unit {
        Unit {
            label: self.label,
            size: self.size,
            rate: self.rate,
            contingency: self.contingency,
            start_month: self.start,
            duration: self.duration,
            sale_price: self.sale,
        }
    }
}

/// Load and validate project parameters from a JSON file
pub fn load_parameters<P: AsRef<Path>>(path: P) -> Result<ProjectParameters, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_parameters(&text)
}

/// Parse and validate project parameters from JSON text
pub fn parse_parameters(text: &str) -> Result<ProjectParameters, LoadError> {
    let params: ProjectParameters = serde_json::from_str(text)?;
    params.validate()?;
    log::debug!("Loaded parameters for {}", params.display_name());
    Ok(params)
}

/// Load a unit schedule from a CSV file
pub fn load_units<P: AsRef<Path>>(path: P) -> Result<Vec<Unit>, LoadError> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_units_from_reader(file)
}

/// Load a unit schedule from any reader (file, bytes, etc.)
pub fn load_units_from_reader<R: Read>(reader: R) -> Result<Vec<Unit>, LoadError> {
    let mut reader = Reader::from_reader(reader);
    let mut units = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        units.push(row.into_unit());
    }

    log::debug!("Loaded {} units", units.len());
    Ok(units)
}

/// Replace the development program with a unit schedule and re-validate
pub fn with_units(mut params: ProjectParameters, units: Vec<Unit>) -> Result<ProjectParameters, LoadError> {
    params.development = Development::Units(units);
    params.validate()?;
    Ok(params)
}
