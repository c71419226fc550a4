//! Extraction of a state vector from a JPL Horizons `format=json` response.
//!
//! The response is a JSON document whose `result` field holds the text ephemeris. The vector
//! table sits between the `$$SOE` and `$$EOE` markers; with `CSV_FORMAT=YES` each row reads
//!
//! ```text
//! JDTDB, Calendar Date (TDB), X, Y, Z, VX, VY, VZ,
//! ```
//!
//! in AU and AU/day. Only the first well-formed row is used.
use std::ops::Range;

use csv::{ReaderBuilder, StringRecord, Trim};
use nalgebra::Vector3;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::{coordinates::CartesianPosition, ephemeris::ParseFailure};

static DATA_SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\$\$SOE(.*?)\$\$EOE").expect("data section regex is valid"));

const POSITION_COLUMNS: Range<usize> = 2..5;
const VELOCITY_COLUMNS: Range<usize> = 5..8;

#[derive(Debug, Deserialize)]
struct HorizonsDocument {
    result: Option<String>,
    error: Option<String>,
}

/// Position (AU) and, when the row carries it, velocity (AU/day) of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position: CartesianPosition,
    pub velocity: Option<Vector3<f64>>,
}

/// Parse a raw Horizons JSON payload.
///
/// Arguments
/// ---------
/// * `payload`: the body of the HTTP response
/// * `body_name`: canonical body name, used in diagnostics only
///
/// Return
/// ------
/// * The first well-formed [`StateVector`] of the data section, or a [`ParseFailure`] when the
///   document is not JSON, has no `result`, reports a provider error, lacks either marker, or
///   holds no numeric row. Nothing is ever made up.
pub fn parse(payload: &str, body_name: &str) -> Result<StateVector, ParseFailure> {
    let document: HorizonsDocument = serde_json::from_str(payload)
        .map_err(|err| ParseFailure::InvalidDocument(err.to_string()))?;

    if let Some(error) = document.error {
        return Err(ParseFailure::ProviderError(error));
    }
    let result = document.result.ok_or(ParseFailure::MissingResult)?;

    parse_vector_table(&result, body_name)
}

/// Parse the text ephemeris held in the `result` field of a Horizons document.
pub fn parse_vector_table(text: &str, body_name: &str) -> Result<StateVector, ParseFailure> {
    let section = DATA_SECTION
        .captures(text)
        .and_then(|captures| captures.get(1))
        .ok_or(ParseFailure::MissingDataSection)?
        .as_str();

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(section.as_bytes());

    for (row, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                debug!(body = body_name, row, error = %err, "unreadable Horizons row skipped");
                continue;
            }
        };

        if let Some(position) = numeric_triplet(&record, POSITION_COLUMNS) {
            return Ok(StateVector {
                position,
                velocity: numeric_triplet(&record, VELOCITY_COLUMNS),
            });
        }
        debug!(body = body_name, row, "non-numeric Horizons row skipped");
    }

    Err(ParseFailure::NoValidRow(body_name.to_string()))
}

fn numeric_triplet(record: &StringRecord, columns: Range<usize>) -> Option<Vector3<f64>> {
    let values = columns
        .map(|column| {
            record
                .get(column)?
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
        })
        .collect::<Option<Vec<f64>>>()?;
    Some(Vector3::from_column_slice(&values))
}
