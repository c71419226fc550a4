//! # Live ephemeris access
//!
//! The pieces used by the resolver to obtain the position of a solar-system body at a given
//! instant:
//!
//! | Module | Role |
//! |--------|------|
//! | [`bodies`] | Registry of known bodies and their JPL Horizons identifiers |
//! | [`horizons_request`] | [`EphemerisSource`](horizons_request::EphemerisSource) trait and the HTTP client |
//! | [`horizons_parser`] | Extraction of the first state vector from a Horizons payload |
//! | [`fallback`] | Static last-resort positions |
//!
//! Two failure kinds come out of this module, and only these two make the resolver degrade to
//! the fallback table: [`TransportFailure`] (the provider could not be reached or answered with
//! an error status) and [`ParseFailure`] (a payload arrived but carried no usable vector).
use std::time::Duration;

use thiserror::Error;

pub mod bodies;
pub mod fallback;
pub mod horizons_parser;
pub mod horizons_request;

/// The ephemeris provider could not deliver a payload.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportFailure {
    #[error("ephemeris request timed out after {0:?}")]
    Timeout(Duration),

    #[error("ephemeris provider answered with HTTP status {0}")]
    Status(u16),

    #[error("ephemeris provider unreachable: {0}")]
    Connection(String),
}

/// A payload was received but no position could be extracted from it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseFailure {
    #[error("payload is not a valid provider document: {0}")]
    InvalidDocument(String),

    #[error("provider document has no result field")]
    MissingResult,

    #[error("provider reported an error: {0}")]
    ProviderError(String),

    #[error("no $$SOE/$$EOE delimited data section in payload")]
    MissingDataSection,

    #[error("no well-formed vector row in data section for {0}")]
    NoValidRow(String),
}

/// Any failure on the live path that the resolver absorbs with a fallback position.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveFailure {
    #[error(transparent)]
    Transport(#[from] TransportFailure),

    #[error(transparent)]
    Parse(#[from] ParseFailure),
}
