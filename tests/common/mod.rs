#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use hifitime::Epoch;
use orrery::{
    config::OrreryConfig,
    ephemeris::{
        bodies::BodyRegistry,
        horizons_request::{EphemerisSource, FetchWindow, RawPayload},
        TransportFailure,
    },
    orrery::Orrery,
    time::ManualClock,
};
use parking_lot::Mutex;
use serde_json::json;

/// What the scripted source answers for one body.
#[derive(Debug, Clone)]
pub enum Script {
    Respond(RawPayload),
    Fail(TransportFailure),
}

/// Offline [`EphemerisSource`] answering from a per-body script and counting calls.
///
/// Bodies without a script fail with a connection error.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<HashMap<String, usize>>,
    windows: Mutex<Vec<FetchWindow>>,
}

impl ScriptedSource {
    pub fn new() -> Arc<Self> {
        Arc::new(ScriptedSource::default())
    }

    pub fn script(&self, body: &str, script: Script) {
        self.scripts.lock().insert(body.to_string(), script);
    }

    pub fn respond_with_position(&self, body: &str, position: [f64; 3]) {
        self.script(body, Script::Respond(horizons_payload(position, [0.0; 3])));
    }

    pub fn fail(&self, body: &str, failure: TransportFailure) {
        self.script(body, Script::Fail(failure));
    }

    pub fn calls(&self, body: &str) -> usize {
        self.calls.lock().get(body).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }

    pub fn windows(&self) -> Vec<FetchWindow> {
        self.windows.lock().clone()
    }
}

#[async_trait]
impl EphemerisSource for ScriptedSource {
    async fn fetch(
        &self,
        provider_id: &str,
        window: &FetchWindow,
    ) -> Result<RawPayload, TransportFailure> {
        let registry = BodyRegistry::solar_system();
        let body = registry
            .iter()
            .find(|body| body.horizons_id == provider_id)
            .map(|body| body.name)
            .unwrap_or(provider_id);

        *self.calls.lock().entry(body.to_string()).or_default() += 1;
        self.windows.lock().push(window.clone());

        match self.scripts.lock().get(body).cloned() {
            Some(Script::Respond(payload)) => Ok(payload),
            Some(Script::Fail(failure)) => Err(failure),
            None => Err(TransportFailure::Connection(format!(
                "no script for {body}"
            ))),
        }
    }
}

/// A Horizons `format=json` document with a single vector row.
pub fn horizons_payload(position: [f64; 3], velocity: [f64; 3]) -> RawPayload {
    let [x, y, z] = position;
    let [vx, vy, vz] = velocity;
    horizons_result(&format!(
        "\
*******************************************************************************
            JDTDB,            Calendar Date (TDB),                      X,                      Y,                      Z,                     VX,                     VY,                     VZ,
**************************************************************************************************************************
$$SOE
2460371.000000000, A.D. 2024-Mar-01 12:00:00.0000, {x}, {y}, {z}, {vx}, {vy}, {vz},
$$EOE
**************************************************************************************************************************
"
    ))
}

/// Wrap an arbitrary text ephemeris in a Horizons JSON document.
pub fn horizons_result(result: &str) -> RawPayload {
    json!({
        "signature": {"source": "NASA/JPL Horizons API", "version": "1.2"},
        "result": result,
    })
    .to_string()
}

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(Epoch::from_gregorian_utc_at_midnight(
        2024, 3, 1,
    )))
}

pub fn offline_orrery(source: Arc<ScriptedSource>, clock: Arc<ManualClock>) -> Orrery {
    Orrery::with_source(OrreryConfig::default(), source, clock).unwrap()
}
