use serde::{Deserialize, Deserializer, Serialize};

/// One simulated vehicle as reported in an `update` tick.
///
/// Ids are unique within a tick but not guaranteed stable across ticks;
/// the whole agent set is replaced wholesale on every message, so an
/// `Agent` lives exactly as long as the tick that delivered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    /// [lat, lon]
    pub position: [f64; 2],
    /// Traversed route, most-recent-last.
    #[serde(default)]
    pub path: Vec<[f64; 2]>,
}

/// One heatmap sample, regenerated each tick alongside the agents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionSample {
    pub position: [f64; 2],
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

/// Signal phase of a traffic light. Open set: the server may grow new
/// phases, so anything unrecognized maps to `Unknown` instead of failing
/// the whole message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum LightState {
    Red,
    Green,
    Unknown,
}

impl From<String> for LightState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "red" => LightState::Red,
            "green" => LightState::Green,
            _ => LightState::Unknown,
        }
    }
}

/// A signalized intersection.
///
/// The id is stable across ticks. The reported position may jitter from
/// tick to tick; consumers are expected to pin each id to its first-seen
/// position (see the sync crate) so static infrastructure never moves
/// on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficLight {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub position: [f64; 2],
    pub state: LightState,
}

/// Accepts either a JSON string or integer id and normalizes to a
/// string. The simulation server emits numeric graph-node ids for
/// traffic lights.
fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
