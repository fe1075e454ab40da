use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::{Agent, EmissionSample, TrafficLight};
use crate::viewport::GeoBounds;

/// The complete view the client wants the server to simulate: query
/// region, agent count, and the server-side layer subscriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionState {
    pub bounds: GeoBounds,
    pub num_agents: u32,
    pub show_traffic_lights: bool,
    pub show_traffic_lanes: bool,
    pub show_bart_lines: bool,
    pub show_muni_stops: bool,
    pub show_sf_parcels: bool,
}

/// Message from client to server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Full-state catch-up, sent once immediately after the socket
    /// opens. The server keeps no per-client state between connections,
    /// so every new connection must establish the complete desired view.
    Start(SubscriptionState),

    /// Debounced viewport or toggle refresh.
    UpdateBounds(SubscriptionState),

    /// Debounced agent-count change.
    SetNumAgents { num_agents: u32 },

    /// Explicit teardown.
    Stop,
}

/// Message from server to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// One simulation tick: the authoritative wholesale snapshot.
    /// `emissions` and `traffic_lights` are optional; an absent field
    /// means "no change this tick".
    Update {
        agents: BTreeMap<String, Agent>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        emissions: Option<Vec<EmissionSample>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        traffic_lights: Option<Vec<TrafficLight>>,
    },

    /// Road lane geometry sent right after `start`.
    InitialRoadNetwork { lanes: Value },

    /// Road lane geometry refreshed after a bounds change. Applies
    /// identically to `initial_road_network`.
    RoadNetworkUpdate { lanes: Value },

    /// BART line GeoJSON overlay.
    BartLines { data: Value },

    /// Muni stop GeoJSON overlay.
    MuniStops { data: Value },

    /// Parcel GeoJSON overlay.
    SfParcels { data: Value },

    /// Informational notice; diagnostic log only.
    Info { message: String },

    /// Server-reported semantic error; blocks rendering until the next
    /// successful reconnect.
    Error { message: String },
}

impl ServerMessage {
    /// The discriminator as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::Update { .. } => "update",
            ServerMessage::InitialRoadNetwork { .. } => "initial_road_network",
            ServerMessage::RoadNetworkUpdate { .. } => "road_network_update",
            ServerMessage::BartLines { .. } => "bart_lines",
            ServerMessage::MuniStops { .. } => "muni_stops",
            ServerMessage::SfParcels { .. } => "sf_parcels",
            ServerMessage::Info { .. } => "info",
            ServerMessage::Error { .. } => "error",
        }
    }
}

const KNOWN_TYPES: &[&str] = &[
    "update",
    "initial_road_network",
    "road_network_update",
    "bart_lines",
    "muni_stops",
    "sf_parcels",
    "info",
    "error",
];

/// Why an inbound frame could not be decoded.
///
/// None of these are fatal to the session; callers log the failure and
/// drop the message.
#[derive(Debug)]
pub enum DecodeError {
    /// Not valid JSON at all.
    Syntax(serde_json::Error),
    /// Valid JSON without a string `type` discriminator.
    MissingType,
    /// A `type` this client does not understand.
    UnknownType(String),
    /// A known `type` whose payload did not match the expected shape.
    Payload {
        kind: String,
        source: serde_json::Error,
    },
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Syntax(err) => write!(f, "malformed message: {err}"),
            DecodeError::MissingType => write!(f, "message has no `type` discriminator"),
            DecodeError::UnknownType(kind) => write!(f, "unknown message type: {kind}"),
            DecodeError::Payload { kind, source } => {
                write!(f, "bad payload for `{kind}` message: {source}")
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Syntax(err) | DecodeError::Payload { source: err, .. } => Some(err),
            _ => None,
        }
    }
}

/// Decode one inbound frame.
///
/// Goes through a `Value` pre-pass so broken JSON, unknown message
/// types, and bad payloads for known types are distinguishable. Unknown
/// types must stay non-fatal: the server is free to grow new messages.
pub fn decode(text: &str) -> Result<ServerMessage, DecodeError> {
    let value: Value = serde_json::from_str(text).map_err(DecodeError::Syntax)?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingType)?;
    if !KNOWN_TYPES.contains(&kind) {
        return Err(DecodeError::UnknownType(kind.to_string()));
    }
    let kind = kind.to_string();
    serde_json::from_value(value).map_err(|source| DecodeError::Payload { kind, source })
}
