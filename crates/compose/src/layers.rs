use protocol::{EmissionSample, TrafficLight};
use serde_json::Value;

pub const ROAD_NETWORK_LAYER: &str = "road-network";
pub const BART_LINES_LAYER: &str = "bart-lines";
pub const MUNI_STOPS_LAYER: &str = "muni-stops";
pub const SF_PARCELS_LAYER: &str = "sf-parcels";

/// One agent's trail: its most recent path points plus a synthetic
/// timestamp ramp 0..len-1, so trail age is path-index based rather
/// than wall-clock based.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip<'a> {
    pub path: &'a [[f64; 2]],
    pub timestamps: Vec<f32>,
}

/// One renderable layer. Position in the composed stack is the drawing
/// order: later layers occlude earlier ones.
///
/// These are descriptors for the external mapping library, not draw
/// calls; heavyweight payloads (GeoJSON overlays, sample slices) borrow
/// from the snapshot so composing a frame never deep-copies them.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderLayer<'a> {
    EmissionsHeatmap {
        samples: &'a [EmissionSample],
    },
    GeoJson {
        id: &'static str,
        data: &'a Value,
    },
    TrafficLights {
        lights: &'a [TrafficLight],
    },
    AgentTrails {
        trips: Vec<Trip<'a>>,
        current_time: f32,
        trail_length: f32,
    },
    AgentPaths {
        paths: Vec<&'a [[f64; 2]]>,
    },
    AgentPoints {
        positions: Vec<[f64; 2]>,
    },
}

impl RenderLayer<'_> {
    /// Stable layer id, unique within one composed stack.
    pub fn id(&self) -> &'static str {
        match self {
            RenderLayer::EmissionsHeatmap { .. } => "emissions-heatmap",
            RenderLayer::GeoJson { id, .. } => id,
            RenderLayer::TrafficLights { .. } => "traffic-lights",
            RenderLayer::AgentTrails { .. } => "agent-trails",
            RenderLayer::AgentPaths { .. } => "agent-paths",
            RenderLayer::AgentPoints { .. } => "agent-points",
        }
    }
}
