use protocol::{Agent, DecodeError, EmissionSample, ServerMessage, TrafficLight};
use serde_json::Value;

use crate::log::DiagnosticLog;
use crate::pinning::PinningCache;
use crate::slot::LayerSlot;
use crate::toggles::LayerToggles;

/// The toggle-gated GeoJSON overlays, which all share one merge policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    RoadLanes,
    BartLines,
    MuniStops,
    SfParcels,
}

/// Borrowed, render-ready view of the merged state.
///
/// Handed to the compositor once per frame; since the merger replaces
/// whole collections rather than editing them in place, a snapshot
/// never observes a half-applied message.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub agents: &'a [Agent],
    pub emissions: &'a [EmissionSample],
    pub traffic_lights: &'a [TrafficLight],
    pub road_lanes: Option<&'a Value>,
    pub bart_lines: Option<&'a Value>,
    pub muni_stops: Option<&'a Value>,
    pub sf_parcels: Option<&'a Value>,
}

/// The reconciliation core: folds inbound messages into a coherent,
/// render-ready snapshot.
///
/// Merge rules:
/// - `update` replaces agents wholesale; the server snapshot is
///   authoritative each tick, no diffing. Optional fields left out of a
///   tick leave the previous value in place. Emissions and lights are
///   accepted only while their toggles are on.
/// - Traffic-light positions are pinned to first observation while the
///   lights toggle stays on; toggling off clears both the visible set
///   and the pin cache.
/// - Each GeoJSON overlay is a `LayerSlot`: replace-if-enabled,
///   dropped-on-disable.
/// - `error` sets the standalone error flag and touches nothing else.
#[derive(Debug)]
pub struct StateMerger {
    toggles: LayerToggles,
    agents: Vec<Agent>,
    emissions: Vec<EmissionSample>,
    traffic_lights: Vec<TrafficLight>,
    light_positions: PinningCache<String, [f64; 2]>,
    road_lanes: LayerSlot<Value>,
    bart_lines: LayerSlot<Value>,
    muni_stops: LayerSlot<Value>,
    sf_parcels: LayerSlot<Value>,
    error: Option<String>,
    log: DiagnosticLog,
}

impl Default for StateMerger {
    fn default() -> Self {
        Self::new(LayerToggles::default())
    }
}

impl StateMerger {
    pub fn new(toggles: LayerToggles) -> Self {
        let mut merger = Self {
            toggles,
            agents: Vec::new(),
            emissions: Vec::new(),
            traffic_lights: Vec::new(),
            light_positions: PinningCache::new(),
            road_lanes: LayerSlot::Disabled,
            bart_lines: LayerSlot::Disabled,
            muni_stops: LayerSlot::Disabled,
            sf_parcels: LayerSlot::Disabled,
            error: None,
            log: DiagnosticLog::new(),
        };
        merger.road_lanes.set_enabled(toggles.show_traffic_lanes);
        merger.bart_lines.set_enabled(toggles.show_bart_lines);
        merger.muni_stops.set_enabled(toggles.show_muni_stops);
        merger.sf_parcels.set_enabled(toggles.show_sf_parcels);
        merger
    }

    /// Fold one inbound message into the snapshot.
    ///
    /// Never fails and never panics: every message lands one entry in
    /// the diagnostic log, and `error` short-circuits without touching
    /// cached layer state.
    pub fn apply(&mut self, message: ServerMessage) {
        let kind = message.kind();
        match message {
            ServerMessage::Update {
                agents,
                emissions,
                traffic_lights,
            } => {
                self.log.push(kind, format!("tick with {} agents", agents.len()));
                // BTreeMap iteration gives a stable, id-sorted agent order.
                self.agents = agents.into_values().collect();
                if self.toggles.show_emissions {
                    if let Some(samples) = emissions {
                        self.emissions = samples;
                    }
                } else {
                    self.emissions.clear();
                }
                if self.toggles.show_traffic_lights {
                    if let Some(lights) = traffic_lights {
                        self.merge_lights(lights);
                    }
                } else {
                    self.traffic_lights.clear();
                }
            }
            ServerMessage::InitialRoadNetwork { lanes }
            | ServerMessage::RoadNetworkUpdate { lanes } => {
                self.log.push(kind, "road network geometry");
                self.road_lanes.accept(lanes);
            }
            ServerMessage::BartLines { data } => {
                self.log.push(kind, "BART line geometry");
                self.bart_lines.accept(data);
            }
            ServerMessage::MuniStops { data } => {
                self.log.push(kind, "Muni stop geometry");
                self.muni_stops.accept(data);
            }
            ServerMessage::SfParcels { data } => {
                self.log.push(kind, "parcel geometry");
                self.sf_parcels.accept(data);
            }
            ServerMessage::Info { message } => {
                self.log.push(kind, message);
            }
            ServerMessage::Error { message } => {
                self.log.push(kind, message.clone());
                self.error = Some(message);
            }
        }
    }

    fn merge_lights(&mut self, lights: Vec<TrafficLight>) {
        self.traffic_lights = lights
            .into_iter()
            .map(|mut light| {
                // First observation wins; later server positions for the
                // same id are treated as jitter. State stays fresh.
                light.position = *self.light_positions.pin(light.id.clone(), light.position);
                light
            })
            .collect();
    }

    /// Record a message that failed to decode. Cached state is left
    /// exactly as it was.
    pub fn record_decode_error(&mut self, err: &DecodeError) {
        self.log.push("error", err.to_string());
    }

    /// Append a client-side diagnostic entry (connection lifecycle and
    /// the like).
    pub fn note(&mut self, kind: &'static str, message: impl Into<String>) {
        self.log.push(kind, message);
    }

    // Toggles ------------------------------------------------------------

    pub fn toggles(&self) -> LayerToggles {
        self.toggles
    }

    /// Trails are composed client-side only; nothing cached to clear.
    pub fn set_show_trails(&mut self, on: bool) {
        self.toggles.show_trails = on;
    }

    pub fn set_show_emissions(&mut self, on: bool) {
        self.toggles.show_emissions = on;
        if !on {
            self.emissions.clear();
        }
    }

    /// Disabling drops both the visible lights and the pinned
    /// positions; re-enabling rebuilds the pin cache from scratch.
    pub fn set_show_traffic_lights(&mut self, on: bool) {
        self.toggles.show_traffic_lights = on;
        if !on {
            self.traffic_lights.clear();
            self.light_positions.clear();
        }
    }

    pub fn set_overlay_enabled(&mut self, overlay: Overlay, on: bool) {
        match overlay {
            Overlay::RoadLanes => self.toggles.show_traffic_lanes = on,
            Overlay::BartLines => self.toggles.show_bart_lines = on,
            Overlay::MuniStops => self.toggles.show_muni_stops = on,
            Overlay::SfParcels => self.toggles.show_sf_parcels = on,
        }
        self.overlay_slot_mut(overlay).set_enabled(on);
    }

    fn overlay_slot_mut(&mut self, overlay: Overlay) -> &mut LayerSlot<Value> {
        match overlay {
            Overlay::RoadLanes => &mut self.road_lanes,
            Overlay::BartLines => &mut self.bart_lines,
            Overlay::MuniStops => &mut self.muni_stops,
            Overlay::SfParcels => &mut self.sf_parcels,
        }
    }

    pub fn overlay_data(&self, overlay: Overlay) -> Option<&Value> {
        match overlay {
            Overlay::RoadLanes => self.road_lanes.data(),
            Overlay::BartLines => self.bart_lines.data(),
            Overlay::MuniStops => self.muni_stops.data(),
            Overlay::SfParcels => self.sf_parcels.data(),
        }
    }

    // Error state --------------------------------------------------------

    /// Blocking server-reported error, if any. Supersedes rendering.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Called after a successful reconnect.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // Views --------------------------------------------------------------

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            agents: &self.agents,
            emissions: &self.emissions,
            traffic_lights: &self.traffic_lights,
            road_lanes: self.road_lanes.data(),
            bart_lines: self.bart_lines.data(),
            muni_stops: self.muni_stops.data(),
            sf_parcels: self.sf_parcels.data(),
        }
    }

    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    /// Pinned light positions currently held. Exposed for UI badges and
    /// tests; mutation goes through `apply`/`set_show_traffic_lights`.
    pub fn pinned_light_position(&self, id: &str) -> Option<&[f64; 2]> {
        self.light_positions.get(&id.to_string())
    }
}
