use protocol::Agent;
use sync::{LayerToggles, Snapshot};

use crate::layers::{
    RenderLayer, Trip, BART_LINES_LAYER, MUNI_STOPS_LAYER, ROAD_NETWORK_LAYER, SF_PARCELS_LAYER,
};

/// Trail layers draw only this many most-recent path points per agent.
pub const TRAIL_POINTS: usize = 100;

/// Trail fade length, in synthetic timestamp units.
pub const TRAIL_LENGTH: f32 = 100.0;

/// Compose the back-to-front layer stack for one frame.
///
/// Pure function of (snapshot, toggles, clock time); the same inputs
/// always yield the same stack in the same order:
/// emissions heatmap, road lanes, BART lines, Muni stops, parcels,
/// traffic lights, then agent trails XOR agent paths+points.
///
/// An empty agent list short-circuits to an empty stack regardless of
/// the other toggles: nothing else is worth drawing without agents.
pub fn compose<'a>(
    snapshot: Snapshot<'a>,
    toggles: &LayerToggles,
    clock_time: f64,
) -> Vec<RenderLayer<'a>> {
    if snapshot.agents.is_empty() {
        return Vec::new();
    }

    let mut stack = Vec::new();

    if toggles.show_emissions && !snapshot.emissions.is_empty() {
        stack.push(RenderLayer::EmissionsHeatmap {
            samples: snapshot.emissions,
        });
    }

    let overlays = [
        (toggles.show_traffic_lanes, ROAD_NETWORK_LAYER, snapshot.road_lanes),
        (toggles.show_bart_lines, BART_LINES_LAYER, snapshot.bart_lines),
        (toggles.show_muni_stops, MUNI_STOPS_LAYER, snapshot.muni_stops),
        (toggles.show_sf_parcels, SF_PARCELS_LAYER, snapshot.sf_parcels),
    ];
    for (enabled, id, data) in overlays {
        if enabled {
            if let Some(data) = data {
                stack.push(RenderLayer::GeoJson { id, data });
            }
        }
    }

    if toggles.show_traffic_lights && !snapshot.traffic_lights.is_empty() {
        stack.push(RenderLayer::TrafficLights {
            lights: snapshot.traffic_lights,
        });
    }

    if toggles.show_trails {
        stack.push(trail_layer(snapshot.agents, clock_time));
    } else {
        // Fallback draws the full, untrimmed paths with points on top.
        stack.push(RenderLayer::AgentPaths {
            paths: snapshot.agents.iter().map(|a| a.path.as_slice()).collect(),
        });
        stack.push(RenderLayer::AgentPoints {
            positions: snapshot.agents.iter().map(|a| a.position).collect(),
        });
    }

    stack
}

fn trail_layer(agents: &[Agent], clock_time: f64) -> RenderLayer<'_> {
    let trips = agents
        .iter()
        .map(|agent| {
            let start = agent.path.len().saturating_sub(TRAIL_POINTS);
            let path = &agent.path[start..];
            Trip {
                path,
                timestamps: (0..path.len()).map(|i| i as f32).collect(),
            }
        })
        .collect();
    RenderLayer::AgentTrails {
        trips,
        current_time: clock_time as f32,
        trail_length: TRAIL_LENGTH,
    }
}

#[cfg(test)]
mod tests {
    use protocol::{Agent, EmissionSample, LightState, TrafficLight};
    use serde_json::json;
    use sync::{LayerToggles, Snapshot};

    use super::{compose, RenderLayer, TRAIL_POINTS};

    fn agent_with_path(len: usize) -> Agent {
        Agent {
            id: "a1".to_string(),
            position: [37.77, -122.43],
            path: (0..len).map(|i| [37.77, -122.43 + i as f64 * 1e-4]).collect(),
        }
    }

    fn all_toggles_on() -> LayerToggles {
        LayerToggles {
            show_trails: true,
            show_traffic_lights: true,
            show_traffic_lanes: true,
            show_bart_lines: true,
            show_muni_stops: true,
            show_sf_parcels: true,
            show_emissions: true,
        }
    }

    #[test]
    fn full_stack_keeps_back_to_front_order() {
        let agents = vec![agent_with_path(3)];
        let emissions = vec![EmissionSample {
            position: [-122.43, 37.77],
            weight: 1.0,
        }];
        let lights = vec![TrafficLight {
            id: "A".to_string(),
            position: [37.79, -122.40],
            state: LightState::Red,
        }];
        let geo = json!({"type": "FeatureCollection", "features": []});

        let snapshot = Snapshot {
            agents: &agents,
            emissions: &emissions,
            traffic_lights: &lights,
            road_lanes: Some(&geo),
            bart_lines: Some(&geo),
            muni_stops: Some(&geo),
            sf_parcels: Some(&geo),
        };

        let stack = compose(snapshot, &all_toggles_on(), 0.0);
        let ids: Vec<_> = stack.iter().map(|layer| layer.id()).collect();
        assert_eq!(
            ids,
            vec![
                "emissions-heatmap",
                "road-network",
                "bart-lines",
                "muni-stops",
                "sf-parcels",
                "traffic-lights",
                "agent-trails",
            ]
        );
    }

    #[test]
    fn empty_agents_short_circuit_to_no_layers() {
        let geo = json!({"type": "FeatureCollection", "features": []});
        let snapshot = Snapshot {
            agents: &[],
            emissions: &[],
            traffic_lights: &[],
            road_lanes: Some(&geo),
            bart_lines: Some(&geo),
            muni_stops: Some(&geo),
            sf_parcels: Some(&geo),
        };
        assert!(compose(snapshot, &all_toggles_on(), 12.5).is_empty());
    }

    #[test]
    fn trails_trim_to_the_last_points_with_index_timestamps() {
        let agents = vec![agent_with_path(250)];
        let snapshot = Snapshot {
            agents: &agents,
            emissions: &[],
            traffic_lights: &[],
            road_lanes: None,
            bart_lines: None,
            muni_stops: None,
            sf_parcels: None,
        };

        let toggles = LayerToggles::default();
        let stack = compose(snapshot, &toggles, 42.0);
        assert_eq!(stack.len(), 1);
        let RenderLayer::AgentTrails {
            trips,
            current_time,
            ..
        } = &stack[0]
        else {
            panic!("expected trails layer");
        };
        assert_eq!(trips[0].path.len(), TRAIL_POINTS);
        // Trailing slice: the last path point survives the trim.
        assert_eq!(trips[0].path.last(), agents[0].path.last());
        assert_eq!(trips[0].timestamps.first(), Some(&0.0));
        assert_eq!(trips[0].timestamps.last(), Some(&((TRAIL_POINTS - 1) as f32)));
        assert_eq!(*current_time, 42.0);
    }

    #[test]
    fn trails_off_falls_back_to_full_paths_and_points() {
        let agents = vec![agent_with_path(250)];
        let snapshot = Snapshot {
            agents: &agents,
            emissions: &[],
            traffic_lights: &[],
            road_lanes: None,
            bart_lines: None,
            muni_stops: None,
            sf_parcels: None,
        };

        let toggles = LayerToggles {
            show_trails: false,
            ..LayerToggles::default()
        };
        let stack = compose(snapshot, &toggles, 0.0);
        let ids: Vec<_> = stack.iter().map(|layer| layer.id()).collect();
        assert_eq!(ids, vec!["agent-paths", "agent-points"]);

        let RenderLayer::AgentPaths { paths } = &stack[0] else {
            panic!("expected paths layer");
        };
        // No trimming in fallback mode.
        assert_eq!(paths[0].len(), 250);
    }

    #[test]
    fn gated_layers_are_skipped_when_data_is_missing() {
        let agents = vec![agent_with_path(2)];
        let snapshot = Snapshot {
            agents: &agents,
            emissions: &[],
            traffic_lights: &[],
            road_lanes: None,
            bart_lines: None,
            muni_stops: None,
            sf_parcels: None,
        };
        // Everything on, but no data present anywhere: only trails draw.
        let stack = compose(snapshot, &all_toggles_on(), 0.0);
        let ids: Vec<_> = stack.iter().map(|layer| layer.id()).collect();
        assert_eq!(ids, vec!["agent-trails"]);
    }
}
