/// User-facing layer visibility switches.
///
/// Each flag independently gates both the outbound subscription request
/// and the inbound message's effect on cached state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerToggles {
    pub show_trails: bool,
    pub show_traffic_lights: bool,
    pub show_traffic_lanes: bool,
    pub show_bart_lines: bool,
    pub show_muni_stops: bool,
    pub show_sf_parcels: bool,
    pub show_emissions: bool,
}

impl Default for LayerToggles {
    /// Server handshake defaults: lights and lanes on, the static
    /// GeoJSON overlays off. Trails on and emissions off are
    /// client-side presentation defaults.
    fn default() -> Self {
        Self {
            show_trails: true,
            show_traffic_lights: true,
            show_traffic_lanes: true,
            show_bart_lines: false,
            show_muni_stops: false,
            show_sf_parcels: false,
            show_emissions: false,
        }
    }
}
