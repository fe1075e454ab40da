use std::env;

use protocol::ViewportState;

/// Runtime configuration, environment-driven with defaults.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub ws_url: String,
    pub viewport: ViewportState,
    pub num_agents: u32,
    pub animation_speed: f64,
    pub frame_hz: u64,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            ws_url: env::var("SIM_WS_URL")
                .unwrap_or_else(|_| "ws://127.0.0.1:8000/ws/traffic".to_string()),
            viewport: ViewportState::new(
                env_var_f64("SIM_CENTER_LNG", -122.431),
                env_var_f64("SIM_CENTER_LAT", 37.773),
                env_var_f64("SIM_ZOOM", 14.0),
            ),
            num_agents: env_var_u32("SIM_NUM_AGENTS", 1000),
            animation_speed: env_var_f64("SIM_ANIMATION_SPEED", 1.0),
            frame_hz: env_var_u64("SIM_FRAME_HZ", 60),
        }
    }
}

fn env_var_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_var_u32(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
