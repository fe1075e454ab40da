use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use compose::{compose, RenderLayer};
use protocol::{decode, ClientMessage, SubscriptionState, ViewportState};
use runtime::{AnimationClock, Debounce};
use sync::{Overlay, StateMerger};

use crate::config::ClientConfig;
use crate::connection::{ConnectionManager, Inbound};

/// Quiet window for coalesced viewport/toggle refreshes.
const BOUNDS_DEBOUNCE_MS: u64 = 1000;

/// Quiet window for agent-count slider changes.
const AGENT_COUNT_DEBOUNCE_MS: u64 = 500;

/// Orchestrator: wires the connection, merger, clock, throttlers and
/// compositor together and owns the user-facing control surface.
///
/// Everything runs on one task; inbound handling, frame ticks and
/// debounce flushes interleave through `select!` and each completes
/// synchronously, so no dispatch can observe a half-applied snapshot.
pub struct SimClient {
    config: ClientConfig,
    viewport: ViewportState,
    num_agents: u32,
    connection: ConnectionManager,
    merger: StateMerger,
    clock: AnimationClock,
    bounds_debounce: Debounce,
    agents_debounce: Debounce,
    transport_error: Option<String>,
    epoch: Instant,
}

impl SimClient {
    pub fn new(config: ClientConfig) -> Self {
        let merger = StateMerger::default();
        let mut clock = AnimationClock::new(config.animation_speed);
        if merger.toggles().show_trails {
            clock.start();
        }
        Self {
            viewport: config.viewport,
            num_agents: config.num_agents,
            connection: ConnectionManager::new(),
            merger,
            clock,
            bounds_debounce: Debounce::new(BOUNDS_DEBOUNCE_MS),
            agents_debounce: Debounce::new(AGENT_COUNT_DEBOUNCE_MS),
            transport_error: None,
            epoch: Instant::now(),
            config,
        }
    }

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn subscription(&self) -> SubscriptionState {
        let toggles = self.merger.toggles();
        SubscriptionState {
            bounds: self.viewport.bounds(),
            num_agents: self.num_agents,
            show_traffic_lights: toggles.show_traffic_lights,
            show_traffic_lanes: toggles.show_traffic_lanes,
            show_bart_lines: toggles.show_bart_lines,
            show_muni_stops: toggles.show_muni_stops,
            show_sf_parcels: toggles.show_sf_parcels,
        }
    }

    /// Open the connection and send the full-state catch-up request.
    ///
    /// The server keeps nothing about a client between connections, so
    /// without this one-shot the client would render nothing until the
    /// next incidental update. A successful reconnect also clears the
    /// blocking error overlay.
    pub async fn connect(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.connection.connect(&self.config.ws_url).await?;
        self.transport_error = None;
        self.merger.clear_error();
        self.connection
            .send(&ClientMessage::Start(self.subscription()))
            .await;
        info!("session established");
        Ok(())
    }

    // Control surface ----------------------------------------------------

    /// Camera moved. Coalesced into one `update_bounds` per pause.
    pub fn set_viewport(&mut self, viewport: ViewportState) {
        self.viewport = viewport;
        self.bounds_debounce.trigger(self.now_ms());
    }

    /// Agent-count slider moved. Coalesced per pause.
    pub fn set_num_agents(&mut self, num_agents: u32) {
        self.num_agents = num_agents;
        self.agents_debounce.trigger(self.now_ms());
    }

    /// Trails are client-side only: the toggle starts or cancels the
    /// animation clock and never touches the network.
    pub fn set_show_trails(&mut self, on: bool) {
        self.merger.set_show_trails(on);
        if on {
            self.clock.start();
        } else {
            self.clock.stop();
        }
    }

    pub fn set_show_emissions(&mut self, on: bool) {
        self.merger.set_show_emissions(on);
    }

    /// Server-subscribed layers also refresh the subscription, through
    /// the same debounce as viewport changes.
    pub fn set_show_traffic_lights(&mut self, on: bool) {
        self.merger.set_show_traffic_lights(on);
        self.bounds_debounce.trigger(self.now_ms());
    }

    pub fn set_overlay_enabled(&mut self, overlay: Overlay, on: bool) {
        self.merger.set_overlay_enabled(overlay, on);
        self.bounds_debounce.trigger(self.now_ms());
    }

    // Event loop ---------------------------------------------------------

    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.connect().await?;

        let frame = Duration::from_millis(1000 / self.config.frame_hz.max(1));
        let mut frames = tokio::time::interval(frame);

        loop {
            tokio::select! {
                inbound = self.connection.recv() => self.handle_inbound(inbound),
                _ = frames.tick() => self.frame().await,
                _ = tokio::signal::ctrl_c() => {
                    info!("shutting down");
                    self.connection.send(&ClientMessage::Stop).await;
                    return Ok(());
                }
            }
        }
    }

    fn handle_inbound(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::Text(text) => self.handle_text(&text),
            Inbound::Closed => {
                // No auto-reconnect; pending sends are moot but user
                // preferences (toggles, pinned positions) stay intact.
                info!("connection closed by server");
                self.merger.note("info", "connection closed");
                self.bounds_debounce.cancel();
                self.agents_debounce.cancel();
            }
            Inbound::TransportError(err) => {
                warn!("transport error: {err}");
                self.merger.note("error", format!("transport error: {err}"));
                self.transport_error = Some(err);
                self.bounds_debounce.cancel();
                self.agents_debounce.cancel();
            }
        }
    }

    /// Decode and merge one inbound frame. A message that fails to
    /// decode is logged and dropped; it never unwinds past this point.
    fn handle_text(&mut self, text: &str) {
        match decode(text) {
            Ok(message) => {
                debug!("inbound {}", message.kind());
                self.merger.apply(message);
            }
            Err(err) => {
                warn!("dropping inbound message: {err}");
                self.merger.record_decode_error(&err);
            }
        }
    }

    /// One cooperative frame: advance the clock, flush due debounces,
    /// then compose and hand off the stack.
    async fn frame(&mut self) {
        self.clock.tick();

        let now = self.now_ms();
        if self.bounds_debounce.fire_ready(now) {
            self.connection
                .send(&ClientMessage::UpdateBounds(self.subscription()))
                .await;
        }
        if self.agents_debounce.fire_ready(now) {
            self.connection
                .send(&ClientMessage::SetNumAgents {
                    num_agents: self.num_agents,
                })
                .await;
        }

        if let Some(message) = self.blocking_error() {
            trace!("error overlay active: {message}");
            return;
        }

        let toggles = self.merger.toggles();
        let stack = compose(self.merger.snapshot(), &toggles, self.clock.time());
        self.render(&stack);
    }

    /// A transport or server-reported error fully replaces the normal
    /// visualization until the next successful reconnect.
    fn blocking_error(&self) -> Option<&str> {
        self.transport_error.as_deref().or_else(|| self.merger.error())
    }

    fn render(&self, stack: &[RenderLayer<'_>]) {
        // Stand-in for the external mapping library: report what would
        // be drawn this frame.
        let ids: Vec<_> = stack.iter().map(|layer| layer.id()).collect();
        trace!("frame: {} layers {ids:?}", stack.len());
    }
}
