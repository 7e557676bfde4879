// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rail Boost Engine

pub mod types;
pub mod config;
pub mod world;
pub mod classifier;
pub mod registry;
pub mod default_speed;
pub mod debug;
pub mod controller;
pub mod simulation;

pub use types::*;
pub use config::{BoostConfig, ConfigError};
pub use world::{TrackWorld, Vehicle};
pub use classifier::{TrackClassifier, TrackContext};
pub use registry::{BoostRegistry, VehicleBoostRecord};
pub use debug::{DebugSubscriber, DebugSubscribers, MemorySubscriber, SubscriberId};
pub use controller::{BoostController, Eviction, MoveOutcome, Transition};
pub use simulation::{Cart, CartView, GridWorld, TickResult, TrackSimulation};

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

/// Forwards debug lines to the browser console, or to `tracing` natively.
struct ConsoleSubscriber {
    verbose: bool,
}

impl DebugSubscriber for ConsoleSubscriber {
    fn accepts_verbose(&self) -> bool { self.verbose }

    fn send(&mut self, message: &str) {
        #[cfg(target_arch = "wasm32")]
        log(message);
        #[cfg(not(target_arch = "wasm32"))]
        tracing::info!(target: "rail_boost_engine::debug", "{}", message);
    }
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl TrackSimulation {
    /// Build from a TOML config document (empty string for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(config_toml: &str, world_name: &str) -> Result<TrackSimulation, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let config = BoostConfig::from_toml_str(config_toml)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(TrackSimulation::with_config(&config, GridWorld::new(world_name)))
    }

    /// Straight powered track along x with `below` under every segment.
    pub fn lay_track(
        &mut self,
        x_from: i32,
        x_to: i32,
        y: i32,
        z: i32,
        powered: bool,
        below: &str,
    ) -> Result<(), JsValue> {
        let below = TileType::parse(below)
            .ok_or_else(|| JsValue::from_str(&format!("invalid tile name: {below:?}")))?;
        self.world.lay_track(x_from, x_to, y, z, powered, &below);
        Ok(())
    }

    pub fn set_tile(&mut self, x: i32, y: i32, z: i32, kind: &str, powered: bool) -> Result<(), JsValue> {
        let kind = TileType::parse(kind)
            .ok_or_else(|| JsValue::from_str(&format!("invalid tile name: {kind:?}")))?;
        self.world.set_tile(BlockPos::new(x, y, z), Tile { kind, powered });
        Ok(())
    }

    pub fn set_powered(&mut self, x: i32, y: i32, z: i32, powered: bool) -> bool {
        self.world.set_powered(BlockPos::new(x, y, z), powered)
    }

    /// Rule in blocks per second; zero clears it back to the vanilla speed.
    pub fn set_speed_rule(&mut self, blocks_per_second: u32) {
        let rule = if blocks_per_second == 0 { None } else { Some(blocks_per_second) };
        self.update_speed_rule(rule);
    }

    pub fn spawn_cart(&mut self, x: f64, y: f64, z: f64, vx: f64, vz: f64) -> i32 {
        self.add_cart(Location::new(x, y, z), Vec3::new(vx, 0.0, vz)).0
    }

    /// Returns `true` if the cart was boosted when destroyed.
    pub fn destroy_cart(&mut self, id: i32) -> bool {
        self.remove_cart(VehicleId(id)) == Eviction::Evicted
    }

    pub fn tick(&mut self) -> JsValue {
        let result = self.tick_core();
        serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
    }

    /// Run N ticks without returning results
    pub fn run_batch(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick_core();
        }
    }

    pub fn get_carts(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.cart_views()).unwrap_or(JsValue::NULL)
    }

    pub fn boosted_count(&self) -> u32 {
        self.controller.boosted_count() as u32
    }

    /// Start collecting debug lines for [`drain_debug`](Self::drain_debug).
    /// Calling again swaps the verbosity without losing undrained lines.
    pub fn enable_debug(&mut self, verbose: bool) {
        self.capture_debug(verbose);
    }

    pub fn disable_debug(&mut self) -> bool {
        self.stop_capture()
    }

    pub fn enable_console_debug(&mut self, verbose: bool) {
        self.replace_console_sink(Box::new(ConsoleSubscriber { verbose }));
    }

    pub fn drain_debug(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.drain_captured()).unwrap_or(JsValue::NULL)
    }
}
