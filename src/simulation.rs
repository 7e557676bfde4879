// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rail Boost Engine - Reference Host Simulation

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use wasm_bindgen::prelude::*;

use crate::config::BoostConfig;
use crate::controller::{BoostController, Eviction, Transition};
use crate::debug::{DebugSubscriber, MemorySubscriber, SubscriberId};
use crate::types::*;
use crate::world::{TrackWorld, Vehicle};

/// Acceleration from an active powered segment, metres per tick per tick.
pub const POWERED_RAIL_PUSH: f64 = 0.06;
/// Per-tick velocity retention on any track.
pub const RAIL_FRICTION: f64 = 0.997;
/// Per-tick velocity retention off track.
pub const GROUND_FRICTION: f64 = 0.5;

// ─── GridWorld ───────────────────────────────────────────────────────────────

/// Sparse tile grid. Anything not set is air.
#[derive(Debug, Clone)]
pub struct GridWorld {
    id: WorldId,
    tiles: HashMap<BlockPos, Tile>,
    speed_rule: Option<u32>,
}

impl GridWorld {
    pub fn new(id: impl Into<WorldId>) -> Self {
        Self { id: id.into(), tiles: HashMap::new(), speed_rule: None }
    }

    pub fn set_tile(&mut self, pos: BlockPos, tile: Tile) {
        if tile.kind == TileType::air() {
            self.tiles.remove(&pos);
        } else {
            self.tiles.insert(pos, tile);
        }
    }

    /// Set the electrical state of the tile at `pos`. Returns `false` when
    /// there is no powered track there.
    pub fn set_powered(&mut self, pos: BlockPos, powered: bool) -> bool {
        match self.tiles.get_mut(&pos) {
            Some(tile) if tile.kind.is_powered_track() => {
                tile.powered = powered;
                true
            }
            _ => false,
        }
    }

    pub fn set_speed_rule(&mut self, blocks_per_second: Option<u32>) {
        self.speed_rule = blocks_per_second;
    }

    /// Powered track at `pos` with `below` directly underneath.
    pub fn lay_segment(&mut self, pos: BlockPos, powered: bool, below: TileType) {
        self.set_tile(pos, Tile::powered_rail(powered));
        self.set_tile(pos.below(), Tile::new(below));
    }

    /// Straight run of powered track along x, inclusive of both ends.
    pub fn lay_track(&mut self, x_from: i32, x_to: i32, y: i32, z: i32, powered: bool, below: &TileType) {
        let (lo, hi) = if x_from <= x_to { (x_from, x_to) } else { (x_to, x_from) };
        for x in lo..=hi {
            self.lay_segment(BlockPos::new(x, y, z), powered, below.clone());
        }
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }
}

impl TrackWorld for GridWorld {
    fn world_id(&self) -> WorldId {
        self.id.clone()
    }

    fn tile_at(&self, pos: BlockPos) -> Tile {
        self.tiles.get(&pos).cloned().unwrap_or_default()
    }

    fn minecart_max_speed_rule(&self) -> Option<u32> {
        self.speed_rule
    }
}

// ─── Cart ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub id: VehicleId,
    pub kind: VehicleKind,
    pub location: Location,
    pub velocity: Vec3,
    pub max_speed: f64,
}

impl Cart {
    pub fn new(id: VehicleId, location: Location) -> Self {
        Self {
            id,
            kind: VehicleKind::Minecart,
            location,
            velocity: Vec3::ZERO,
            max_speed: 0.4,
        }
    }

    /// Host-side motion for one tick, before the move event fires.
    fn advance(&mut self, world: &GridWorld) {
        let tile = world.tile_at(self.location.block());
        let on_track = tile.kind.is_powered_track() || tile.kind == TileType::rail();

        let mut v = if on_track { self.velocity * RAIL_FRICTION } else { self.velocity * GROUND_FRICTION };
        if tile.kind.is_powered_track() && tile.powered {
            let heading = v.normalize().unwrap_or(Vec3::DEFAULT_HEADING);
            v = v + heading * POWERED_RAIL_PUSH;
        }
        if v.length() > self.max_speed {
            v = v.with_length(self.max_speed);
        }
        self.velocity = v;
        self.location = self.location.offset(v);
    }
}

impl Vehicle for Cart {
    fn id(&self) -> VehicleId { self.id }
    fn kind(&self) -> VehicleKind { self.kind }
    fn location(&self) -> Location { self.location }
    fn max_speed(&self) -> f64 { self.max_speed }
    fn set_max_speed(&mut self, speed: f64) { self.max_speed = speed; }
    fn velocity(&self) -> Vec3 { self.velocity }
    fn set_velocity(&mut self, velocity: Vec3) { self.velocity = velocity; }
}

// ─── Results ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickResult {
    pub tick: u64,
    pub carts: usize,
    pub boosted: usize,
    pub entered: u32,
    pub demoted: u32,
    pub braked: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartView {
    pub id: i32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub speed: f64,
    pub max_speed: f64,
    pub boosted: bool,
}

// ─── TrackSimulation ─────────────────────────────────────────────────────────

/// Minimal host: owns a world and its carts and fires the engine's events.
#[wasm_bindgen]
pub struct TrackSimulation {
    pub(crate) world: GridWorld,
    pub(crate) carts: BTreeMap<VehicleId, Cart>,
    pub(crate) controller: BoostController,
    pub(crate) debug_buffer: Option<(SubscriberId, MemorySubscriber)>,
    pub(crate) console_subscriber: Option<SubscriberId>,
    pub(crate) next_cart_id: i32,
    pub(crate) current_tick: u64,
}

impl TrackSimulation {
    pub fn with_config(config: &BoostConfig, world: GridWorld) -> Self {
        Self {
            world,
            carts: BTreeMap::new(),
            controller: BoostController::new(config),
            debug_buffer: None,
            console_subscriber: None,
            next_cart_id: 1,
            current_tick: 0,
        }
    }

    pub fn world(&self) -> &GridWorld { &self.world }
    pub fn world_mut(&mut self) -> &mut GridWorld { &mut self.world }
    pub fn controller(&self) -> &BoostController { &self.controller }
    pub fn controller_mut(&mut self) -> &mut BoostController { &mut self.controller }

    pub fn cart(&self, id: VehicleId) -> Option<&Cart> {
        self.carts.get(&id)
    }

    pub fn cart_mut(&mut self, id: VehicleId) -> Option<&mut Cart> {
        self.carts.get_mut(&id)
    }

    pub fn add_cart(&mut self, location: Location, velocity: Vec3) -> VehicleId {
        let id = VehicleId(self.next_cart_id);
        self.next_cart_id += 1;
        let mut cart = Cart::new(id, location);
        cart.velocity = velocity;
        self.carts.insert(id, cart);
        id
    }

    pub fn remove_cart(&mut self, id: VehicleId) -> Eviction {
        self.carts.remove(&id);
        self.controller.on_vehicle_removed(id)
    }

    /// Attach an in-memory debug subscriber the host can drain.
    ///
    /// Replaces any earlier capture sink; lines it still holds move over.
    pub fn capture_debug(&mut self, verbose: bool) -> MemorySubscriber {
        let mut sink = MemorySubscriber::new(verbose);
        if let Some((old_id, old)) = self.debug_buffer.take() {
            self.controller.debuggers_mut().unsubscribe(old_id);
            for line in old.drain() {
                sink.send(&line);
            }
        }
        let id = self.controller.debuggers_mut().subscribe(Box::new(sink.clone()));
        self.debug_buffer = Some((id, sink.clone()));
        sink
    }

    /// Lines captured since the last drain; empty when capture is off.
    pub fn drain_captured(&self) -> Vec<String> {
        self.debug_buffer
            .as_ref()
            .map(|(_, sink)| sink.drain())
            .unwrap_or_default()
    }

    /// Detach the capture sink. Undrained lines are dropped.
    pub fn stop_capture(&mut self) -> bool {
        match self.debug_buffer.take() {
            Some((id, _)) => self.controller.debuggers_mut().unsubscribe(id),
            None => false,
        }
    }

    /// Install `subscriber` as the single console sink, replacing any earlier one.
    pub fn replace_console_sink(&mut self, subscriber: Box<dyn DebugSubscriber>) -> SubscriberId {
        if let Some(old) = self.console_subscriber.take() {
            self.controller.debuggers_mut().unsubscribe(old);
        }
        let id = self.controller.debuggers_mut().subscribe(subscriber);
        self.console_subscriber = Some(id);
        id
    }

    /// The world's speed rule changed; forget the cached default speed.
    pub fn update_speed_rule(&mut self, blocks_per_second: Option<u32>) {
        self.world.set_speed_rule(blocks_per_second);
        let id = self.world.world_id();
        self.controller.default_speed_mut().invalidate(&id);
    }

    /// Boosted max speed for this world under the current config.
    pub fn boosted_max_speed(&mut self) -> f64 {
        self.controller.boosted_max_speed(&self.world)
    }

    pub fn tick_core(&mut self) -> TickResult {
        self.current_tick += 1;
        let mut result = TickResult { tick: self.current_tick, ..TickResult::default() };

        for cart in self.carts.values_mut() {
            let from = cart.location;
            cart.advance(&self.world);
            let to = cart.location;
            let outcome = self.controller.on_vehicle_move(&self.world, cart, from, to);
            match outcome.transition {
                Transition::Entered => result.entered += 1,
                Transition::Demoted => result.demoted += 1,
                _ => {}
            }
            if outcome.braked {
                result.braked += 1;
            }
        }

        result.carts = self.carts.len();
        result.boosted = self.controller.boosted_count();
        result
    }

    pub fn cart_views(&self) -> Vec<CartView> {
        self.carts
            .values()
            .map(|c| CartView {
                id: c.id.0,
                x: c.location.x,
                y: c.location.y,
                z: c.location.z,
                speed: c.velocity.length(),
                max_speed: c.max_speed,
                boosted: self.controller.is_boosted(c.id),
            })
            .collect()
    }

    pub fn get_current_tick(&self) -> u64 { self.current_tick }
}
