// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rail Boost Engine - Host Interfaces

//! Seams between the engine and the host simulation.
//!
//! The host owns the world and its vehicles; the engine only reads tiles and
//! reads/writes two vehicle properties during an event.

use crate::types::{BlockPos, Location, Tile, Vec3, VehicleId, VehicleKind, WorldId};

/// Read-only view of a world during one event.
pub trait TrackWorld {
    fn world_id(&self) -> WorldId;

    /// Tile at `pos`. Unloaded or unknown positions report air.
    fn tile_at(&self, pos: BlockPos) -> Tile;

    /// Cart max-speed rule in blocks per second, if the world sets one.
    fn minecart_max_speed_rule(&self) -> Option<u32> {
        None
    }
}

/// Vehicle handle delivered with an event. Obtained fresh each tick, never
/// retained by the engine.
pub trait Vehicle {
    fn id(&self) -> VehicleId;
    fn kind(&self) -> VehicleKind;
    fn location(&self) -> Location;

    fn max_speed(&self) -> f64;
    fn set_max_speed(&mut self, speed: f64);

    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
}
