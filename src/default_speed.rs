// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rail Boost Engine - Default Speed Lookup

use std::collections::HashMap;

use crate::types::{WorldId, TICKS_PER_SECOND};
use crate::world::TrackWorld;

/// Vanilla cart max speed in blocks per second (0.4 blocks per tick).
pub const VANILLA_MAX_SPEED_BLOCKS_PER_SECOND: u32 = 8;

/// Per-world baseline cart speed in metres per tick, memoized.
///
/// The world's max-speed rule is read the first time a world is seen. Hosts
/// that let the rule change at runtime call [`invalidate`](Self::invalidate).
#[derive(Debug, Default)]
pub struct DefaultSpeedCache {
    per_world: HashMap<WorldId, f64>,
}

impl DefaultSpeedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn obtain<W: TrackWorld + ?Sized>(&mut self, world: &W) -> f64 {
        let id = world.world_id();
        if let Some(&speed) = self.per_world.get(&id) {
            return speed;
        }
        let blocks_per_second = world
            .minecart_max_speed_rule()
            .unwrap_or(VANILLA_MAX_SPEED_BLOCKS_PER_SECOND);
        let speed = blocks_per_second as f64 / TICKS_PER_SECOND;
        tracing::debug!(world = %id, speed, "default cart speed cached");
        self.per_world.insert(id, speed);
        speed
    }

    pub fn invalidate(&mut self, world: &WorldId) {
        self.per_world.remove(world);
    }

    pub fn clear(&mut self) {
        self.per_world.clear();
    }
}
