// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rail Boost Engine - Track Context Classifier

use serde::{Deserialize, Serialize};

use crate::types::{BlockPos, TileType};
use crate::world::TrackWorld;

/// What a vehicle is standing on this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackContext {
    pub is_powered_segment: bool,
    pub has_boost_tile_below: bool,
    pub has_brake_tile_below: bool,
    pub segment_is_active: bool,
}

impl TrackContext {
    /// Not on powered track; no boost or brake logic applies.
    pub const fn inert() -> Self {
        Self {
            is_powered_segment: false,
            has_boost_tile_below: false,
            has_brake_tile_below: false,
            segment_is_active: false,
        }
    }

    /// Inactive segment over the brake tile.
    pub fn should_brake(&self) -> bool {
        self.is_powered_segment && !self.segment_is_active && self.has_brake_tile_below
    }
}

#[derive(Debug, Clone)]
pub struct TrackClassifier {
    boost_tile: TileType,
    brake_tile: TileType,
    cheat_mode: bool,
}

impl TrackClassifier {
    pub fn new(boost_tile: TileType, brake_tile: TileType, cheat_mode: bool) -> Self {
        Self { boost_tile, brake_tile, cheat_mode }
    }

    pub fn boost_tile(&self) -> &TileType { &self.boost_tile }
    pub fn brake_tile(&self) -> &TileType { &self.brake_tile }
    pub fn cheat_mode(&self) -> bool { self.cheat_mode }

    /// Classify the segment at `at` and the tile directly beneath it.
    ///
    /// Cheat mode forces `has_boost_tile_below`; the brake check always looks
    /// at the real tile.
    pub fn classify<W: TrackWorld + ?Sized>(&self, world: &W, at: BlockPos) -> TrackContext {
        let segment = world.tile_at(at);
        if !segment.kind.is_powered_track() {
            return TrackContext::inert();
        }

        let below = world.tile_at(at.below()).kind;
        TrackContext {
            is_powered_segment: true,
            has_boost_tile_below: self.cheat_mode || below == self.boost_tile,
            has_brake_tile_below: below == self.brake_tile,
            segment_is_active: segment.powered,
        }
    }
}
