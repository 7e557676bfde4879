// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rail Boost Engine - Type Definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};

/// Simulation ticks per second. Speeds are stored in metres (blocks) per tick.
pub const TICKS_PER_SECOND: f64 = 20.0;

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Entity id assigned by the host simulation. Stable for the lifetime of the
/// vehicle within one session, never reused while the vehicle exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VehicleId(pub i32);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for VehicleId {
    fn from(id: i32) -> Self { VehicleId(id) }
}

/// World name, used to key per-world lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldId(pub String);

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WorldId {
    fn from(s: &str) -> Self { WorldId(s.to_string()) }
}

impl From<String> for WorldId {
    fn from(s: String) -> Self { WorldId(s) }
}

// ─── Vehicle Kind ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleKind {
    Minecart = 0,
    Other = 1,
}

impl VehicleKind {
    pub fn is_rail_bound(&self) -> bool {
        matches!(self, Self::Minecart)
    }
}

// ─── Vec3 ────────────────────────────────────────────────────────────────────

/// Velocity vector in metres per tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    /// Heading substituted when a stationary cart has to be given a speed.
    pub const DEFAULT_HEADING: Vec3 = Vec3 { x: 1.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    pub fn normalize(&self) -> Option<Vec3> {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Some(self.scale(1.0 / len))
        } else {
            None
        }
    }

    pub fn scale(&self, factor: f64) -> Vec3 {
        Vec3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Same direction, rescaled to `magnitude`. Zero vectors take
    /// [`Vec3::DEFAULT_HEADING`].
    pub fn with_length(&self, magnitude: f64) -> Vec3 {
        self.normalize()
            .unwrap_or(Self::DEFAULT_HEADING)
            .scale(magnitude)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f64) -> Vec3 {
        self.scale(rhs)
    }
}

// ─── Positions ───────────────────────────────────────────────────────────────

/// Integer tile coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn below(&self) -> BlockPos {
        BlockPos::new(self.x, self.y - 1, self.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Continuous position of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Tile containing this location (each axis floored).
    pub fn block(&self) -> BlockPos {
        BlockPos::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }

    pub fn offset(&self, v: Vec3) -> Location {
        Location::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

// ─── Tiles ───────────────────────────────────────────────────────────────────

/// Normalized tile identifier.
///
/// Names are lowercased, trimmed, and stripped of a `minecraft:` namespace so
/// that `"minecraft:Redstone_Block"` and `"redstone_block"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TileType(String);

impl TileType {
    /// Parse a tile name. Returns `None` for empty names.
    pub fn parse(name: &str) -> Option<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        let bare = lowered.strip_prefix("minecraft:").unwrap_or(&lowered);
        if bare.is_empty() {
            return None;
        }
        Some(Self(bare.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn air() -> Self { Self("air".to_string()) }
    pub fn rail() -> Self { Self("rail".to_string()) }
    pub fn powered_rail() -> Self { Self("powered_rail".to_string()) }
    pub fn redstone_block() -> Self { Self("redstone_block".to_string()) }
    pub fn soul_sand() -> Self { Self("soul_sand".to_string()) }
    pub fn stone() -> Self { Self("stone".to_string()) }

    /// Track variant capable of carrying an electrical activation state.
    pub fn is_powered_track(&self) -> bool {
        self.0 == "powered_rail"
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TileType {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        TileType::parse(&s).ok_or(s)
    }
}

impl From<TileType> for String {
    fn from(t: TileType) -> Self { t.0 }
}

/// A tile together with its electrical state. `powered` is only meaningful
/// for powered-type track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileType,
    #[serde(default)]
    pub powered: bool,
}

impl Tile {
    pub fn new(kind: TileType) -> Self {
        Self { kind, powered: false }
    }

    pub fn air() -> Self {
        Self::new(TileType::air())
    }

    pub fn powered_rail(powered: bool) -> Self {
        Self { kind: TileType::powered_rail(), powered }
    }
}

impl Default for Tile {
    fn default() -> Self { Tile::air() }
}
