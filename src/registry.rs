// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rail Boost Engine - Boost Registry

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::VehicleId;

/// Per-vehicle state while boosted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleBoostRecord {
    /// Reset on every refresh. Nothing reads it yet.
    // TODO: decay boosted speed once a cart has coasted N segments without a boost tile.
    pub coasted_segment_count: u32,
}

/// Vehicles currently in the boosted regime. A key is present exactly while
/// the vehicle is boosted.
#[derive(Debug, Default)]
pub struct BoostRegistry {
    records: HashMap<VehicleId, VehicleBoostRecord>,
}

impl BoostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: VehicleId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn get(&self, id: VehicleId) -> Option<&VehicleBoostRecord> {
        self.records.get(&id)
    }

    /// Insert a fresh record. Returns `false` if one was already present, in
    /// which case it is left untouched.
    pub fn insert(&mut self, id: VehicleId) -> bool {
        if self.records.contains_key(&id) {
            return false;
        }
        self.records.insert(id, VehicleBoostRecord::default());
        true
    }

    /// Reset the coasting counter. Returns `false` if the vehicle is not boosted.
    pub fn refresh(&mut self, id: VehicleId) -> bool {
        match self.records.get_mut(&id) {
            Some(record) => {
                record.coasted_segment_count = 0;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: VehicleId) -> Option<VehicleBoostRecord> {
        self.records.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
