// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rail Boost Engine - Vehicle Boost State Machine

//! Per-tick boost/brake decisions for rail-bound vehicles.
//!
//! A vehicle is either **coasting** (no registry record) or **boosted**
//! (record present). Transitions only happen on powered track:
//!
//! | state    | boost tile below | action                                   | next     |
//! |----------|------------------|------------------------------------------|----------|
//! | coasting | yes              | insert record, max speed = boosted       | boosted  |
//! | boosted  | yes              | reset counter, re-apply max speed if off | boosted  |
//! | boosted  | no               | drop record, reset max speed + velocity  | coasting |
//! | coasting | no               | nothing                                  | coasting |
//!
//! Braking is independent of the state: an inactive segment over the brake
//! tile scales velocity by the hard-brake multiplier every tick.

use serde::{Deserialize, Serialize};

use crate::classifier::TrackClassifier;
use crate::config::BoostConfig;
use crate::debug::DebugSubscribers;
use crate::default_speed::DefaultSpeedCache;
use crate::registry::{BoostRegistry, VehicleBoostRecord};
use crate::types::{Location, VehicleId};
use crate::world::{TrackWorld, Vehicle};

// ─── Outcomes ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// Not a rail-bound vehicle.
    Ignored,
    /// Not on powered track; any existing record is left alone.
    OffPoweredTrack,
    /// Coasting → boosted.
    Entered,
    /// Stayed boosted.
    Refreshed { speed_reapplied: bool },
    /// Boosted → coasting.
    Demoted,
    /// Stayed coasting on powered track.
    Coasting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub transition: Transition,
    pub braked: bool,
}

impl MoveOutcome {
    fn inert(transition: Transition) -> Self {
        Self { transition, braked: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Eviction {
    Evicted,
    AlreadyCleared,
}

// ─── BoostController ─────────────────────────────────────────────────────────

/// Owns the boost registry and applies the state machine on each host event.
#[derive(Debug)]
pub struct BoostController {
    classifier: TrackClassifier,
    registry: BoostRegistry,
    default_speed: DefaultSpeedCache,
    debuggers: DebugSubscribers,
    speed_multiplier: f64,
    hard_brake_multiplier: f64,
}

impl BoostController {
    /// Build from a config that has already passed [`BoostConfig::validate`].
    pub fn new(config: &BoostConfig) -> Self {
        tracing::info!(
            boost = %config.boost_block,
            brake = %config.hard_brake_block,
            speed_multiplier = config.speed_multiplier,
            hard_brake_multiplier = config.hard_brake_multiplier,
            cheat_mode = config.cheat_mode,
            "boost controller ready"
        );
        Self {
            classifier: TrackClassifier::new(
                config.boost_block.clone(),
                config.hard_brake_block.clone(),
                config.cheat_mode,
            ),
            registry: BoostRegistry::new(),
            default_speed: DefaultSpeedCache::new(),
            debuggers: DebugSubscribers::new(),
            speed_multiplier: config.speed_multiplier,
            hard_brake_multiplier: config.hard_brake_multiplier,
        }
    }

    pub fn debuggers_mut(&mut self) -> &mut DebugSubscribers {
        &mut self.debuggers
    }

    pub fn default_speed_mut(&mut self) -> &mut DefaultSpeedCache {
        &mut self.default_speed
    }

    pub fn classifier(&self) -> &TrackClassifier {
        &self.classifier
    }

    pub fn is_boosted(&self, id: VehicleId) -> bool {
        self.registry.contains(id)
    }

    pub fn record(&self, id: VehicleId) -> Option<&VehicleBoostRecord> {
        self.registry.get(id)
    }

    pub fn boosted_count(&self) -> usize {
        self.registry.len()
    }

    pub fn boosted_max_speed<W: TrackWorld + ?Sized>(&mut self, world: &W) -> f64 {
        self.default_speed.obtain(world) * self.speed_multiplier
    }

    /// Vehicle moved from `from` to `to` this tick.
    pub fn on_vehicle_move<W, V>(
        &mut self,
        world: &W,
        vehicle: &mut V,
        from: Location,
        to: Location,
    ) -> MoveOutcome
    where
        W: TrackWorld + ?Sized,
        V: Vehicle + ?Sized,
    {
        if !vehicle.kind().is_rail_bound() {
            return MoveOutcome::inert(Transition::Ignored);
        }

        if !self.debuggers.is_empty() && from.block() != to.block() {
            let v = vehicle.velocity();
            self.debuggers.log_with(true, || {
                format!("velocity: [{:.6} {:.6}] |{:.6}|", v.x, v.z, v.length())
            });
        }

        let id = vehicle.id();
        let default_speed = self.default_speed.obtain(world);
        let boosted_max_speed = default_speed * self.speed_multiplier;

        let ctx = self.classifier.classify(world, vehicle.location().block());
        if !ctx.is_powered_segment {
            return MoveOutcome::inert(Transition::OffPoweredTrack);
        }

        let transition = if ctx.has_boost_tile_below {
            if self.registry.insert(id) {
                vehicle.set_max_speed(boosted_max_speed);
                tracing::debug!(vehicle = %id, max_speed = boosted_max_speed, "boost entered");
                self.debuggers.log(false, &format!("minecart [{}] added", id));
                Transition::Entered
            } else {
                self.registry.refresh(id);
                let speed_reapplied = vehicle.max_speed() != boosted_max_speed;
                if speed_reapplied {
                    vehicle.set_max_speed(boosted_max_speed);
                    tracing::debug!(vehicle = %id, max_speed = boosted_max_speed, "boost refreshed");
                    self.debuggers
                        .log(false, &format!("minecart [{}] max speed refreshed", id));
                }
                Transition::Refreshed { speed_reapplied }
            }
        } else if self.registry.remove(id).is_some() {
            vehicle.set_max_speed(default_speed);
            vehicle.set_velocity(vehicle.velocity().with_length(default_speed));
            tracing::debug!(vehicle = %id, max_speed = default_speed, "boost dropped");
            self.debuggers.log(
                false,
                &format!("minecart [{}] speed and velocity reset on normal powered rail", id),
            );
            Transition::Demoted
        } else {
            Transition::Coasting
        };

        let braked = ctx.should_brake();
        if braked {
            let slowed = vehicle.velocity() * self.hard_brake_multiplier;
            vehicle.set_velocity(slowed);
            tracing::trace!(vehicle = %id, speed = slowed.length(), "hard brake");
        }

        MoveOutcome { transition, braked }
    }

    /// Vehicle left the simulation. Always succeeds; absence is reported, not
    /// an error.
    pub fn on_vehicle_removed(&mut self, id: VehicleId) -> Eviction {
        if self.registry.remove(id).is_some() {
            self.debuggers.log(false, &format!("minecart [{}] evicted", id));
            Eviction::Evicted
        } else {
            self.debuggers
                .log(false, &format!("minecart [{}] was already cleared", id));
            Eviction::AlreadyCleared
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::MemorySubscriber;
    use crate::simulation::{Cart, GridWorld};
    use crate::types::{BlockPos, TileType, Vec3, VehicleKind};

    const EPS: f64 = 1e-9;

    /// World with default speed 8.0 (rule 160 blocks/s) and three segments
    /// along x at y = 64: boost, plain powered, brake.
    fn world() -> GridWorld {
        let mut w = GridWorld::new("overworld");
        w.set_speed_rule(Some(160));
        w.lay_segment(BlockPos::new(0, 64, 0), true, TileType::redstone_block());
        w.lay_segment(BlockPos::new(1, 64, 0), true, TileType::stone());
        w.lay_segment(BlockPos::new(2, 64, 0), false, TileType::soul_sand());
        w
    }

    fn controller(speed_multiplier: f64, cheat_mode: bool) -> BoostController {
        BoostController::new(&BoostConfig {
            speed_multiplier,
            hard_brake_multiplier: 0.5,
            cheat_mode,
            ..BoostConfig::default()
        })
    }

    fn cart_at(x: f64, velocity: Vec3) -> Cart {
        let mut cart = Cart::new(VehicleId(42), crate::types::Location::new(x + 0.5, 64.0, 0.5));
        cart.velocity = velocity;
        cart
    }

    fn step(c: &mut BoostController, w: &GridWorld, cart: &mut Cart) -> MoveOutcome {
        let at = cart.location;
        c.on_vehicle_move(w, cart, at, at)
    }

    #[test]
    fn entering_boost_sets_multiplied_max_speed() {
        let w = world();
        let mut c = controller(2.0, false);
        let mut cart = cart_at(0.0, Vec3::new(1.0, 0.0, 0.0));
        let out = step(&mut c, &w, &mut cart);
        assert_eq!(out.transition, Transition::Entered);
        assert!(!out.braked);
        assert_eq!(cart.max_speed, 16.0);
        assert!(c.is_boosted(VehicleId(42)));
        assert_eq!(c.record(VehicleId(42)).unwrap().coasted_segment_count, 0);
    }

    #[test]
    fn refresh_is_idempotent() {
        let w = world();
        let mut c = controller(2.0, false);
        let mut cart = cart_at(0.0, Vec3::new(1.0, 0.0, 0.0));
        step(&mut c, &w, &mut cart);
        for _ in 0..3 {
            let out = step(&mut c, &w, &mut cart);
            assert_eq!(out.transition, Transition::Refreshed { speed_reapplied: false });
            assert_eq!(cart.max_speed, 16.0);
            assert_eq!(c.boosted_count(), 1);
        }
    }

    #[test]
    fn refresh_reapplies_stale_max_speed() {
        let w = world();
        let mut c = controller(2.0, false);
        let mut cart = cart_at(0.0, Vec3::ZERO);
        step(&mut c, &w, &mut cart);
        cart.max_speed = 0.4;
        let out = step(&mut c, &w, &mut cart);
        assert_eq!(out.transition, Transition::Refreshed { speed_reapplied: true });
        assert_eq!(cart.max_speed, 16.0);
    }

    #[test]
    fn demotion_rescales_velocity_to_default_speed() {
        let w = world();
        let mut c = controller(2.0, false);
        let mut cart = cart_at(0.0, Vec3::new(3.0, 0.0, 4.0));
        step(&mut c, &w, &mut cart);

        cart.location.x = 1.5;
        let out = step(&mut c, &w, &mut cart);
        assert_eq!(out.transition, Transition::Demoted);
        assert!(!c.is_boosted(VehicleId(42)));
        assert_eq!(cart.max_speed, 8.0);
        assert!((cart.velocity.x - 4.8).abs() < EPS);
        assert!(cart.velocity.y.abs() < EPS);
        assert!((cart.velocity.z - 6.4).abs() < EPS);
        assert!((cart.velocity.length() - 8.0).abs() < EPS);
    }

    #[test]
    fn demotion_of_stationary_cart_uses_default_heading() {
        let w = world();
        let mut c = controller(2.0, false);
        let mut cart = cart_at(0.0, Vec3::ZERO);
        step(&mut c, &w, &mut cart);
        cart.location.x = 1.5;
        step(&mut c, &w, &mut cart);
        assert_eq!(cart.velocity, Vec3::new(8.0, 0.0, 0.0));
    }

    #[test]
    fn coasting_on_plain_powered_rail_is_noop() {
        let w = world();
        let mut c = controller(2.0, false);
        let mut cart = cart_at(1.0, Vec3::new(0.3, 0.0, 0.0));
        cart.max_speed = 0.4;
        let out = step(&mut c, &w, &mut cart);
        assert_eq!(out, MoveOutcome { transition: Transition::Coasting, braked: false });
        assert_eq!(cart.max_speed, 0.4);
        assert_eq!(cart.velocity, Vec3::new(0.3, 0.0, 0.0));
        assert_eq!(c.boosted_count(), 0);
    }

    #[test]
    fn off_track_leaves_everything_untouched() {
        let w = world();
        let mut c = controller(2.0, false);
        let mut cart = cart_at(0.0, Vec3::new(0.3, 0.0, 0.0));
        step(&mut c, &w, &mut cart);

        cart.location.x = 10.5;
        cart.velocity = Vec3::new(0.7, 0.0, 0.1);
        let out = step(&mut c, &w, &mut cart);
        assert_eq!(out.transition, Transition::OffPoweredTrack);
        assert!(c.is_boosted(VehicleId(42)), "record persists off powered track");
        assert_eq!(cart.max_speed, 16.0);
        assert_eq!(cart.velocity, Vec3::new(0.7, 0.0, 0.1));
    }

    #[test]
    fn hard_brake_scales_velocity() {
        let w = world();
        let mut c = controller(2.0, false);
        let mut cart = cart_at(2.0, Vec3::new(10.0, 0.0, 0.0));
        let out = step(&mut c, &w, &mut cart);
        assert!(out.braked);
        assert_eq!(out.transition, Transition::Coasting);
        assert_eq!(cart.velocity, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn demotion_then_brake_on_same_tick() {
        let w = world();
        let mut c = controller(2.0, false);
        let mut cart = cart_at(0.0, Vec3::new(1.0, 0.0, 0.0));
        step(&mut c, &w, &mut cart);
        cart.location.x = 2.5;
        let out = step(&mut c, &w, &mut cart);
        assert_eq!(out.transition, Transition::Demoted);
        assert!(out.braked);
        assert!((cart.velocity.x - 4.0).abs() < EPS);
    }

    #[test]
    fn cheat_mode_boosts_anywhere_on_powered_track() {
        let w = world();
        let mut c = controller(3.0, true);
        let mut cart = cart_at(1.0, Vec3::ZERO);
        assert_eq!(step(&mut c, &w, &mut cart).transition, Transition::Entered);
        assert_eq!(cart.max_speed, 24.0);

        cart.location.x = 2.5;
        cart.velocity = Vec3::new(2.0, 0.0, 0.0);
        let out = step(&mut c, &w, &mut cart);
        assert_eq!(out.transition, Transition::Refreshed { speed_reapplied: false });
        assert!(out.braked, "brake tile is still real under cheat mode");
        assert_eq!(cart.velocity, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn non_rail_vehicles_are_ignored() {
        let w = world();
        let mut c = controller(2.0, true);
        let mut boat = cart_at(0.0, Vec3::new(1.0, 0.0, 0.0));
        boat.kind = VehicleKind::Other;
        let before = boat.clone();
        let out = step(&mut c, &w, &mut boat);
        assert_eq!(out.transition, Transition::Ignored);
        assert_eq!(boat, before);
        assert_eq!(c.boosted_count(), 0);
    }

    #[test]
    fn removal_is_idempotent_and_logged() {
        let w = world();
        let mut c = controller(2.0, false);
        let sink = MemorySubscriber::new(false);
        c.debuggers_mut().subscribe(Box::new(sink.clone()));

        let mut cart = cart_at(0.0, Vec3::ZERO);
        step(&mut c, &w, &mut cart);
        assert_eq!(c.on_vehicle_removed(VehicleId(42)), Eviction::Evicted);
        assert_eq!(c.on_vehicle_removed(VehicleId(42)), Eviction::AlreadyCleared);
        assert_eq!(c.boosted_count(), 0);
        assert_eq!(
            sink.drain(),
            vec![
                "minecart [42] added",
                "minecart [42] evicted",
                "minecart [42] was already cleared",
            ]
        );
    }

    #[test]
    fn velocity_line_only_on_block_change_and_only_verbose() {
        let w = world();
        let mut c = controller(2.0, false);
        let quiet = MemorySubscriber::new(false);
        let loud = MemorySubscriber::new(true);
        c.debuggers_mut().subscribe(Box::new(quiet.clone()));
        c.debuggers_mut().subscribe(Box::new(loud.clone()));

        let mut cart = cart_at(5.0, Vec3::new(0.3, 0.0, 0.4));
        let here = cart.location;
        c.on_vehicle_move(&w, &mut cart, here, here);
        assert!(loud.drain().is_empty());

        let from = crate::types::Location::new(4.9, 64.0, 0.5);
        c.on_vehicle_move(&w, &mut cart, from, here);
        assert_eq!(loud.drain(), vec!["velocity: [0.300000 0.400000] |0.500000|"]);
        assert!(quiet.drain().is_empty());
    }
}
