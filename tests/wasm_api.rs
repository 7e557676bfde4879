//! JS-facing surface of `TrackSimulation`. Run with `wasm-pack test --node`.
#![cfg(target_arch = "wasm32")]

use rail_boost_engine::{CartView, TickResult, TrackSimulation};
use wasm_bindgen_test::*;

fn boost_line() -> TrackSimulation {
    let mut sim = TrackSimulation::new("speed_multiplier = 2.0", "overworld").unwrap();
    sim.lay_track(0, 19, 64, 0, true, "minecraft:redstone_block").unwrap();
    sim.lay_track(20, 60, 64, 0, true, "stone").unwrap();
    sim
}

#[wasm_bindgen_test]
fn constructor_rejects_bad_config() {
    assert!(TrackSimulation::new("speed_multiplier = -1.0", "overworld").is_err());
    assert!(TrackSimulation::new("speed_multiplier = [", "overworld").is_err());
    assert!(TrackSimulation::new("", "overworld").is_ok());
}

#[wasm_bindgen_test]
fn lay_track_rejects_empty_tile_name() {
    let mut sim = TrackSimulation::new("", "overworld").unwrap();
    assert!(sim.lay_track(0, 3, 64, 0, true, "  ").is_err());
    assert!(sim.set_tile(0, 64, 0, "", false).is_err());
}

#[wasm_bindgen_test]
fn tick_returns_result_object() {
    let mut sim = boost_line();
    let id = sim.spawn_cart(0.5, 64.0, 0.5, 0.1, 0.0);

    let result: TickResult = serde_wasm_bindgen::from_value(sim.tick()).unwrap();
    assert_eq!(result.tick, 1);
    assert_eq!(result.carts, 1);
    assert_eq!(result.entered, 1);
    assert_eq!(sim.boosted_count(), 1);

    let carts: Vec<CartView> = serde_wasm_bindgen::from_value(sim.get_carts()).unwrap();
    assert_eq!(carts.len(), 1);
    assert_eq!(carts[0].id, id);
    assert!(carts[0].boosted);
    assert!((carts[0].max_speed - 0.8).abs() < 1e-12);

    assert!(sim.destroy_cart(id));
    assert!(!sim.destroy_cart(id));
}

#[wasm_bindgen_test]
fn drain_debug_collects_lines_once() {
    let mut sim = boost_line();
    let empty: Vec<String> = serde_wasm_bindgen::from_value(sim.drain_debug()).unwrap();
    assert!(empty.is_empty());

    sim.enable_debug(false);
    sim.enable_debug(false);
    let id = sim.spawn_cart(0.5, 64.0, 0.5, 0.1, 0.0);
    sim.run_batch(1);
    sim.destroy_cart(id);

    let lines: Vec<String> = serde_wasm_bindgen::from_value(sim.drain_debug()).unwrap();
    assert_eq!(
        lines,
        vec![format!("minecart [{}] added", id), format!("minecart [{}] evicted", id)]
    );
    let again: Vec<String> = serde_wasm_bindgen::from_value(sim.drain_debug()).unwrap();
    assert!(again.is_empty());

    assert!(sim.disable_debug());
}
