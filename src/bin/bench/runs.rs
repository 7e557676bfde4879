// Seeded Runs: N runs per scenario with aggregation
// Each scenario runs N times with seeds base..base+N

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rail_boost_engine::*;

use crate::layout::{self, LayoutGenerator, TRACK_Y};
use crate::report::*;
use crate::scenarios::{Layout, Scenario};

use std::time::Instant;

const SPEED_EPS: f64 = 1e-9;

/// Build the world, config and carts for one seeded run.
fn setup(scenario: &Scenario, seed: u64) -> Result<(TrackSimulation, LayoutGenerator), ConfigError> {
    let config = BoostConfig::from_toml_str(scenario.config_toml)?;
    let mut world = GridWorld::new(scenario.name.to_lowercase());
    world.set_speed_rule(scenario.speed_rule);

    let mut gen = LayoutGenerator::new(ChaCha8Rng::seed_from_u64(seed));
    let line_length = match &scenario.layout {
        Layout::Fixed(build) => {
            build(&mut world);
            10
        }
        Layout::Random { length, mix } => {
            let segments = gen.generate(*length, *mix);
            layout::build(&mut world, &segments, &config.boost_block, &config.hard_brake_block);
            *length
        }
    };

    let mut sim = TrackSimulation::with_config(&config, world);
    for i in 0..scenario.carts {
        let x = match scenario.layout {
            Layout::Fixed(_) => (i % line_length) as f64 + 0.5,
            Layout::Random { .. } => gen.jitter(line_length as f64 / 2.0),
        };
        let vx = 0.05 + gen.jitter(0.2);
        sim.add_cart(Location::new(x, TRACK_Y as f64, 0.5), Vec3::new(vx, 0.0, 0.0));
    }
    Ok((sim, gen))
}

/// Run a single scenario iteration with a specific seed.
pub fn run_single(scenario: &Scenario, seed: u64) -> Result<BenchResult, ConfigError> {
    let start = Instant::now();
    let (mut sim, _gen) = setup(scenario, seed)?;

    let mut entered = 0u32;
    let mut demoted = 0u32;
    let mut braked = 0u32;
    let mut peak_boosted = 0usize;
    let mut overspeed_events = 0u32;
    let mut stale_max_speed_events = 0u32;

    for tick in 0..scenario.ticks {
        if let Some(event) = &scenario.mid_event {
            event(&mut sim, tick);
        }

        let result = sim.tick_core();
        entered += result.entered;
        demoted += result.demoted;
        braked += result.braked;
        peak_boosted = peak_boosted.max(result.boosted);

        let boosted_max = sim.boosted_max_speed();
        for view in sim.cart_views() {
            if view.speed > view.max_speed + SPEED_EPS {
                overspeed_events += 1;
            }
            if view.boosted && (view.max_speed - boosted_max).abs() > SPEED_EPS {
                stale_max_speed_events += 1;
            }
        }
    }

    let final_boosted = sim.controller().boosted_count();
    let views = sim.cart_views();
    let mean_final_speed = if views.is_empty() {
        0.0
    } else {
        views.iter().map(|v| v.speed).sum::<f64>() / views.len() as f64
    };

    let mut evicted_at_teardown = 0u32;
    for view in &views {
        if sim.remove_cart(VehicleId(view.id)) == Eviction::Evicted {
            evicted_at_teardown += 1;
        }
    }
    let registry_empty_after_teardown = sim.controller().boosted_count() == 0;

    let c = &scenario.criteria;
    let mut pass = overspeed_events == 0 && stale_max_speed_events == 0;
    if evicted_at_teardown as usize != final_boosted {
        pass = false;
    }
    if let Some(min) = c.min_entered {
        pass &= entered >= min;
    }
    if let Some(min) = c.min_demoted {
        pass &= demoted >= min;
    }
    if let Some(min) = c.min_braked {
        pass &= braked >= min;
    }
    if c.require_all_coasting_at_end && final_boosted > 0 {
        pass = false;
    }
    if c.require_clean_teardown && !registry_empty_after_teardown {
        pass = false;
    }

    let elapsed = start.elapsed();
    let elapsed_secs = elapsed.as_secs_f64().max(0.001);
    let move_events = scenario.ticks as f64 * scenario.carts as f64;

    if !pass {
        tracing::warn!(scenario = scenario.name, seed, overspeed_events, stale_max_speed_events, "run failed");
    }

    Ok(BenchResult {
        scenario: scenario.label.to_string(),
        name: scenario.name.to_string(),
        category: scenario.category.to_string(),
        seed,
        pass,
        carts: scenario.carts,
        ticks: scenario.ticks,
        entered,
        demoted,
        braked,
        peak_boosted,
        final_boosted,
        overspeed_events,
        stale_max_speed_events,
        evicted_at_teardown,
        registry_empty_after_teardown,
        mean_final_speed,
        elapsed_ms: elapsed.as_millis(),
        events_per_sec: move_events / elapsed_secs,
    })
}

/// Run N seeds of a scenario and aggregate.
pub fn run_scenario(scenario: &Scenario, n_runs: usize, base_seed: u64) -> Result<ScenarioReport, ConfigError> {
    let mut results = Vec::with_capacity(n_runs);
    for i in 0..n_runs {
        results.push(run_single(scenario, base_seed + i as u64)?);
    }
    Ok(aggregate(scenario, results))
}

fn aggregate(scenario: &Scenario, results: Vec<BenchResult>) -> ScenarioReport {
    let n = results.len();
    let passed = results.iter().filter(|r| r.pass).count();
    let stat = |f: fn(&BenchResult) -> f64| {
        Stats::from_samples(&results.iter().map(f).collect::<Vec<_>>())
    };

    ScenarioReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        category: scenario.category.to_string(),
        n_runs: n,
        pass_rate: if n > 0 { passed as f64 / n as f64 } else { 0.0 },
        entered: stat(|r| r.entered as f64),
        demoted: stat(|r| r.demoted as f64),
        braked: stat(|r| r.braked as f64),
        peak_boosted: stat(|r| r.peak_boosted as f64),
        mean_final_speed: stat(|r| r.mean_final_speed),
        elapsed_ms: stat(|r| r.elapsed_ms as f64),
        events_per_sec: stat(|r| r.events_per_sec),
        individual_runs: results,
    }
}
