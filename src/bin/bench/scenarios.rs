// Scenario Definitions: fixed layouts for the worked examples plus seeded
// random lines for soak runs. Engine untouched: all setup lives here.

use rail_boost_engine::{BlockPos, GridWorld, Tile, TileType, TrackSimulation};

use crate::layout::{LayoutMix, TRACK_Y};

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub enum Layout {
    /// Hand-built world
    Fixed(fn(&mut GridWorld)),
    /// Seeded random line of `length` segments
    Random { length: u32, mix: LayoutMix },
}

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    pub config_toml: &'static str,
    /// Blocks per second; `None` keeps the vanilla speed
    pub speed_rule: Option<u32>,
    pub layout: Layout,
    pub carts: u32,
    pub ticks: u64,
    pub criteria: PassCriteria,
    /// Mid-simulation events (e.g., cut power at a given tick)
    pub mid_event: Option<Box<dyn Fn(&mut TrackSimulation, u64) + Send + Sync>>,
}

pub struct PassCriteria {
    pub min_entered: Option<u32>,
    pub min_demoted: Option<u32>,
    pub min_braked: Option<u32>,
    /// Every cart must end with an empty registry slot
    pub require_all_coasting_at_end: bool,
    /// Destroy every cart at the end; registry must be empty afterwards
    pub require_clean_teardown: bool,
}

impl Default for PassCriteria {
    fn default() -> Self {
        Self {
            min_entered: None,
            min_demoted: None,
            min_braked: None,
            require_all_coasting_at_end: false,
            require_clean_teardown: true,
        }
    }
}

// ─── Fixed Layouts ──────────────────────────────────────────────────────────

/// 20 boost segments then 200 plain powered segments
fn boost_then_plain(world: &mut GridWorld) {
    world.lay_track(0, 19, TRACK_Y, 0, true, &TileType::redstone_block());
    world.lay_track(20, 219, TRACK_Y, 0, true, &TileType::stone());
}

/// Short boost run into a long unpowered brake section
fn boost_into_brake(world: &mut GridWorld) {
    world.lay_track(0, 9, TRACK_Y, 0, true, &TileType::redstone_block());
    world.lay_track(10, 300, TRACK_Y, 0, false, &TileType::soul_sand());
}

/// Boost islands separated by ordinary rail, then plain powered track
fn islands(world: &mut GridWorld) {
    for start in (0..100).step_by(25) {
        world.lay_track(start, start + 4, TRACK_Y, 0, true, &TileType::redstone_block());
        for x in start + 5..start + 25 {
            let pos = BlockPos::new(x, TRACK_Y, 0);
            world.set_tile(pos, Tile::new(TileType::rail()));
            world.set_tile(pos.below(), Tile::new(TileType::stone()));
        }
    }
    world.lay_track(100, 400, TRACK_Y, 0, true, &TileType::stone());
}

/// Plain powered track over stone only
fn plain_line(world: &mut GridWorld) {
    world.lay_track(0, 400, TRACK_Y, 0, true, &TileType::stone());
}

fn cut_power_at_60(sim: &mut TrackSimulation, tick: u64) {
    if tick == 60 {
        for x in 0..=400 {
            sim.world_mut().set_powered(BlockPos::new(x, TRACK_Y, 0), false);
        }
    }
}

// ─── Scenario Table ─────────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "BOOST_ENTER_EXIT",
            label: "Boost line into plain track",
            category: "lifecycle",
            config_toml: "speed_multiplier = 2.0",
            speed_rule: None,
            layout: Layout::Fixed(boost_then_plain),
            carts: 8,
            ticks: 300,
            criteria: PassCriteria {
                min_entered: Some(8),
                min_demoted: Some(8),
                require_all_coasting_at_end: true,
                ..PassCriteria::default()
            },
            mid_event: None,
        },
        Scenario {
            name: "HARD_BRAKE_STOP",
            label: "Boost into brake section",
            category: "brake",
            config_toml: "hard_brake_multiplier = 0.5",
            speed_rule: None,
            layout: Layout::Fixed(boost_into_brake),
            carts: 4,
            ticks: 200,
            criteria: PassCriteria {
                min_entered: Some(4),
                min_braked: Some(4),
                require_all_coasting_at_end: true,
                ..PassCriteria::default()
            },
            mid_event: None,
        },
        Scenario {
            name: "ISLANDS_PERSIST",
            label: "Boost islands between plain rail",
            category: "lifecycle",
            config_toml: "",
            speed_rule: Some(8),
            layout: Layout::Fixed(islands),
            carts: 5,
            ticks: 400,
            criteria: PassCriteria {
                min_entered: Some(5),
                min_demoted: Some(5),
                ..PassCriteria::default()
            },
            mid_event: None,
        },
        Scenario {
            name: "CHEAT_MODE_LINE",
            label: "Cheat mode over plain track",
            category: "cheat",
            config_toml: "cheat_mode = true\nspeed_multiplier = 3.0",
            speed_rule: None,
            layout: Layout::Fixed(plain_line),
            carts: 10,
            ticks: 200,
            criteria: PassCriteria { min_entered: Some(10), ..PassCriteria::default() },
            mid_event: None,
        },
        Scenario {
            name: "POWER_CUT",
            label: "Cheat mode, power cut at tick 60",
            category: "cheat",
            config_toml: "cheat_mode = true\nhard_brake_block = \"stone\"",
            speed_rule: None,
            layout: Layout::Fixed(plain_line),
            carts: 5,
            ticks: 150,
            criteria: PassCriteria {
                min_entered: Some(5),
                min_braked: Some(5),
                ..PassCriteria::default()
            },
            mid_event: Some(Box::new(cut_power_at_60)),
        },
        Scenario {
            name: "RANDOM_SOAK",
            label: "Random line (30% boost, 10% brake)",
            category: "soak",
            config_toml: "",
            speed_rule: None,
            layout: Layout::Random {
                length: 2000,
                mix: LayoutMix { boost: 0.3, brake: 0.1, rail: 0.1 },
            },
            carts: 50,
            ticks: 1000,
            criteria: PassCriteria::default(),
            mid_event: None,
        },
        Scenario {
            name: "RANDOM_FAST_WORLD",
            label: "Random line, 40 blocks/s rule",
            category: "soak",
            config_toml: "speed_multiplier = 8.0",
            speed_rule: Some(40),
            layout: Layout::Random {
                length: 4000,
                mix: LayoutMix { boost: 0.05, brake: 0.02, rail: 0.2 },
            },
            carts: 50,
            ticks: 1000,
            criteria: PassCriteria::default(),
            mid_event: None,
        },
    ]
}
