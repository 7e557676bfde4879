// Random Track Layouts: seedable, one straight line along x
// Replaces hand-built worlds for the randomized scenarios

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rail_boost_engine::{BlockPos, GridWorld, Tile, TileType};

/// Track line height. Base tiles sit one below.
pub const TRACK_Y: i32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Active powered rail over the boost tile
    Boost,
    /// Active powered rail over an ordinary tile
    Plain,
    /// Inactive powered rail over the brake tile
    Brake,
    /// Ordinary unpowered rail
    Rail,
}

/// Probability of each segment kind; the remainder is `Plain`.
#[derive(Debug, Clone, Copy)]
pub struct LayoutMix {
    pub boost: f64,
    pub brake: f64,
    pub rail: f64,
}

pub struct LayoutGenerator {
    rng: ChaCha8Rng,
    pub counts: [u32; 4],
}

impl LayoutGenerator {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self { rng, counts: [0; 4] }
    }

    /// Draw `length` segments.
    pub fn generate(&mut self, length: u32, mix: LayoutMix) -> Vec<SegmentKind> {
        (0..length).map(|_| {
            let kind = self.select(mix);
            self.counts[kind as usize] += 1;
            kind
        }).collect()
    }

    fn select(&mut self, mix: LayoutMix) -> SegmentKind {
        let r: f64 = self.rng.gen();
        if r < mix.boost {
            SegmentKind::Boost
        } else if r < mix.boost + mix.brake {
            SegmentKind::Brake
        } else if r < mix.boost + mix.brake + mix.rail {
            SegmentKind::Rail
        } else {
            SegmentKind::Plain
        }
    }

    pub fn jitter(&mut self, max: f64) -> f64 {
        self.rng.gen_range(0.0..max)
    }
}

/// Write segments into `world` starting at x = 0.
pub fn build(world: &mut GridWorld, segments: &[SegmentKind], boost: &TileType, brake: &TileType) {
    let base = TileType::stone();
    for (x, kind) in segments.iter().enumerate() {
        let pos = BlockPos::new(x as i32, TRACK_Y, 0);
        match kind {
            SegmentKind::Boost => world.lay_segment(pos, true, boost.clone()),
            SegmentKind::Plain => world.lay_segment(pos, true, base.clone()),
            SegmentKind::Brake => world.lay_segment(pos, false, brake.clone()),
            SegmentKind::Rail => {
                world.set_tile(pos, Tile::new(TileType::rail()));
                world.set_tile(pos.below(), Tile::new(base.clone()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const MIX: LayoutMix = LayoutMix { boost: 0.3, brake: 0.1, rail: 0.2 };

    #[test]
    fn test_same_seed_same_layout() {
        let a = LayoutGenerator::new(ChaCha8Rng::seed_from_u64(7)).generate(200, MIX);
        let b = LayoutGenerator::new(ChaCha8Rng::seed_from_u64(7)).generate(200, MIX);
        assert_eq!(a, b);
    }

    #[test]
    fn test_mix_proportions() {
        let mut gen = LayoutGenerator::new(ChaCha8Rng::seed_from_u64(42));
        let n = 10000;
        gen.generate(n, MIX);
        let pct = |i: usize| gen.counts[i] as f64 / n as f64 * 100.0;
        assert!((pct(SegmentKind::Boost as usize) - 30.0).abs() < 3.0);
        assert!((pct(SegmentKind::Plain as usize) - 40.0).abs() < 3.0);
        assert!((pct(SegmentKind::Brake as usize) - 10.0).abs() < 3.0);
        assert!((pct(SegmentKind::Rail as usize) - 20.0).abs() < 3.0);
    }

    #[test]
    fn test_build_places_every_segment() {
        let segments = [SegmentKind::Boost, SegmentKind::Plain, SegmentKind::Brake, SegmentKind::Rail];
        let mut world = GridWorld::new("bench");
        build(&mut world, &segments, &TileType::redstone_block(), &TileType::soul_sand());
        assert_eq!(world.tile_count(), 8);
    }
}
