// Benchmark Report Types
// Structured output for regression tracking across engine changes

use serde::Serialize;

// ─── Statistics (per-metric aggregation across seeds) ───────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        Self {
            mean,
            std_dev: variance.sqrt(),
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub scenario: String,
    pub name: String,
    pub category: String,
    pub seed: u64,
    pub pass: bool,
    pub carts: u32,
    pub ticks: u64,
    pub entered: u32,
    pub demoted: u32,
    pub braked: u32,
    pub peak_boosted: usize,
    pub final_boosted: usize,
    /// Ticks where a cart's speed exceeded its max speed
    pub overspeed_events: u32,
    /// Boosted carts whose max speed differed from the boosted max speed
    pub stale_max_speed_events: u32,
    pub evicted_at_teardown: u32,
    pub registry_empty_after_teardown: bool,
    pub mean_final_speed: f64,
    pub elapsed_ms: u128,
    pub events_per_sec: f64,
}

// ─── Scenario Report (aggregation across seeds) ─────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario_name: String,
    pub label: String,
    pub category: String,
    pub n_runs: usize,
    pub pass_rate: f64,
    pub entered: Stats,
    pub demoted: Stats,
    pub braked: Stats,
    pub peak_boosted: Stats,
    pub mean_final_speed: Stats,
    pub elapsed_ms: Stats,
    pub events_per_sec: Stats,
    pub individual_runs: Vec<BenchResult>,
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub n_runs_per_scenario: usize,
    pub summary: Summary,
    pub scenarios: Vec<ScenarioReport>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}
