// Rail Boost Benchmark Runner v0.1.0
// Seeded runs per scenario, per-tick invariant checks, JSON report
//
// Usage:
//   cargo run --release --bin bench                     # Run all scenarios (10 runs each)
//   cargo run --release --bin bench -- --runs 3         # Quick mode
//   cargo run --release --bin bench -- RANDOM           # Filter by name
//   cargo run --release --bin bench -- --seed 42        # Custom base seed
//
// Log level via RUST_LOG (default rail_boost_engine=warn,bench=info).

mod layout;
mod report;
mod runs;
mod scenarios;

use report::*;
use scenarios::*;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        runs: 10,
        seed: 0,
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(10);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            _ => {
                tracing::warn!(argument = %args[i], "unknown argument");
            }
        }
        i += 1;
    }

    cli
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rail_boost_engine=warn,bench=info".into()),
        )
        .init();

    let cli = parse_args();
    let all_scenarios = scenarios();

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios.iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower)
                          || s.label.to_lowercase().contains(&f_lower)
                          || s.category.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        return Err(format!("no scenarios match filter: {:?}", cli.filter).into());
    }

    println!("\n  Rail Boost Benchmark Runner v0.1.0");
    println!("  PRNG: ChaCha8Rng | Runs/scenario: {} | Base seed: {}", cli.runs, cli.seed);
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!("  {:<36} {:>5} {:>8} {:>8} {:>8} {:>7} {:>12} {:>7}",
        "Scenario", "Pass%", "Entered", "Demoted", "Braked", "Peak", "Events/s", "Time");
    println!("  {}", "-".repeat(100));

    let suite_start = Instant::now();
    let mut reports = Vec::new();

    for scenario in &to_run {
        let report = runs::run_scenario(scenario, cli.runs, cli.seed)?;
        let pass_pct = report.pass_rate * 100.0;
        let status = if report.pass_rate >= 1.0 { "PASS" } else { "FAIL" };

        println!("  {:<36} {:>4}% {:>8.1} {:>8.1} {:>8.1} {:>7.1} {:>12.0} {:>5.0}ms  {}",
            report.label,
            pass_pct as u32,
            report.entered.mean,
            report.demoted.mean,
            report.braked.mean,
            report.peak_boosted.mean,
            report.events_per_sec.mean,
            report.elapsed_ms.mean,
            status,
        );

        reports.push(report);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Summary ────────────────────────────────────────────────────────

    let total = reports.len();
    let passed = reports.iter().filter(|r| r.pass_rate >= 1.0).count();
    let failed = total - passed;

    println!("  {}", "-".repeat(100));
    println!("  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        total, passed, failed, suite_elapsed.as_secs_f64());

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
    let timestamp = format!("{}", ts);

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: "0.1.0",
        prng: "ChaCha8Rng",
        n_runs_per_scenario: cli.runs,
        summary: Summary {
            total,
            passed,
            failed,
            pass_rate: passed as f64 / total as f64,
        },
        scenarios: reports,
    };

    let dir = std::path::Path::new("benchmark-results");
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("bench-{}.json", timestamp));
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&path, &json)?;
    tracing::info!(path = %path.display(), "results saved");
    println!("  Results saved to: {}\n", path.display());

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
