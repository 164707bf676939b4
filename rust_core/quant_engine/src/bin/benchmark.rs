use chrono::Utc;
use log::info;
use quant_engine_core::parallel::hardware_threads;
use quant_engine_core::{get_weights_ffd, Engine, FracDiffParams};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::Serialize;
use std::env;
use std::time::Instant;

fn print_usage() {
    eprintln!(
        "Usage: benchmark [--size <n>] [--window <w>] [--d <order>] [--threshold <t>] \
         [--workers <n,n,...>] [--seed <u64>]"
    );
}

#[derive(Serialize)]
struct Timing {
    transform: &'static str,
    workers: usize,
    millis: f64,
    output_len: usize,
    matches_single_worker: bool,
}

#[derive(Serialize)]
struct Report {
    generated_at: String,
    size: usize,
    window: usize,
    d: f64,
    threshold: f64,
    weight_width: usize,
    timings: Vec<Timing>,
}

/// Random walk `cumsum(randn + 100)`.
fn price_path(size: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut level = 0.0;
    (0..size)
        .map(|_| {
            let step: f64 = rng.sample(StandardNormal);
            level += step + 100.0;
            level
        })
        .collect()
}

fn same_bits(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    let mut size = 1_000_000usize;
    let mut window = 100usize;
    let mut d = 0.4f64;
    let mut threshold = 1e-4f64;
    let mut seed = 42u64;
    let mut workers: Vec<usize> = vec![1, hardware_threads()];

    let mut i = 1;
    while i < args.len() {
        let value = match args.get(i + 1) {
            Some(v) => v.as_str(),
            None => {
                print_usage();
                return Ok(());
            }
        };
        match args[i].as_str() {
            "--size" => size = value.parse()?,
            "--window" => window = value.parse()?,
            "--d" => d = value.parse()?,
            "--threshold" => threshold = value.parse()?,
            "--seed" => seed = value.parse()?,
            "--workers" => {
                workers = value
                    .split(',')
                    .map(|w| w.trim().parse::<usize>())
                    .collect::<Result<Vec<usize>, _>>()?;
            }
            _ => {
                print_usage();
                return Ok(());
            }
        }
        i += 2;
    }
    // single-worker run first, it is the reference for the others
    workers.push(1);
    workers.sort_unstable();
    workers.dedup();

    let prices = price_path(size, seed);
    let params = FracDiffParams::new(d, threshold);
    let weight_width = get_weights_ffd(d, threshold)?.len();
    info!("benchmarking {} values, window {}, ffd width {}", size, window, weight_width);

    let mut timings = Vec::new();
    let mut vol_ref: Option<Vec<f64>> = None;
    let mut diff_ref: Option<Vec<f64>> = None;
    for &n in &workers {
        let engine = Engine::with_workers(n)?;
        // warm the pool before timing
        engine.rolling_volatility(&prices[..prices.len().min(1000)], window)?;

        let start = Instant::now();
        let vol = engine.rolling_volatility(&prices, window)?;
        let millis = start.elapsed().as_secs_f64() * 1e3;
        let reference = vol_ref.get_or_insert_with(|| vol.clone());
        timings.push(Timing {
            transform: "calculate_volatility",
            workers: n,
            millis,
            output_len: vol.len(),
            matches_single_worker: same_bits(&vol, reference),
        });

        let start = Instant::now();
        let diff = engine.fractional_diff(&prices, &params)?;
        let millis = start.elapsed().as_secs_f64() * 1e3;
        let reference = diff_ref.get_or_insert_with(|| diff.clone());
        timings.push(Timing {
            transform: "fractional_diff",
            workers: n,
            millis,
            output_len: diff.len(),
            matches_single_worker: same_bits(&diff, reference),
        });
    }

    let report = Report {
        generated_at: Utc::now().to_rfc3339(),
        size,
        window,
        d,
        threshold,
        weight_width,
        timings,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
