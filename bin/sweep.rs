use std::{fs::File, io::Write, time::Instant};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use knn_classify::{Classifier, KnnParams, Point, Strategy};
use knn_classify::eval::{agreement_rate, reference_classify, wilson_lower_bound};
use knn_classify::synth::{self, BlobParams};

#[derive(Clone, Copy, ValueEnum, Debug, PartialEq)]
enum StrategyArg { Heap, Sorted, Both }

#[derive(Parser, Debug)]
#[command(name="knn-sweep", about="Latency and agreement sweep over k, threads and selector strategy")]
struct Args {
    #[arg(long, default_value_t=64)] groups: usize,
    #[arg(long, default_value_t=100)] min_points: usize,
    #[arg(long, default_value_t=20000)] max_points: usize,
    #[arg(long, default_value_t=3.0)] spread: f32,
    #[arg(long, default_value="1,8,32")] k: String,
    #[arg(long, default_value="1,2,4,8")] threads: String,
    #[arg(long, value_enum, default_value_t=StrategyArg::Both)] strategy: StrategyArg,
    #[arg(long, default_value_t=100)] queries: usize,
    #[arg(long, default_value_t=5)] warmup: usize,
    #[arg(long, default_value_t=42)] seed_data: u64,
    #[arg(long, default_value_t=999)] seed_queries: u64,
    #[arg(long)] csv: Option<String>,
    /// Exit non-zero if any config disagrees with the reference classifier
    #[arg(long, default_value_t=false)] enforce: bool,
}

fn parse_list(s: &str) -> Vec<usize> { s.split(',').filter_map(|t| t.trim().parse::<usize>().ok()).collect() }
fn percentile_us(v: &mut [u128], p: f64) -> u128 {
    if v.is_empty() { return 0; }
    v.sort_unstable();
    let idx = ((p * (v.len() as f64 - 1.0)).round() as usize).min(v.len()-1);
    v[idx]
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let t0 = Instant::now();
    let groups = synth::blobs(&BlobParams {
        groups: args.groups, min_points: args.min_points, max_points: args.max_points,
        spread: args.spread, seed: args.seed_data,
    });
    let queries: Vec<Point> = synth::queries(args.warmup + args.queries, args.seed_queries);
    let total: usize = groups.iter().map(|g| g.len()).sum();
    info!(groups = groups.len(), points = total, ms = t0.elapsed().as_millis() as u64, "dataset built");

    let strategies: Vec<Strategy> = match args.strategy {
        StrategyArg::Heap => vec![Strategy::Heap],
        StrategyArg::Sorted => vec![Strategy::Sorted],
        StrategyArg::Both => vec![Strategy::Heap, Strategy::Sorted],
    };
    let k_list = parse_list(&args.k);
    let thread_list = parse_list(&args.threads);

    let mut csv: Option<Box<dyn Write>> = if let Some(path) = args.csv.as_ref() {
        let mut f = File::create(path).expect("csv open");
        writeln!(f, "strategy,k,threads,points,agree,lb95,p50_us,p95_us,p99_us,qps,det,invariant").ok();
        Some(Box::new(f))
    } else { None };

    println!("{:>8} {:>5} {:>7} {:>8} {:>8} {:>10} {:>10} {:>10}", "strategy","k","threads","agree","lb95","p50(ms)","p95(ms)","QPS");

    let mut failed = false;
    for &k in &k_list {
        let timed = &queries[args.warmup..];
        let truth: Vec<Option<char>> = timed.iter().map(|q| reference_classify(&groups, *q, k)).collect();

        for &strategy in &strategies {
            // labels from the single-worker run, to check worker-count invariance
            let mut baseline: Option<Vec<Option<char>>> = None;

            for &threads in &thread_list {
                let params = KnnParams::new(k).with_threads(threads).with_strategy(strategy);
                let clf = match Classifier::new(params) {
                    Ok(c) => c,
                    Err(e) => { eprintln!("skip k={k}: {e}"); continue; }
                };
                for q in &queries[..args.warmup] { let _ = clf.classify(&groups, *q); }

                let mut lat_us: Vec<u128> = Vec::with_capacity(timed.len());
                let mut got: Vec<Option<char>> = Vec::with_capacity(timed.len());
                let mut det = true;
                for q in timed {
                    let t = Instant::now();
                    let a = clf.classify(&groups, *q).ok();
                    lat_us.push(t.elapsed().as_micros());
                    if clf.classify(&groups, *q).ok() != a { det = false; }
                    got.push(a);
                }

                let agree = agreement_rate(&truth, &got);
                let hits = truth.iter().zip(&got).filter(|(a, b)| a == b).count();
                let lb = if got.is_empty() { 1.0 } else { wilson_lower_bound(hits, got.len(), 1.96) as f32 };
                let invariant = match &baseline { Some(b) => *b == got, None => { baseline = Some(got.clone()); true } };

                let mut lat = lat_us.clone();
                let p50 = percentile_us(&mut lat, 0.50) as f64 / 1000.0;
                let p95 = percentile_us(&mut lat, 0.95) as f64 / 1000.0;
                let p99 = percentile_us(&mut lat, 0.99) as f64 / 1000.0;
                let sum_us: u128 = lat_us.iter().sum();
                let qps = if sum_us > 0 { (timed.len() as f64) / (sum_us as f64 / 1_000_000.0) } else { 0.0 };

                let flag = match (det, invariant) {
                    (true, true) => "",
                    (false, _) => "  (non-det)",
                    (true, false) => "  (worker-count divergence)",
                };
                println!("{:>8} {:>5} {:>7} {:>8.3} {:>8.3} {:>10.3} {:>10.3} {:>10.1}{}",
                         format!("{strategy:?}").to_lowercase(), k, threads, agree, lb, p50, p95, qps, flag);

                if let Some(w) = csv.as_mut() {
                    writeln!(w, "{:?},{},{},{},{:.6},{:.6},{:.0},{:.0},{:.0},{:.2},{},{}",
                             strategy, k, threads, total, agree, lb, p50*1000.0, p95*1000.0, p99*1000.0, qps, det, invariant).ok();
                }
                if agree < 1.0 || !det { failed = true; }
            }
        }
    }

    if args.enforce && failed {
        eprintln!("FAIL: at least one config disagreed with the reference classifier or was non-deterministic");
        std::process::exit(1);
    }
}
