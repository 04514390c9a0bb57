use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process;

use clap::{Parser, ValueEnum};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use knn_classify::record::{read_problem, write_label};
use knn_classify::{Classification, Classifier, InputFormat, KnnParams, ParseError, Problem, Strategy};

#[derive(Clone, Copy, ValueEnum, Debug)]
enum StrategyArg { Heap, Sorted }
impl From<StrategyArg> for Strategy {
    fn from(s: StrategyArg) -> Self { match s { StrategyArg::Heap => Strategy::Heap, StrategyArg::Sorted => Strategy::Sorted } }
}

#[derive(Clone, Copy, ValueEnum, Debug)]
enum FormatArg { Text, Json }
impl From<FormatArg> for InputFormat {
    fn from(f: FormatArg) -> Self { match f { FormatArg::Text => InputFormat::Text, FormatArg::Json => InputFormat::Json } }
}

#[derive(Parser, Debug)]
#[command(name="knn-classify", about="Classify a query point by k-nearest-neighbor majority vote")]
struct Args {
    /// Input record; reads stdin when omitted or `-`
    input: Option<String>,
    #[arg(long, value_enum, default_value_t=FormatArg::Text)] format: FormatArg,
    /// Worker threads (0 = all cores)
    #[arg(long, default_value_t=0)] threads: usize,
    #[arg(long, value_enum, default_value_t=StrategyArg::Heap)] strategy: StrategyArg,
    /// Print the full JSON report instead of the bare label
    #[arg(long, default_value_t=false)] report: bool,
    /// -v info, -vv debug, -vvv trace (RUST_LOG overrides)
    #[arg(short, long, action=clap::ArgAction::Count)] verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose { 0 => "warn", 1 => "info", 2 => "debug", _ => "trace" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn load(args: &Args) -> Result<Problem, ParseError> {
    let format = args.format.into();
    match args.input.as_deref() {
        None | Some("-") => read_problem(io::stdin().lock(), format),
        Some(path) => read_problem(BufReader::new(File::open(path)?), format),
    }
}

fn emit(report: &Classification<char>, json: bool) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, report)?;
        writeln!(out)
    } else {
        write_label(out, report.label)
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let problem = match load(&args) {
        Ok(p) => p,
        Err(e) => {
            error!("{e}");
            println!("Invalid input file.");
            process::exit(1);
        }
    };
    debug!(groups = problem.groups.len(), k = problem.k, "input parsed");

    let params = KnnParams::new(problem.k)
        .with_threads(args.threads)
        .with_strategy(args.strategy.into());
    let report = match Classifier::new(params).and_then(|c| c.classify_report(&problem.groups, problem.query)) {
        Ok(r) => r,
        Err(e) => {
            error!("{e}");
            process::exit(2);
        }
    };

    if let Err(e) = emit(&report, args.report) {
        error!("failed to write output: {e}");
        process::exit(1);
    }
}
