//! CLI entrypoint for `leakstat`.
//!
//! Loads two credential dumps, runs the date, structure and substring
//! analyses, prints a terminal summary and writes the text report, SVG charts
//! and optional CSV exports into the output directory. Missing inputs are
//! reported and analyzed as empty corpora.
use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, ValueEnum, error::ErrorKind};
use colored::Colorize;
use log::{LevelFilter, error, info};
use leakstat::{
    chart::{file_stem, write_corpus_charts},
    config::{DEFAULT_OUTPUT_DIR, REPORT_FILE_NAME, TOP_K},
    engine::Engine,
    export::{save_common_passwords_csv, save_corpus_csvs},
    io::DEFAULT_MMAP_THRESHOLD_BYTES,
    report::{render_report, render_summary},
    source::SourceKind,
};

#[derive(Parser, Debug)]
#[command(
    name = "leakstat",
    version,
    about = "Date and structure patterns in leaked password dumps"
)]
struct Args {
    /// First credential dump
    #[arg(short = 'a', long = "first")]
    first: PathBuf,

    /// Line layout of the first dump
    #[arg(long = "first-kind", value_enum, default_value_t = SourceKind::Colon)]
    first_kind: SourceKind,

    /// Label of the first dump in reports and file names
    #[arg(long = "first-label", default_value = "Yahoo")]
    first_label: String,

    /// Second credential dump
    #[arg(short = 'b', long = "second")]
    second: PathBuf,

    /// Line layout of the second dump
    #[arg(long = "second-kind", value_enum, default_value_t = SourceKind::Hash)]
    second_kind: SourceKind,

    /// Label of the second dump in reports and file names
    #[arg(long = "second-label", default_value = "CSDN")]
    second_label: String,

    /// Path to the output directory
    #[arg(short = 'o', long = "output", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Limit number of entries in every top-K table and chart
    #[arg(long = "top", default_value_t = TOP_K)]
    top_limit: usize,

    /// Skip writing SVG charts
    #[arg(long = "no-charts")]
    no_charts: bool,

    /// Also export every full counter as CSV
    #[arg(long = "csv")]
    csv: bool,

    /// Load and analyze in parallel
    #[arg(long = "parallel")]
    parallel: bool,

    /// Override mmap threshold in bytes. If zero, disable mmap.
    #[arg(long = "mmap-threshold", default_value_t = DEFAULT_MMAP_THRESHOLD_BYTES)]
    mmap_threshold: u64,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log counts of skipped/malformed lines encountered during parsing
    #[arg(long = "log-parse-stats")]
    log_parse_stats: bool,

    /// Control color output (auto, always, never)
    #[arg(long = "color", value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Suppress summary output (still writes the report)
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

const ASCII_TITLE: &str = r#"
 _               _     ____  _        _
| |    ___  __ _| | __/ ___|| |_ __ _| |_
| |   / _ \/ _` | |/ /\___ \| __/ _` | __|
| |__|  __/ (_| |   <  ___) | || (_| | |_
|_____\___|\__,_|_|\_\|____/ \__\__,_|\__|
"#;

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();
}

fn main() {
    let args = Args::parse();
    // Charts and CSVs are named after the label, so the two must not collide.
    if file_stem(&args.first_label) == file_stem(&args.second_label) {
        Args::command()
            .error(
                ErrorKind::ArgumentConflict,
                format!(
                    "labels '{}' and '{}' map to the same output file names",
                    args.first_label, args.second_label
                ),
            )
            .exit();
    }
    init_logger(args.verbose);
    match args.color {
        ColorChoice::Always => {
            colored::control::set_override(true);
        }
        ColorChoice::Never => {
            colored::control::set_override(false);
        }
        ColorChoice::Auto => {}
    }
    let threshold = if args.mmap_threshold == 0 {
        u64::MAX
    } else {
        args.mmap_threshold
    };

    let mut engine = Engine::new();
    engine.load_from_file_paths_with_threshold(
        (args.first_label.as_str(), args.first_kind, &args.first),
        (args.second_label.as_str(), args.second_kind, &args.second),
        threshold,
        args.parallel,
    );
    if args.log_parse_stats {
        for corpus in [&engine.first, &engine.second] {
            info!(
                "parse stats: {} passwords={}, skipped={}",
                corpus.label,
                corpus.len(),
                corpus.skipped_lines
            );
        }
    }

    let analysis = engine.analyze(args.top_limit, args.parallel);

    if !args.quiet {
        println!("{}", ASCII_TITLE.bold().green());
        println!("{}", render_summary(&analysis, args.top_limit));
    }

    let outdir = &args.output;
    if let Err(e) = fs::create_dir_all(outdir) {
        error!(
            "failed to create output directory {}: {}",
            outdir.display(),
            e
        );
        std::process::exit(4);
    }

    let report_path = outdir.join(REPORT_FILE_NAME);
    if let Err(e) = fs::write(&report_path, render_report(&analysis, args.top_limit)) {
        error!("failed to write {}: {}", report_path.display(), e);
        std::process::exit(5);
    }
    info!("report written to {}", report_path.display());

    if !args.no_charts {
        for a in analysis.corpora() {
            match write_corpus_charts(a, outdir, args.top_limit) {
                Ok(paths) => info!("{}: {} charts written", a.label, paths.len()),
                Err(e) => {
                    error!("failed to write charts for {}: {:#}", a.label, e);
                    std::process::exit(6);
                }
            }
        }
    }

    if args.csv {
        let common = outdir.join("common_passwords.csv");
        let res = save_corpus_csvs(&analysis.first, outdir)
            .and_then(|_| save_corpus_csvs(&analysis.second, outdir))
            .and_then(|_| {
                save_common_passwords_csv(
                    &analysis.cross,
                    &analysis.first.label,
                    &analysis.second.label,
                    &common,
                )
            });
        if let Err(e) = res {
            error!("failed to write CSV exports: {:#}", e);
            std::process::exit(7);
        }
    }

    if !args.quiet {
        println!("Report: {}", report_path.display());
    }
}
