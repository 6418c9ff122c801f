//! PairLab CLI: run and align commands.
//!
//! Commands:
//! - `run`: simulate from a TOML run file and/or command-line parameters
//! - `align`: merge two single-instrument bar files into an aligned feed
//! - `defaults`: print a run file holding every default parameter

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pairlab_core::data::{align_pair, read_leg_csv, write_aligned_csv};
use pairlab_core::domain::PerLeg;
use pairlab_runner::{render_report, run_from_file, write_json, RunFile, RunOverrides};

#[derive(Parser)]
#[command(name = "pairlab", about = "PairLab CLI: minute-bar pairs-trading backtester")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one run and print the evaluation report.
    Run {
        /// Path to a TOML run file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Aligned feed CSV (overrides [data] aligned).
        #[arg(long)]
        data: Option<PathBuf>,

        /// Deviation threshold as a fraction (e.g. 0.005).
        #[arg(long)]
        threshold: Option<f64>,

        /// Maximum rotations per day. 0 = unlimited.
        #[arg(long)]
        trade_limit: Option<u32>,

        /// Moving-average window in bars.
        #[arg(long)]
        window: Option<usize>,

        /// Bars between signal and fill.
        #[arg(long)]
        delay: Option<usize>,

        /// Days to run after the skipped days. 0 = whole feed.
        #[arg(long)]
        duration: Option<u32>,

        /// Days to run before trading and evaluation begin.
        #[arg(long)]
        skip: Option<u32>,

        /// Also write the full result record as JSON.
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Align two single-instrument bar files on their timestamps.
    Align {
        /// Bar file of the first instrument (leg A).
        #[arg(long)]
        a: PathBuf,

        /// Bar file of the second instrument (leg B).
        #[arg(long)]
        b: PathBuf,

        /// Output aligned feed.
        #[arg(long)]
        out: PathBuf,

        /// Column prefix for leg A.
        #[arg(long, default_value = "visa")]
        prefix_a: String,

        /// Column prefix for leg B.
        #[arg(long, default_value = "mastercard")]
        prefix_b: String,
    },
    /// Print a run file with every parameter at its default.
    Defaults,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pairlab=info,pairlab_core=info,pairlab_runner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data,
            threshold,
            trade_limit,
            window,
            delay,
            duration,
            skip,
            json,
        } => {
            let overrides = RunOverrides {
                data,
                threshold,
                daily_trade_limit: trade_limit,
                ma_window: window,
                trade_delay: delay,
                duration_days: duration,
                skip_days: skip,
            };
            run_cmd(config, overrides, json)
        }
        Commands::Align {
            a,
            b,
            out,
            prefix_a,
            prefix_b,
        } => align_cmd(a, b, out, PerLeg::new(prefix_a, prefix_b)),
        Commands::Defaults => {
            print!("{}", RunFile::default().to_toml()?);
            Ok(())
        }
    }
}

fn run_cmd(config: Option<PathBuf>, overrides: RunOverrides, json: Option<PathBuf>) -> Result<()> {
    if config.is_none() && overrides.data.is_none() {
        bail!("either --config or --data is required");
    }

    let outcome = run_from_file(config.as_deref(), &overrides)?;
    print!("{}", render_report(&outcome.result));

    if let Some(path) = json {
        write_json(&outcome.result, &path)?;
        info!(path = %path.display(), "wrote result record");
    }
    Ok(())
}

fn align_cmd(a: PathBuf, b: PathBuf, out: PathBuf, instruments: PerLeg<String>) -> Result<()> {
    if instruments.a == instruments.b {
        bail!("leg prefixes must differ (both are '{}')", instruments.a);
    }

    let leg_a = read_leg_csv(&a).with_context(|| format!("reading {}", a.display()))?;
    let leg_b = read_leg_csv(&b).with_context(|| format!("reading {}", b.display()))?;

    let aligned = align_pair(&leg_a, &leg_b);
    write_aligned_csv(&out, &aligned.bars, &instruments)
        .with_context(|| format!("writing {}", out.display()))?;

    println!(
        "Aligned {} bars ({} gaps dropped) into {}",
        aligned.bars.len(),
        aligned.gaps.len(),
        out.display()
    );
    Ok(())
}
