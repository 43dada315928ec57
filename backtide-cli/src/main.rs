//! Backtide CLI: backtest and CIR commands.
//!
//! Commands:
//! - `run`: backtest a candle CSV with the RSI threshold strategy
//! - `cir`: simulate a seeded CIR short-rate path and its crossing signals

mod obs;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use backtide_runner::export::{export_cir_json, export_json};
use backtide_runner::{
    load_candles_csv, run_backtest, run_cir, save_artifacts, BacktestConfig, BacktestResult,
    CirConfig,
};
use obs::LogFormat;

#[derive(Parser)]
#[command(
    name = "backtide",
    about = "Backtide CLI: RSI threshold backtester and CIR rate paths"
)]
struct Cli {
    /// Log filter (e.g. info, debug, backtide_core=trace). BACKTIDE_LOG overrides.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest a candle CSV (symbol,timestamp,open,high,low,close,volume).
    Run {
        /// Path to the candle CSV.
        #[arg(long)]
        data: PathBuf,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Initial capital (overrides the config).
        #[arg(long)]
        capital: Option<f64>,

        /// Comma-separated symbols to keep, in fold order (overrides the config).
        #[arg(long, value_delimiter = ',')]
        symbols: Option<Vec<String>>,

        /// Directory to write result.json and CSV artifacts into.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print the full result as JSON instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Simulate a CIR short-rate path and print it as JSON.
    Cir {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Long-run mean level.
        #[arg(long)]
        alpha: Option<f64>,

        /// Mean-reversion speed.
        #[arg(long)]
        beta: Option<f64>,

        /// Volatility.
        #[arg(long)]
        sigma: Option<f64>,

        /// Initial rate.
        #[arg(long)]
        r0: Option<f64>,

        /// Horizon in years.
        #[arg(long)]
        horizon: Option<f64>,

        /// Time step in years.
        #[arg(long)]
        dt: Option<f64>,

        /// Master RNG seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Write JSON here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    obs::init_tracing(&cli.log_level, cli.log_format)?;

    match cli.command {
        Commands::Run {
            data,
            config,
            capital,
            symbols,
            output_dir,
            json,
        } => run_backtest_cmd(
            &data,
            config.as_deref(),
            capital,
            symbols,
            output_dir.as_deref(),
            json,
        ),
        Commands::Cir {
            config,
            alpha,
            beta,
            sigma,
            r0,
            horizon,
            dt,
            seed,
            output,
        } => {
            let mut cfg = match config {
                Some(path) => CirConfig::from_file(&path)?,
                None => CirConfig::default(),
            };
            let p = &mut cfg.cir;
            for (slot, value) in [
                (&mut p.alpha, alpha),
                (&mut p.beta, beta),
                (&mut p.sigma, sigma),
                (&mut p.r0, r0),
                (&mut p.horizon, horizon),
                (&mut p.dt, dt),
            ] {
                if let Some(v) = value {
                    *slot = v;
                }
            }
            if let Some(s) = seed {
                cfg.seed = s;
            }
            run_cir_cmd(&cfg, output.as_deref())
        }
    }
}

fn run_backtest_cmd(
    data: &Path,
    config_path: Option<&Path>,
    capital: Option<f64>,
    symbols: Option<Vec<String>>,
    output_dir: Option<&Path>,
    json: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => BacktestConfig::from_file(path)?,
        None => BacktestConfig::default(),
    };
    if let Some(c) = capital {
        config.backtest.initial_capital = c;
    }
    if let Some(list) = symbols {
        config.backtest.symbols = list.into_iter().filter(|s| !s.is_empty()).collect();
    }
    config.validate()?;

    let series = load_candles_csv(data, &config.backtest.symbols)
        .with_context(|| format!("failed to load candles from {}", data.display()))?;
    let result = run_backtest(&config, &series)?;

    if json {
        println!("{}", export_json(&result)?);
    } else {
        print_summary(&result);
    }

    if let Some(dir) = output_dir {
        let run_dir = save_artifacts(&result, dir)?;
        info!(dir = %run_dir.display(), "artifacts saved");
        if !json {
            println!("Artifacts saved to: {}", run_dir.display());
        }
    }
    Ok(())
}

fn run_cir_cmd(config: &CirConfig, output: Option<&Path>) -> Result<()> {
    config.validate()?;
    let result = run_cir(&config.cir, config.seed)?;
    let json = export_cir_json(&result)?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), points = result.rates.len(), "CIR path written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn print_summary(result: &BacktestResult) {
    let perf = &result.performance;
    println!();
    println!("=== Backtest Result ===");
    println!("Run:            {}", result.run_id);
    println!("Initial:        {:.2}", result.initial_capital);
    println!("Final:          {:.2}", result.final_capital);
    println!("Open positions: {}", result.open_positions.len());
    println!();
    println!("--- Performance ---");
    println!("Total Return:   {:.2}%", perf.total_return);
    println!("Win Rate:       {:.1}%", perf.win_rate);
    println!("Sharpe:         {:.3}", perf.sharpe_ratio);
    println!("Max Drawdown:   {:.2}%", perf.max_drawdown);
    println!("Trades:         {}", perf.trades_count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_args_parse() {
        let cli = Cli::try_parse_from([
            "backtide",
            "run",
            "--data",
            "candles.csv",
            "--capital",
            "5000",
            "--symbols",
            "eurusd,btcusd",
            "--json",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Commands::Run {
                data,
                capital,
                symbols,
                json,
                ..
            } => {
                assert_eq!(data, PathBuf::from("candles.csv"));
                assert_eq!(capital, Some(5_000.0));
                assert_eq!(symbols, Some(vec!["eurusd".to_string(), "btcusd".to_string()]));
                assert!(json);
            }
            Commands::Cir { .. } => panic!("expected run"),
        }
    }

    #[test]
    fn cir_args_parse() {
        let cli = Cli::try_parse_from(["backtide", "cir", "--sigma", "0.05", "--seed", "9"]).unwrap();
        assert_eq!(cli.log_level, "info");
        match cli.command {
            Commands::Cir { sigma, seed, alpha, .. } => {
                assert_eq!(sigma, Some(0.05));
                assert_eq!(seed, Some(9));
                assert_eq!(alpha, None);
            }
            Commands::Run { .. } => panic!("expected cir"),
        }
    }
}
