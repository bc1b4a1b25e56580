// ============================================================================
// Meta-Exchange CLI
// Interactive best-execution queries against the mock market data feed
// ============================================================================
//
// Usage: meta-exchange-cli [--seed <u64>] [--backend heap|avl|buckets|sorted] [--sequential]

use meta_exchange::engine::ExecutionEngineBuilder;
use meta_exchange::logging::{init_logging, DEFAULT_LOG_LEVEL};
use meta_exchange::market_data::{RandomOrderConfig, RandomOrderSource};
use meta_exchange::prelude::*;
use rust_decimal::Decimal;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

struct CliOptions {
    seed: Option<u64>,
    backend: IndexBackend,
    parallel: bool,
}

fn parse_args(args: &[String]) -> Result<CliOptions, Box<dyn Error>> {
    let mut options = CliOptions {
        seed: None,
        backend: IndexBackend::PriceBuckets,
        parallel: true,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a value")?;
                options.seed = Some(value.parse()?);
            },
            "--backend" => {
                let value = iter.next().ok_or("--backend needs a value")?;
                options.backend = value.parse()?;
            },
            "--sequential" => options.parallel = false,
            other => return Err(format!("unknown argument '{}'", other).into()),
        }
    }

    Ok(options)
}

fn prompt(lines: &mut impl Iterator<Item = io::Result<String>>, message: &str) -> io::Result<Option<String>> {
    println!("{}", message);
    io::stdout().flush()?;
    lines.next().transpose()
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_args(&args)?;

    if let Err(e) = init_logging(DEFAULT_LOG_LEVEL) {
        eprintln!("logging disabled: {}", e);
    }

    let mut engine = ExecutionEngineBuilder::new().index_backend(options.backend);
    if !options.parallel {
        engine = engine.sequential();
    }
    let engine = engine.build(Arc::new(LoggingEventHandler))?;

    let mut feed = RandomOrderConfig::default();
    if let Some(seed) = options.seed {
        feed = feed.with_seed(seed);
    }
    let service = MetaExchange::new(
        engine,
        Arc::new(RandomOrderSource::new(feed)?),
        MarketDataConfig::default(),
    )?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let Some(side) = prompt(&mut lines, "Enter order type (buy/sell) or press 'x' to exit:")? else {
            break;
        };
        let side = side.trim().to_lowercase();

        if side == "x" {
            break;
        }
        if side != "buy" && side != "sell" {
            println!("Invalid order type. Please enter 'buy' or 'sell'.");
            continue;
        }

        let Some(amount) = prompt(&mut lines, "Enter amount of bitcoins to buy/sell:")? else {
            break;
        };
        let amount: Decimal = match amount.trim().parse() {
            Ok(amount) => amount,
            Err(_) => {
                println!("Invalid amount. Please enter a valid decimal number.");
                continue;
            },
        };

        match service.compute_best_execution(&side, amount) {
            Ok(plan) => print!("{}", plan),
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}
