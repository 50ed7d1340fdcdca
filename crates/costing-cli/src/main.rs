//! costing-cli - Command-line costing calculator
//!
//! Usage:
//!   costing-cli --cost 100 --profit-pct 20 --discount 10   # Resolve figures
//!   costing-cli --cost 100 --discounted-price 150 --sweep  # Add the margin sweep
//!   costing-cli --selling-price 200 --discount 10 --json   # JSON output
//!   costing-cli --server                                   # JSON-RPC over stdin/stdout

mod server;

use anyhow::Result;
use clap::Parser;
use costing_core::report::{self, format_money, format_percent};
use costing_core::{resolve_with, ChartData, InputRecord, Presence, ResolveError, Resolution};
use rust_decimal::Decimal;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "costing-cli", version)]
#[command(about = "Infer missing cost, price, discount and margin figures", long_about = None)]
struct Args {
    /// Total cost of the item
    #[arg(long, value_name = "AMOUNT")]
    cost: Option<Decimal>,

    /// Selling price before discount
    #[arg(long, value_name = "AMOUNT")]
    selling_price: Option<Decimal>,

    /// Final price after discount
    #[arg(long, value_name = "AMOUNT")]
    discounted_price: Option<Decimal>,

    /// Discount percentage on the selling price (0-100)
    #[arg(long = "discount", value_name = "PCT")]
    discount_pct: Option<Decimal>,

    /// Profit amount
    #[arg(long, value_name = "AMOUNT")]
    profit: Option<Decimal>,

    /// Profit percentage on cost
    #[arg(long, value_name = "PCT")]
    profit_pct: Option<Decimal>,

    /// Loss amount
    #[arg(long, value_name = "AMOUNT")]
    loss: Option<Decimal>,

    /// Loss percentage on cost (0-100)
    #[arg(long, value_name = "PCT")]
    loss_pct: Option<Decimal>,

    /// Print the resolution as JSON
    #[arg(short, long)]
    json: bool,

    /// Also print the profit margin vs cost sweep
    #[arg(short, long)]
    sweep: bool,

    /// Treat a provided zero as a real figure instead of "not provided"
    #[arg(long, env = "COSTING_EXPLICIT_ZERO")]
    explicit_zero: bool,

    /// Run as a JSON-RPC 2.0 server on stdin/stdout
    #[arg(long)]
    server: bool,

    /// Show supported input combinations and formulas
    #[arg(long)]
    formulas: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    log_level: String,
}

impl Args {
    fn input(&self) -> InputRecord {
        InputRecord {
            cost: self.cost,
            selling_price: self.selling_price,
            discounted_price: self.discounted_price,
            discount_pct: self.discount_pct,
            profit: self.profit,
            profit_pct: self.profit_pct,
            loss: self.loss,
            loss_pct: self.loss_pct,
        }
    }

    fn presence(&self) -> Presence {
        if self.explicit_zero {
            Presence::Explicit
        } else {
            Presence::ZeroIsAbsent
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays clean for results and JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.formulas {
        println!("{}", report::USAGE);
        return Ok(());
    }

    if args.server {
        debug!("starting JSON-RPC server");
        server::run_server(args.presence())?;
        return Ok(());
    }

    let input = args.input();
    if input.is_empty() {
        // No figures, show help
        eprintln!("Usage: costing-cli --cost <AMOUNT> --discounted-price <AMOUNT>");
        eprintln!("       costing-cli --selling-price <AMOUNT> --discount <PCT>");
        eprintln!("       costing-cli --formulas");
        eprintln!("       costing-cli --server");
        std::process::exit(1);
    }

    match resolve_with(input, args.presence()) {
        Ok(resolution) if args.json => print_json(&resolution, args.sweep)?,
        Ok(resolution) => print_text(&resolution, args.sweep),
        Err(e) if args.json => {
            println!("{}", serde_json::to_string_pretty(&error_json(&e))?);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn error_json(error: &ResolveError) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "kind": error.kind(),
            "message": error.to_string(),
        }
    })
}

fn print_json(resolution: &Resolution, sweep: bool) -> Result<()> {
    let mut value = serde_json::to_value(resolution)?;
    if sweep {
        value["chart"] = serde_json::to_value(ChartData::from_record(&resolution.record))?;
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_text(resolution: &Resolution, sweep: bool) {
    println!("{}", resolution.scenario);
    println!();

    for row in report::breakdown(&resolution.record) {
        println!("{:<20}{:>16}", row.metric, row.value);
    }

    if !sweep {
        return;
    }

    println!();
    match ChartData::from_record(&resolution.record) {
        Some(chart) => print_sweep(&chart),
        None => println!("No sweep: needs a positive cost and discounted price within range."),
    }
}

fn print_sweep(chart: &ChartData) {
    println!("{}", chart.title);
    println!("{:<16}{:>16}{:>16}", "Cost", "Profit", "Margin");
    for point in &chart.points {
        let marker = if point.cost == chart.current.cost { " *" } else { "" };
        println!(
            "{:<16}{:>16}{:>16}{}",
            format_money(Some(point.cost)),
            format_money(Some(point.profit)),
            format_percent(Some(point.margin_pct)),
            marker
        );
    }
    println!();
    println!("{}", chart.caption);
}
