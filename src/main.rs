//! Property Feasibility CLI
//!
//! Command-line interface for running feasibility projections

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use property_feasibility::{
    export::{ledger_file_name, summary_json, write_ledger_csv_file},
    project::{load_parameters, load_units, with_units},
    projection::{default_anchor_date, ProjectionConfig, ProjectionResult},
    ScenarioRunner,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "feasibility")]
#[command(about = "Monthly cashflow and loan ledger projection for property development deals")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Calendar date of month 0 (YYYY-MM-DD)
    #[arg(long, global = true, default_value_t = default_anchor_date())]
    anchor: NaiveDate,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Project one deal and write its ledger
    Run {
        /// Project parameters (JSON)
        #[arg(short, long)]
        params: PathBuf,

        /// Unit schedule (CSV) replacing the parameters' development program
        #[arg(short, long)]
        units: Option<PathBuf>,

        /// Ledger CSV output path [default: <project name>_cashflow.csv]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the summary as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Project several deals in parallel and print one line each
    Compare {
        /// Project parameter files (JSON)
        #[arg(required = true)]
        params: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let runner = ScenarioRunner::with_config(ProjectionConfig {
        anchor_date: cli.anchor,
        ..Default::default()
    });

    match cli.command {
        Commands::Run { params, units, output, json } => {
            let mut deal = load_parameters(&params)
                .with_context(|| format!("loading {}", params.display()))?;
            if let Some(path) = units {
                let schedule = load_units(&path)
                    .with_context(|| format!("loading {}", path.display()))?;
                deal = with_units(deal, schedule)?;
            }

            let result = runner.run(&deal)?;

            if json {
                println!("{}", summary_json(&result.summary)?);
            } else {
                print_summary(&result);
                print_ledger(&result, 24);
            }

            let output = output.unwrap_or_else(|| ledger_file_name(deal.name.as_deref()));
            write_ledger_csv_file(&output, &result.rows)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("\nFull ledger written to: {}", output.display());
        }
        Commands::Compare { params } => {
            let deals = params
                .iter()
                .map(|path| load_parameters(path).with_context(|| format!("loading {}", path.display())))
                .collect::<Result<Vec<_>>>()?;

            let outcomes = runner.run_batch(&deals);
            let best = ScenarioRunner::best_by_cash_on_cash(&outcomes);

            println!("{:<30} {:>14} {:>14} {:>9} {:>9} {:>5}",
                "Project", "Cost", "Profit", "ROI %", "CoC %", "Grade");
            println!("{}", "-".repeat(86));
            for (i, (path, outcome)) in params.iter().zip(&outcomes).enumerate() {
                let marker = if Some(i) == best { " *" } else { "" };
                match outcome {
                    Ok(result) => {
                        let s = &result.summary;
                        println!("{:<30} {:>14.0} {:>14.0} {:>9} {:>9} {:>5}{}",
                            result.project_name,
                            s.total_project_cost,
                            s.gross_profit,
                            pct(s.roi_on_cost.as_option()),
                            pct(s.cash_on_cash_roi.as_option()),
                            s.deal_grade.map(|g| g.to_string()).unwrap_or_else(|| "-".to_string()),
                            marker,
                        );
                    }
                    Err(err) => println!("{:<30} error: {}", path.display(), err),
                }
            }
        }
    }

    Ok(())
}

fn pct(value: Option<f64>) -> String {
    value.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "n/a".to_string())
}

fn print_summary(result: &ProjectionResult) {
    let s = &result.summary;
    println!("Feasibility Summary: {}", result.project_name);
    println!("  Total Sale Value:   ${:.0}", s.total_sale_value);
    println!("  Total Project Cost: ${:.0}", s.total_project_cost);
    println!("  Gross Profit:       ${:.0}", s.gross_profit);
    println!("  ROI on Total Cost:  {}%", pct(s.roi_on_cost.as_option()));
    println!("  Cash-on-Cash ROI:   {}%", pct(s.cash_on_cash_roi.as_option()));
    println!("  Profit Margin:      {}%", pct(s.profit_margin.as_option()));
    println!("  Peak Cash Invested: ${:.0}", s.peak_cash_invested);
    match s.deal_grade {
        Some(grade) => println!("  Deal Grade:         {} ({:?})", grade, grade.indicator()),
        None => println!("  Deal Grade:         undefined"),
    }
    println!();
}

fn print_ledger(result: &ProjectionResult, limit: usize) {
    println!("{:>5} {:>9} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Month", "Label", "Cash Out", "Loan Draw", "Cum Cash", "Loan Bal", "Net Pos");
    println!("{}", "-".repeat(90));

    for row in result.rows.iter().take(limit) {
        println!("{:>5} {:>9} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
            row.month,
            row.month_label,
            row.cash_outflow,
            row.loan_drawdown,
            row.cumulative_cash,
            row.cumulative_loan,
            row.net_position,
        );
    }

    if result.rows.len() > limit {
        println!("... ({} more months)", result.rows.len() - limit);
    }
}
