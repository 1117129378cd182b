//! Dua browser CLI.

use clap::Parser;

use dua_cli::cli::{Cli, Command};
use dua_cli::commands::{run_browse, run_inspect, run_seed, run_serve};
use dua_cli::logging::init_logging;
use dua_cli::summary::print_tables;
use dua_store::TableSummary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = cli.log_config();
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::Serve(args) => run_serve(args),
        Command::Seed(args) => run_seed(args).map(|tables| print_tables(&tables)),
        Command::Inspect(args) => run_inspect(args).and_then(|tables| {
            if args.json {
                print_json(&tables)
            } else {
                print_tables(&tables);
                Ok(())
            }
        }),
        Command::Browse(args) => run_browse(args),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn print_json(tables: &[TableSummary]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(tables)?);
    Ok(())
}
