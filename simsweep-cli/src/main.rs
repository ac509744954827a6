mod commands;
mod logging;
mod output;

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::Result;

use commands::plan::PlanArgs;
use commands::report::ReportArgs;
use commands::run::RunArgs;

#[derive(Parser, Debug)]
#[command(name = "simsweep", version)]
#[command(about = "Run every simulator configuration over every trace and tabulate IPC")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the sweep, print the summary table and save the result record
    Run(RunArgs),
    /// Show the simulator invocations a run would make, without running them
    Plan(PlanArgs),
    /// Render a saved result record
    Report(ReportArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet)?;

    match cli.command {
        Command::Run(args) => commands::run::execute(args).await,
        Command::Plan(args) => commands::plan::execute(args),
        Command::Report(args) => commands::report::execute(args),
    }
}
