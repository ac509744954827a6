use crate::commands::print_rendered;
use crate::output;

use std::path::PathBuf;

use clap::Args;
use color_eyre::Result;

use sweep_service::{ReportFormat, ResultReporter, ResultTable};

/// Render a saved result record
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Path to the JSON result record
    pub file: PathBuf,

    /// Output format (table, json, markdown)
    #[arg(long, value_name = "FORMAT", default_value_t = ReportFormat::Table)]
    pub format: ReportFormat,
}

pub fn execute(args: ReportArgs) -> Result<()> {
    if !args.file.exists() {
        color_eyre::eyre::bail!("Result record not found: {}", args.file.display());
    }

    output::status("Loading", &format!("{}", args.file.display()));
    let table = ResultTable::load(&args.file)?;

    output::status(
        "Rendering",
        &format!(
            "{} traces x {} configurations ({} N/A)",
            table.len(),
            table.configurations().len(),
            table.absent_count()
        ),
    );
    print_rendered(&ResultReporter::report(&table, args.format)?);

    Ok(())
}
