use crate::commands::{print_rendered, SweepArgs};
use crate::output;

use clap::Args;
use color_eyre::Result;

use sweep_service::{progress_channel, ReportFormat, ResultReporter, Sweep, SweepEvent};

/// Run every configuration over every trace
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub sweep: SweepArgs,

    /// Summary format printed after the run (table, json, markdown)
    #[arg(long, value_name = "FORMAT", default_value_t = ReportFormat::Table)]
    pub format: ReportFormat,

    /// Print the summary without writing the result record
    #[arg(long)]
    pub no_save: bool,
}

pub async fn execute(args: RunArgs) -> Result<()> {
    let config = args.sweep.resolve()?;
    let output_path = config.output.clone();

    if !config.binary_dir.is_dir() {
        output::warning(&format!(
            "Binary directory not found: {}",
            config.binary_dir.display()
        ));
    }

    // Create progress channel and sweep
    let (tx, mut rx) = progress_channel();
    let sweep = Sweep::new(config)?.with_progress(tx);

    // Spawn the sweep in background
    let sweep_handle = tokio::spawn(async move { sweep.run().await });

    // Process events in the foreground
    let mut total_jobs = 0;
    let mut finished = 0;
    while let Some(event) = rx.recv().await {
        match event {
            SweepEvent::SweepStarted {
                traces,
                total_jobs: jobs,
                workers,
                ..
            } => {
                total_jobs = jobs;
                println!("Found {} traces.", traces);
                if traces == 0 {
                    output::warning("No trace files matched; the result table will be empty");
                }
                println!("Running {} simulations with {} workers...", jobs, workers);
            }

            SweepEvent::JobStarted {
                configuration,
                trace,
            } => {
                output::dim(&format!("      start  {} on {}", configuration, trace));
            }

            SweepEvent::JobFinished {
                configuration,
                trace,
                metric,
                reason,
                duration,
            } => {
                finished += 1;
                let progress = format!("[{}/{}]", finished, total_jobs);
                match metric {
                    Some(ipc) => output::success(&format!(
                        "{} {} on {}: IPC {:.4} ({:.2}s)",
                        progress,
                        configuration,
                        trace,
                        ipc,
                        duration.as_secs_f64()
                    )),
                    None => output::failure(&format!(
                        "{} {} on {}: {} ({:.2}s)",
                        progress,
                        configuration,
                        trace,
                        reason.as_deref().unwrap_or("no result"),
                        duration.as_secs_f64()
                    )),
                }
            }

            SweepEvent::SweepCompleted {
                succeeded,
                absent,
                duration,
            } => {
                output::header(&format!(
                    "Sweep completed in {:.2}s: {} results, {} N/A",
                    duration.as_secs_f64(),
                    succeeded,
                    absent
                ));
            }
        }
    }

    let report = sweep_handle.await?;

    println!();
    println!("=== RESULTS SUMMARY ===");
    print_rendered(&ResultReporter::report(&report.table, args.format)?);

    if args.no_save {
        output::dim("Result record not written (--no-save)");
    } else {
        report.table.save(&output_path)?;
        println!("Results saved to {}", output_path.display());
    }

    Ok(())
}
