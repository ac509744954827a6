use crate::commands::SweepArgs;
use crate::output;

use clap::Args;
use color_eyre::Result;

use sweep_service::{SimulatorRunner, Sweep};

/// Show the simulator invocations a run would make
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub sweep: SweepArgs,
}

pub fn execute(args: PlanArgs) -> Result<()> {
    let config = args.sweep.resolve()?;
    let runner = SimulatorRunner::from_config(&config);

    // Missing binaries still get planned; at run time they become N/A cells
    for configuration in &config.configurations {
        let binary = config.binary_for(configuration);
        if !binary.is_file() {
            output::warning(&format!("Simulator binary not found: {}", binary.display()));
        }
    }

    let sweep = Sweep::new(config)?;
    let plan = sweep.plan();

    println!("Found {} traces.", plan.traces.len());
    output::status(
        "Planning",
        &format!(
            "{} simulations over {} configurations",
            plan.jobs.len(),
            sweep.config().configurations.len()
        ),
    );

    for job in &plan.jobs {
        println!("{}", runner.command_line(job));
    }

    Ok(())
}
