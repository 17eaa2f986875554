use bank_queue_sim::config::{self, Action, FormatArg};
use bank_queue_sim::engine;
use bank_queue_sim::error::Result;
use bank_queue_sim::export;
use bank_queue_sim::logging;
use bank_queue_sim::output::{self, Formatter, HumanFormatter, JsonFormatter, SummaryFormatter};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = config::parse_args()?;
    let invocation = config::build_invocation(cli)?;
    logging::init_logging(&invocation.log_level);

    if invocation.action == Action::ShowConfig {
        print!("{}", output::format_config(&invocation.config));
        return Ok(());
    }

    let result = engine::run_simulation(&invocation.config)?;

    let formatter = formatter_for(&invocation.format);
    print!("{}", formatter.write(&result)?);

    if let Some(base) = &invocation.output_dir {
        let dir = export::timestamped_dir(base);
        export::save_results(&result, &dir)?;
        eprintln!("Results saved to: {}", dir.display());
    }

    Ok(())
}

fn formatter_for(format: &FormatArg) -> Box<dyn Formatter> {
    match format {
        FormatArg::Human => Box::new(HumanFormatter),
        FormatArg::Summary => Box::new(SummaryFormatter),
        FormatArg::Json => Box::new(JsonFormatter),
    }
}
