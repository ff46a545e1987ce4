use desk_sim::cli::{self, Cli, Command, CompareArgs, FormatArg, RunArgs};
use desk_sim::engine::{run_simulation, RunReport};
use desk_sim::error::Result;
use desk_sim::output::{
    self, Formatter, HumanFormatter, JsonFormatter, SummaryFormatter,
};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli: Cli = cli::parse_args()?;
    match cli.command {
        Command::Run(args) => run_once(&args),
        Command::Compare(args) => run_comparison(&args),
        Command::ShowConfig(args) => {
            let config = cli::build_config(&args)?;
            print!("{}", output::show_config(&config));
            Ok(())
        }
    }
}

fn run_once(args: &RunArgs) -> Result<()> {
    let config = cli::build_config(args)?;
    let report = run_simulation(&config)?;

    let formatter = formatter_for(&args.format);
    print!("{}", formatter.write(&report));
    Ok(())
}

fn run_comparison(args: &CompareArgs) -> Result<()> {
    let base = cli::build_compare_config(args)?;
    let mut reports: Vec<RunReport> = Vec::with_capacity(args.max_boxes as usize);
    for boxes in 1..=args.max_boxes {
        let mut config = base.clone();
        config.boxes = boxes;
        reports.push(run_simulation(&config)?);
    }

    let rendered = match args.format {
        FormatArg::Human => output::comparison_human(&reports),
        FormatArg::Summary => output::comparison_summary(&reports),
        FormatArg::Json => output::comparison_json(&reports),
    };
    print!("{}", rendered);
    Ok(())
}

fn formatter_for(format: &FormatArg) -> Box<dyn Formatter> {
    match format {
        FormatArg::Human => Box::new(HumanFormatter),
        FormatArg::Summary => Box::new(SummaryFormatter),
        FormatArg::Json => Box::new(JsonFormatter),
    }
}
