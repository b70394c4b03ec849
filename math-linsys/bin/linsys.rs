use clap::Parser;
use math_audio_linsys::{
    CommandInterpreter, ExecutionMode, SolverConfig, io::DEFAULT_INPUTS_DIR, parallel,
    read_matrix_file, solve,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "linsys",
    about = "Solve augmented linear systems [A | b], including their kernel"
)]
struct Cli {
    /// Solve the system in this file and exit instead of starting the menu
    #[arg(long)]
    file: Option<PathBuf>,

    /// Directory listed by the `txt` command
    #[arg(long, default_value = DEFAULT_INPUTS_DIR)]
    inputs_dir: PathBuf,

    /// JSON solver configuration; the flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Compute the particular solution and kernel vectors in parallel
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel (0 = all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Entries with absolute value at or below this count as zero
    #[arg(long)]
    tolerance: Option<f64>,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the --file result as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn solver_config(&self) -> math_audio_linsys::Result<SolverConfig> {
        let mut config = match &self.config {
            Some(path) => SolverConfig::from_file(path)?,
            None => SolverConfig::default(),
        };
        if self.parallel {
            config.execution = ExecutionMode::Parallel;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(tolerance) = self.tolerance {
            config.tolerance = tolerance;
        }
        config.verbosity = config.verbosity.max(self.verbose as usize);
        config.validate()?;
        Ok(config)
    }
}

fn main() {
    env_logger::init();
    let args = Cli::parse();

    let config = match args.solver_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(2);
        }
    };
    if config.execution == ExecutionMode::Parallel && !parallel::is_parallel_available() {
        log::warn!("built without rayon, substitutions run sequentially");
    }

    if let Some(path) = &args.file {
        let report = match read_matrix_file(path).and_then(|m| solve(&m, &config)) {
            Ok(report) => report,
            Err(err) => {
                eprintln!("Error: {err}");
                process::exit(1);
            }
        };
        if args.json {
            match serde_json::to_string_pretty(&report.to_json()) {
                Ok(text) => println!("{text}"),
                Err(err) => {
                    eprintln!("Error: {err}");
                    process::exit(1);
                }
            }
        } else {
            print!("{report}");
        }
        return;
    }

    let interpreter = CommandInterpreter::new(&args.inputs_dir);
    log::debug!("inputs directory: {}", interpreter.inputs_dir().display());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut input = io::stdin().lock();

    if let Err(err) = interpreter
        .print_help(&mut out)
        .and_then(|_| interpreter.run(&mut out, &mut input, &config))
    {
        eprintln!("Error: {err}");
        process::exit(1);
    }
    out.flush().ok();
}
