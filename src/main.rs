use ascii_revenge::cli::{Cli, Commands};
use ascii_revenge::error::{AppError, Result};
use ascii_revenge::pipeline::{self, PipelineStats};
use ascii_revenge::player::Interrupt;
use clap::Parser;

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Convert(args) => {
            let config = args.config()?;
            report(&pipeline::run_convert(&config)?, &config.output);
        }
        Commands::Play(args) => {
            let interrupt = Interrupt::install()?;
            pipeline::run_play(&args.config()?, &interrupt)?;
        }
        Commands::Package(args) => {
            let config = args.config()?;
            report(&pipeline::run_package(&config)?, &config.output);
        }
        Commands::Palette(args) => {
            println!("{}", pipeline::run_palette(&args.config())?);
        }
    }
    Ok(())
}

fn report(stats: &PipelineStats, output: &std::path::Path) {
    println!(
        "{} frames -> {} ({} bytes)",
        stats.frames_processed,
        output.display(),
        stats.bytes_written
    );
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => {}
        Err(AppError::Interrupted) => std::process::exit(130),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
