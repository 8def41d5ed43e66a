//! Unique Int Processor - bounded integer extraction for directories of text files
//!
//! Main entry point for the command-line application.

use clap::Parser;
use std::process;

use unique_int_processor::cli::Args;
use unique_int_processor::processor::{Processor, ProcessorConfig};
use unique_int_processor::progress::{print_banner, print_error, print_header, print_info, print_warning};

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging
    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    } else if !args.quiet {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    if let Err(e) = run(args) {
        print_error(&format!("{}", e));

        // Print chain of errors
        let mut source = e.source();
        while let Some(err) = source {
            print_error(&format!("  Caused by: {}", err));
            source = err.source();
        }

        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if !args.quiet {
        print_banner();
    }

    let config = ProcessorConfig::from_args(&args);

    if !args.quiet && args.verbose {
        print_config(&args, &config);
    }

    let output_dir = config.output_dir.clone();
    let processor = Processor::new(config);
    let report = processor.process_directory(&args.input, &output_dir)?;

    // Per-file failures are reported but leave the exit status alone
    let failed = report.failed().count();
    if failed > 0 && !args.quiet {
        print_warning(&format!("{} of {} files could not be processed", failed, report.len()));
    }

    if args.stats && !args.quiet {
        processor.stats().print_summary();
    }

    Ok(())
}

/// Print configuration summary
fn print_config(args: &Args, config: &ProcessorConfig) {
    print_header("Configuration");

    print_info(&format!("Input dir:    {:?}", args.input));
    print_info(&format!("Output dir:   {:?}", config.output_dir));
    print_info(&format!("Range:        [{}, {}]", config.range.min, config.range.max));
    print_info(&format!("Naming:       {:?}", config.naming));
    print_info(&format!("Dedup:        {:?}", config.dedup_strategy));
    print_info(&format!("Dry run:      {}", config.dry_run));
}
