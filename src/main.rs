use clap::Parser;
use kpm_export_csv::utils::{logger, validation::Validate};
use kpm_export_csv::{CliConfig, ConversionReport, ConvertEngine, ExportPipeline, LocalStorage};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    match run(&config) {
        Ok(report) => {
            print_summary(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("❌ Conversion failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(config: &CliConfig) -> kpm_export_csv::Result<ConversionReport> {
    let settings = config.resolve()?;
    settings.validate()?;

    let pipeline = ExportPipeline::new(LocalStorage, settings);
    let engine = if config.dry_run {
        ConvertEngine::new_dry_run(pipeline)
    } else {
        ConvertEngine::new(pipeline)
    };

    engine.run()
}

fn print_summary(report: &ConversionReport) {
    match &report.output_path {
        Some(path) => println!("✅ Wrote {} entries to {}", report.rows, path.display()),
        None => println!("✅ Dry run: {} entries would be written", report.rows),
    }
    if report.filtered_out > 0 {
        println!("   {} non-login entries were left out", report.filtered_out);
    }
    if report.skipped_malformed > 0 {
        println!("   {} malformed entries were skipped", report.skipped_malformed);
    }
}
