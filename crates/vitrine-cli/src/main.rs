use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vitrine_catalog::{load_catalog, CoverageAnalyzer, CoverageReport};
use vitrine_core::compositor;
use vitrine_core::{StageMachine, VitrineConfig};

#[derive(Parser)]
#[command(name = "vitrine")]
struct Cli {
    /// Optional TOML config overriding analyzer thresholds and stage
    /// durations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a specimen catalog (JSON array) for mechanism coverage.
    Analyze {
        catalog: PathBuf,
        /// Emit the full report as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },
    /// Derive the theme for one specimen.
    Theme {
        signature: String,
        form: String,
        seed: i64,
        #[arg(long)]
        seal: bool,
    },
    /// Walk a stage machine through its lifecycle and print transitions.
    Stages {},
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => VitrineConfig::from_toml_file(path)?,
        None => VitrineConfig::default(),
    };

    match cli.cmd {
        Commands::Analyze { catalog, json } => {
            let records = load_catalog(&catalog)?;
            let analyzer = CoverageAnalyzer::new(config.coverage.clone());
            let report = analyzer.analyze(&records)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_summary(&report);
            }
        }
        Commands::Theme {
            signature,
            form,
            seed,
            seal,
        } => {
            let theme = compositor::derive_for(&signature, &form, seed, seal)?;
            println!("{}", serde_json::to_string_pretty(&theme)?);
        }
        Commands::Stages {} => {
            let timings = config.stages.to_timings();
            let mut sm = StageMachine::new(timings.clone(), config.stages.max_steps);
            println!("stages with {:?}, {} steps", timings, config.stages.max_steps);

            // Drive the whole lifecycle synthetically: burn the time-gated
            // waits, feed the interaction budget, then the closing delays.
            for entered in sm.tick(timings.arriving_us + timings.present_us) {
                println!("  -> {:?}", entered);
            }
            for step in 0..config.stages.max_steps {
                sm.advance();
                println!("  step {}/{}", step + 1, config.stages.max_steps);
            }
            for entered in sm.tick(timings.grace_us + timings.resonant_us) {
                println!("  -> {:?}", entered);
            }
            if sm.take_completion() {
                println!("  complete");
            }
        }
    }

    Ok(())
}

fn print_summary(report: &CoverageReport) {
    println!(
        "{} specimens, {} with mechanism, {} without (coverage {:.1}%)",
        report.total_specimens,
        report.with_mechanism,
        report.without_mechanism,
        report.coverage_percentage
    );
    for (dimension, table) in &report.by_dimension {
        let cells: Vec<String> = table
            .iter()
            .map(|(value, count)| format!("{}={}", value, count))
            .collect();
        println!("  {}: {}", dimension, cells.join(" "));
    }
    if !report.top_combinations.is_empty() {
        println!("top combinations:");
        for cell in report.top_combinations.iter().take(5) {
            println!("  {} x {}: {}", cell.form, cell.intent, cell.count);
        }
    }
    if !report.recommendations.is_empty() {
        println!("recommendations:");
        for rec in &report.recommendations {
            println!("  - {}", rec);
        }
    }
}
