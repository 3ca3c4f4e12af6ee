mod commands;

use clap::{Parser, Subcommand};
use commands::ResolveArgs;
use iterown::{ContainerKind, ElementCapability, ResolverConfig, RuleSet};
use log::{debug, LevelFilter};
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Explain how iterating arrays and vectors uses ownership", long_about = None)]
struct Cli {
    /// JSON resolver configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured rule set (modern, legacy2018)
    #[arg(long, global = true)]
    rule_set: Option<RuleSet>,

    /// Report every move outcome in a batch as a finding
    #[arg(long, global = true)]
    deny_moves: bool,

    /// Log at debug level (otherwise `RUST_LOG` decides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Resolve a single iteration site")]
    Resolve {
        /// fixed_length | growable
        container: ContainerKind,
        /// duplicable | unique
        element: ElementCapability,
        /// Form name (`owning_iterator`) or surface spelling (`for x in &v`)
        form: String,
        /// The container is bound without `mut`
        #[arg(long)]
        immutable: bool,
        /// Add a summary and rationale for the outcome
        #[arg(long)]
        explain: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    #[command(about = "Print the full decision table")]
    Table {
        /// Print JSON instead of a text table
        #[arg(long)]
        json: bool,
    },
    #[command(about = "Resolve a JSON-lines file of iteration sites")]
    Batch {
        /// JSON-lines file, one iteration site per line
        path: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn load_config(cli: &Cli) -> Result<ResolverConfig> {
    let mut config = match &cli.config {
        Some(path) => ResolverConfig::from_file(path)?,
        None => ResolverConfig::default(),
    };
    if let Some(rule_set) = cli.rule_set {
        config.rule_set = rule_set;
    }
    config.deny_moves |= cli.deny_moves;
    debug!("using {:?}", config);
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Resolve {
            container,
            element,
            form,
            immutable,
            explain,
            json,
        } => {
            let args = ResolveArgs {
                container,
                element,
                form: commands::parse_form(&form)?,
                mutable_binding: !immutable,
                explain,
                json,
            };
            println!("{}", commands::resolve(&config, &args)?);
        }
        Commands::Table { json } => {
            print!("{}", commands::table(&config, json)?);
        }
        Commands::Batch { path, json } => {
            let (text, report) = commands::batch(&config, &path, json)?;
            println!("{}", text);
            if !report.is_clean() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
