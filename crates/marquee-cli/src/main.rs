//! marquee CLI: run the named join queries and YAML pipelines.

mod output;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use marquee_core::config::{DataFormat, EngineConfig};
use marquee_core::dag::LogicalPlan;
use marquee_exec::{Engine, ExecError};
use marquee_planner::{parse_yaml_query, NamedQuery, QueryParams};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Join queries over a movies/actors/castings dataset", long_about = None)]
struct Cli {
    /// Dataset directory (overrides MARQUEE_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Dataset file format: csv or jsonl (overrides MARQUEE_FORMAT)
    #[arg(long, global = true)]
    data_format: Option<DataFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the named queries
    List,

    /// Run a named query
    Run {
        /// Query name, e.g. ford_films
        query: NamedQuery,

        /// Actor name literal
        #[arg(long)]
        actor: Option<String>,

        /// Year literal
        #[arg(long)]
        year: Option<i64>,

        /// Count threshold literal
        #[arg(long)]
        min_count: Option<i64>,

        #[arg(short, long, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Show the plan tree and fingerprint of a named query or YAML pipeline
    Explain {
        query: Option<NamedQuery>,

        /// Path to a pipeline YAML file
        #[arg(short = 'f', long, conflicts_with = "query")]
        pipeline: Option<PathBuf>,
    },

    /// Run a query described by a YAML pipeline
    Pipeline {
        /// Path to the pipeline YAML file
        #[arg(short = 'f', long)]
        file: PathBuf,

        #[arg(short, long, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Load the dataset and report every integrity problem
    Validate,

    /// Write the loaded dataset to another directory
    Export {
        #[arg(long)]
        out: PathBuf,

        /// Target format: csv or jsonl
        #[arg(long)]
        to: DataFormat,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = config(&cli).and_then(|cfg| match cli.command {
        Commands::List => {
            list_queries();
            Ok(())
        }
        Commands::Run {
            query,
            actor,
            year,
            min_count,
            output,
        } => {
            let params = QueryParams {
                actor,
                year,
                min_count,
            };
            run_named(cfg, query, &params, output)
        }
        Commands::Explain { query, pipeline } => explain(query, pipeline.as_deref()),
        Commands::Pipeline { file, output } => run_pipeline(cfg, &file, output),
        Commands::Validate => validate(&cfg),
        Commands::Export { out, to } => export(&cfg, &out, to),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if let Some(exec) = e.downcast_ref::<ExecError>() {
            let suggestions = exec.suggestions();
            if !suggestions.is_empty() {
                eprintln!("Suggestions:");
                for s in suggestions {
                    eprintln!("  - {}", s);
                }
            }
        }
        std::process::exit(1);
    }
}

/// Logs go to stderr so query output on stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,marquee=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn config(cli: &Cli) -> CliResult<EngineConfig> {
    let mut cfg = EngineConfig::from_env()?;
    if let Some(dir) = &cli.data_dir {
        cfg.data_dir = dir.clone();
    }
    if let Some(format) = cli.data_format {
        cfg.format = format;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn list_queries() {
    let width = NamedQuery::ALL.iter().map(|q| q.name().len()).max().unwrap_or(0);
    for q in NamedQuery::ALL {
        println!("{:<width$}  {}", q.name(), q.description(), width = width);
    }
}

fn run_named(
    cfg: EngineConfig,
    query: NamedQuery,
    params: &QueryParams,
    output: OutputFormat,
) -> CliResult<()> {
    let engine = Engine::from_config(cfg)?;
    let result = engine.queries().run(query, params)?;
    output::write_result(&result, output)?;
    Ok(())
}

fn run_pipeline(cfg: EngineConfig, file: &Path, output: OutputFormat) -> CliResult<()> {
    let plan = read_pipeline(file)?;
    let engine = Engine::from_config(cfg)?;
    let label = file.display().to_string();
    let (result, _manifest) = engine.run(&plan, &label)?;
    output::write_result(&result, output)?;
    Ok(())
}

fn explain(query: Option<NamedQuery>, pipeline: Option<&Path>) -> CliResult<()> {
    let (label, plan) = match (query, pipeline) {
        (Some(q), _) => (q.name().to_string(), q.default_plan()?),
        (None, Some(file)) => (file.display().to_string(), read_pipeline(file)?),
        (None, None) => return Err("explain needs a query name or --pipeline FILE".into()),
    };
    let hash = Engine::plan_hash(&plan)?;
    println!("Query: {}", label);
    println!("Plan hash: {}", hash);
    println!();
    print!("{}", plan);
    Ok(())
}

fn validate(cfg: &EngineConfig) -> CliResult<()> {
    let dataset = marquee_io::load_dataset(&cfg.data_dir, cfg.format)?;
    let problems = dataset.problems();
    if problems.is_empty() {
        println!(
            "✓ Dataset is valid ({} movies, {} actors, {} castings)",
            dataset.movies.len(),
            dataset.actors.len(),
            dataset.castings.len()
        );
        return Ok(());
    }
    for p in &problems {
        println!("  - {}", p);
    }
    Err(format!("{} integrity problem(s) in {}", problems.len(), cfg.data_dir).into())
}

fn export(cfg: &EngineConfig, out: &Path, to: DataFormat) -> CliResult<()> {
    let dataset = marquee_io::load_dataset(&cfg.data_dir, cfg.format)?;
    dataset.validate()?;
    marquee_io::save_dataset(&dataset, out, to)?;
    println!("✓ Wrote {} tables to {}", to, out.display());
    Ok(())
}

fn read_pipeline(file: &Path) -> CliResult<LogicalPlan> {
    let yaml = fs::read_to_string(file)?;
    Ok(parse_yaml_query(&yaml)?)
}
