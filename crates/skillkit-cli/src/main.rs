mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::generate::GenerateSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "skillkit",
    about = "Run phased skill plans and render project templates",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from skillkit.yaml)
    #[arg(long, global = true, env = "SKILLKIT_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Log coordinator progress
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default skillkit.yaml if missing
    Init {
        /// Project type recorded in the config (web, mobile, desktop, backend)
        #[arg(long = "type")]
        project_type: Option<String>,

        /// Dispatch skills to the template generators instead of the stub runner
        #[arg(long)]
        generators: bool,
    },

    /// Run the plan phase by phase
    Run {
        /// Plan YAML file (default: phases from skillkit.yaml, else the built-in plan)
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Requirements as a JSON object
        #[arg(long)]
        requirements: Option<String>,

        /// Use the template generators for this run
        #[arg(long)]
        generators: bool,

        /// Write generated artifacts under the configured output directory
        #[arg(long)]
        write: bool,
    },

    /// Show the effective plan
    Plan {
        /// Plan YAML file (default: phases from skillkit.yaml, else the built-in plan)
        #[arg(long)]
        plan: Option<PathBuf>,
    },

    /// Render one generator's files
    Generate {
        #[command(subcommand)]
        kind: GenerateSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init {
            project_type,
            generators,
        } => cmd::init::run(&root, project_type.as_deref(), generators),
        Commands::Run {
            plan,
            requirements,
            generators,
            write,
        } => cmd::run::run(
            &root,
            cmd::run::RunArgs {
                plan,
                requirements,
                generators,
                write,
                debug: cli.debug,
            },
            cli.json,
        ),
        Commands::Plan { plan } => cmd::plan::run(&root, plan.as_deref(), cli.json),
        Commands::Generate { kind } => cmd::generate::run(&root, kind, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
