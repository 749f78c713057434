mod cmd;
mod output;
mod root;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use cmd::{
    action::ActionSubcommand, axis::AxisSubcommand, config::ConfigSubcommand,
    deliverable::DeliverableSubcommand, evidence::EvidenceSubcommand,
    indicator::IndicatorSubcommand, program::ProgramSubcommand, project::ProjectSubcommand,
    risk::RiskSubcommand, unit::UnitSubcommand, user::UserSubcommand,
};
use plano_core::config::Backend;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "plano",
    about = "Municipal strategic planning: units, programs, actions, evidence and alerts",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workspace root (default: auto-detect from .plano/)
    #[arg(long, global = true, env = "PLANO_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a plano workspace and seed the default strategic axes
    Init {
        /// Project name (default: directory name)
        #[arg(long)]
        name: Option<String>,
        /// Storage backend: document | sql
        #[arg(long, default_value = "document")]
        backend: Backend,
    },

    /// Manage secretariats
    Unit {
        #[command(subcommand)]
        subcommand: UnitSubcommand,
    },

    /// Manage strategic axes
    Axis {
        #[command(subcommand)]
        subcommand: AxisSubcommand,
    },

    /// Manage user profiles
    User {
        #[command(subcommand)]
        subcommand: UserSubcommand,
    },

    /// Manage programs
    Program {
        #[command(subcommand)]
        subcommand: ProgramSubcommand,
    },

    /// Manage projects inside a program
    Project {
        #[command(subcommand)]
        subcommand: ProjectSubcommand,
    },

    /// Manage actions
    Action {
        #[command(subcommand)]
        subcommand: ActionSubcommand,
    },

    /// Manage deliverables of an action
    Deliverable {
        #[command(subcommand)]
        subcommand: DeliverableSubcommand,
    },

    /// Manage evidence of an action
    Evidence {
        #[command(subcommand)]
        subcommand: EvidenceSubcommand,
    },

    /// Manage program indicators
    Indicator {
        #[command(subcommand)]
        subcommand: IndicatorSubcommand,
    },

    /// Manage program risks
    Risk {
        #[command(subcommand)]
        subcommand: RiskSubcommand,
    },

    /// Recompute action statuses from their dates
    Automate {
        /// Evaluate as of this date instead of today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Show a user's pending demands
    Alerts {
        /// User profile id
        #[arg(long)]
        user: String,
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Execution dashboard
    Dashboard {
        /// Drill into one unit
        #[arg(long, conflicts_with = "program")]
        unit: Option<String>,
        /// Drill into one program
        #[arg(long)]
        program: Option<String>,
        /// Scope the overview to what this user may see
        #[arg(long)]
        user: Option<String>,
    },

    /// Inspect and validate the workspace config
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Serve the JSON API
    Ui {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "3141")]
        port: u16,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Ui { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let json = cli.json;

    let result = match cli.command {
        Commands::Init { name, backend } => cmd::init::run(&root, name.as_deref(), backend, json),
        Commands::Unit { subcommand } => cmd::unit::run(&root, subcommand, json),
        Commands::Axis { subcommand } => cmd::axis::run(&root, subcommand, json),
        Commands::User { subcommand } => cmd::user::run(&root, subcommand, json),
        Commands::Program { subcommand } => cmd::program::run(&root, subcommand, json),
        Commands::Project { subcommand } => cmd::project::run(&root, subcommand, json),
        Commands::Action { subcommand } => cmd::action::run(&root, subcommand, json),
        Commands::Deliverable { subcommand } => cmd::deliverable::run(&root, subcommand, json),
        Commands::Evidence { subcommand } => cmd::evidence::run(&root, subcommand, json),
        Commands::Indicator { subcommand } => cmd::indicator::run(&root, subcommand, json),
        Commands::Risk { subcommand } => cmd::risk::run(&root, subcommand, json),
        Commands::Automate { today } => cmd::automate::run(&root, today, json),
        Commands::Alerts { user, today } => cmd::alerts::run(&root, &user, today, json),
        Commands::Dashboard {
            unit,
            program,
            user,
        } => cmd::dashboard::run(
            &root,
            unit.as_deref(),
            program.as_deref(),
            user.as_deref(),
            json,
        ),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, json),
        Commands::Ui { port, no_open } => cmd::ui::run(&root, port, no_open),
    };

    if let Err(e) = result {
        // Full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
