use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tablekit_core::case::{to_camel_case, to_snake_case};
use tablekit_core::{MigrationRunner, TableInitMap};
use tablekit_db::{DefinitionSet, TablekitConfig};
use tablekit_sqlite::SqliteClient;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "tablekit", version = PACKAGE_VERSION)]
#[command(about = "Table-init migrations and camelCase/snake_case identifier conversion")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// SQLite table-init migrations driven by definition files.
    Migrate(MigrateArgs),
    /// Convert identifiers between camelCase and snake_case.
    Case(CaseArgs),
}

#[derive(Debug, Args)]
struct MigrateArgs {
    #[command(subcommand)]
    operation: MigrateOperation,
}

#[derive(Debug, Subcommand)]
enum MigrateOperation {
    /// Create and seed every defined table, in definition order.
    Up(TargetArgs),
    /// Drop every defined table, in reverse definition order.
    Down(TargetArgs),
    /// Drop, recreate, and reseed every defined table.
    Refresh(TargetArgs),
    /// Show which defined tables exist and their row counts.
    Status(TargetArgs),
}

#[derive(Debug, Args)]
struct TargetArgs {
    /// Database file path.
    #[arg(long)]
    db: Option<PathBuf>,
    /// Definition file or directory of definition files.
    #[arg(long)]
    definitions: Option<PathBuf>,
    /// Config file (default: tablekit.yaml or tablekit.yml in the current directory).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Keep table and column names exactly as written.
    #[arg(long)]
    no_case_transforms: bool,
}

#[derive(Debug, Args)]
struct CaseArgs {
    #[command(subcommand)]
    conversion: CaseConversion,
}

#[derive(Debug, Subcommand)]
enum CaseConversion {
    /// Print the snake_case form of each identifier.
    Snake(IdentifierArgs),
    /// Print the camelCase form of each identifier.
    Camel(IdentifierArgs),
}

#[derive(Debug, Args)]
struct IdentifierArgs {
    /// Identifiers to convert.
    #[arg(required = true)]
    identifiers: Vec<String>,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate(args) => run_migrate(args),
        Command::Case(args) => run_case(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

// ---------------------------------------------------------------------------
// migrate command
// ---------------------------------------------------------------------------

/// Database, definitions, and naming mode after merging flags with config.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    db: PathBuf,
    definitions: PathBuf,
    case_transforms: bool,
}

fn run_migrate(args: MigrateArgs) -> Result<(), String> {
    match args.operation {
        MigrateOperation::Up(a) => run_migrate_up(a),
        MigrateOperation::Down(a) => run_migrate_down(a),
        MigrateOperation::Refresh(a) => run_migrate_refresh(a),
        MigrateOperation::Status(a) => run_migrate_status(a),
    }
}

fn run_migrate_up(args: TargetArgs) -> Result<(), String> {
    let target = resolve_target(args, Path::new("."))?;
    let (client, map) = open_target(&target, OpenMode::Create)?;
    let report = MigrationRunner::new(&client)
        .up(&map)
        .map_err(|e| format!("Migration up failed: {e}"))?;
    println!(
        "Migration up complete. {} tables applied to '{}' in {:.2} seconds.",
        report.tables.len(),
        target.db.display(),
        report.elapsed_secs()
    );
    Ok(())
}

fn run_migrate_down(args: TargetArgs) -> Result<(), String> {
    let target = resolve_target(args, Path::new("."))?;
    let (client, map) = open_target(&target, OpenMode::Create)?;
    MigrationRunner::new(&client)
        .down(&map)
        .map_err(|e| format!("Migration down failed: {e}"))?;
    println!(
        "Migration down complete. {} tables dropped from '{}'.",
        map.len(),
        target.db.display()
    );
    Ok(())
}

fn run_migrate_refresh(args: TargetArgs) -> Result<(), String> {
    let target = resolve_target(args, Path::new("."))?;
    let (client, map) = open_target(&target, OpenMode::Create)?;
    let report = MigrationRunner::new(&client)
        .refresh(&map)
        .map_err(|e| format!("Refresh failed: {e}"))?;
    println!("Refresh complete (tables dropped, recreated, and reseeded):");
    for table in &report.tables {
        println!("  {table}");
    }
    Ok(())
}

fn run_migrate_status(args: TargetArgs) -> Result<(), String> {
    let target = resolve_target(args, Path::new("."))?;
    let (client, map) = open_target(&target, OpenMode::Existing)?;
    let status = MigrationRunner::new(&client)
        .status(&map)
        .map_err(|e| format!("Failed to get migration status: {e}"))?;
    println!("Migration Status:");
    println!(
        "  Tables exist: {}",
        if status.all_tables_exist() { "yes" } else { "no" }
    );
    for table in &status.tables {
        if table.exists {
            println!("  {}: {} rows", table.table, table.row_count);
        } else {
            println!("  {}: missing", table.table);
        }
    }
    Ok(())
}

/// Merges command-line flags over the config file. Flags win; anything still
/// missing is an error.
fn resolve_target(args: TargetArgs, cwd: &Path) -> Result<Target, String> {
    let config = match &args.config {
        Some(path) => TablekitConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        None => TablekitConfig::discover(cwd)
            .map_err(|e| format!("Failed to load config: {e}"))?
            .unwrap_or_default(),
    };

    let db = args
        .db
        .or(config.database)
        .ok_or_else(|| "no database given (use --db or set `database` in tablekit.yaml)".to_string())?;
    let definitions = args.definitions.or(config.definitions).ok_or_else(|| {
        "no definitions given (use --definitions or set `definitions` in tablekit.yaml)".to_string()
    })?;

    Ok(Target {
        db,
        definitions,
        case_transforms: config.case_transforms && !args.no_case_transforms,
    })
}

/// Whether a missing database file is created or reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenMode {
    Create,
    Existing,
}

fn open_target(
    target: &Target,
    mode: OpenMode,
) -> Result<(SqliteClient, TableInitMap<SqliteClient>), String> {
    let set = DefinitionSet::load(&target.definitions).map_err(|e| {
        format!(
            "Failed to load definitions '{}': {e}",
            target.definitions.display()
        )
    })?;
    debug!(tables = set.len(), "Loaded table definitions");

    let client = match mode {
        OpenMode::Create => SqliteClient::open(&target.db),
        OpenMode::Existing => SqliteClient::open_existing(&target.db),
    }
    .map_err(|e| format!("Failed to open database '{}': {e}", target.db.display()))?
        .with_case_transforms(target.case_transforms);
    Ok((client, set.to_init_map()))
}

// ---------------------------------------------------------------------------
// case command
// ---------------------------------------------------------------------------

fn run_case(args: CaseArgs) -> Result<(), String> {
    match args.conversion {
        CaseConversion::Snake(a) => print_converted(&a.identifiers, to_snake_case),
        CaseConversion::Camel(a) => print_converted(&a.identifiers, to_camel_case),
    }
    Ok(())
}

fn print_converted(identifiers: &[String], convert: impl Fn(&str) -> String) {
    for identifier in identifiers {
        println!("{}", convert(identifier));
    }
}
