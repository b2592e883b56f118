use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::debug;

use apisheet_core::acquire::{self, BackendSelection};
use apisheet_core::config::{self, ApisheetConfig, BackendChoice, CONFIG_FILE_NAME};
use apisheet_core::export::{self, ExportOptions};
use apisheet_core::schema::ApiSchema;
use apisheet_core::table;

#[derive(Parser)]
#[command(
    name = "apisheet",
    about = "Export Django REST Framework API documentation to a spreadsheet",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the API documentation spreadsheet
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// Output spreadsheet path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the rows that would be exported
    Preview {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: PreviewFormat,
    },

    /// Initialize a new apisheet configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Pre-generated schema file (JSON or YAML); skips running a backend
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Schema backend to use instead of probing
    #[arg(long)]
    backend: Option<BackendArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Spectacular,
    Yasg,
}

impl From<BackendArg> for BackendChoice {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Spectacular => BackendChoice::Spectacular,
            BackendArg::Yasg => BackendChoice::Yasg,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum PreviewFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export { source, output } => cmd_export(source, output),

        Commands::Preview { source, format } => cmd_preview(source, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "apisheet", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<ApisheetConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    Ok(config::load_config(&config_path)?)
}

/// Load the config and apply command-line overrides.
fn resolve_config(source: &SourceArgs) -> Result<ApisheetConfig> {
    let mut cfg = try_load_config()?.unwrap_or_default();
    if let Some(backend) = source.backend {
        cfg.backend = backend.into();
    }
    if let Some(ref input) = source.input {
        cfg.input = Some(input.display().to_string());
    }
    debug!("resolved config: {:?}", cfg);
    Ok(cfg)
}

/// Read the schema file if one is configured, otherwise run a backend.
fn load_schema(cfg: &ApisheetConfig) -> Result<ApiSchema> {
    if let Some(ref input) = cfg.input {
        let path = PathBuf::from(input);
        return acquire::load_schema_file(cfg.backend.kind(), &path)
            .with_context(|| format!("failed to load schema from {}", path.display()));
    }

    let selection = BackendSelection::from_config(cfg);
    Ok(acquire::acquire_schema(&selection)?)
}

fn cmd_export(source: SourceArgs, output: Option<PathBuf>) -> Result<()> {
    let cfg = resolve_config(&source)?;
    let schema = load_schema(&cfg)?;

    let destination = output.unwrap_or_else(|| PathBuf::from(&cfg.output));
    let options = ExportOptions {
        sheet_name: cfg.sheet_name.clone(),
        title: Some(cfg.info.title.clone()),
    };

    let table = export::export_to_table(&schema, &destination, &options)
        .with_context(|| format!("failed to export {}", destination.display()))?;

    eprintln!(
        "Exported {} operations from {} schema to {}",
        table.rows.len(),
        schema.kind(),
        destination.display()
    );
    Ok(())
}

fn cmd_preview(source: SourceArgs, format: PreviewFormat) -> Result<()> {
    let cfg = resolve_config(&source)?;
    let schema = load_schema(&cfg)?;
    let rows = table::flatten(&schema)?;

    match format {
        PreviewFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&rows)?;
            print!("{}", yaml);
        }
        PreviewFormat::Json => {
            let json = serde_json::to_string_pretty(&rows)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
