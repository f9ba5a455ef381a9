use clap::{Parser, Subcommand, ValueEnum};
use diff_regions::config::{self, EngineSettings};
use diff_regions::{DiffRegionRegistry, DocumentHost, DocumentStore, ReconciliationController};
use std::path::{Path, PathBuf};
use url::Url;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Review a proposed rewrite of a file region by region
#[derive(Parser)]
#[command(name = "diff-regions")]
#[command(version)]
#[command(about = "Review a proposed rewrite of a file region by region")]
struct Cli {
    /// Configuration file (default: $XDG_CONFIG_HOME/diff-regions/diff-regions.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply PROPOSED over ORIGINAL and list the pending regions
    Show {
        original: PathBuf,
        proposed: PathBuf,

        /// Print annotations as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply PROPOSED over ORIGINAL, then accept or reject every region
    Apply {
        #[arg(value_enum)]
        action: Action,
        original: PathBuf,
        proposed: PathBuf,

        /// Write the result here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Action {
    Accept,
    Reject,
}

fn main() {
    let cli = Cli::parse();

    let settings = config::load_settings(cli.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    init_logging(&settings);

    let result = match cli.command {
        Commands::Show {
            original,
            proposed,
            json,
        } => show(settings, &original, &proposed, json),
        Commands::Apply {
            action,
            original,
            proposed,
            output,
        } => apply(settings, action, &original, &proposed, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(settings: &EngineSettings) {
    let default_filter = settings.log_level.as_deref().unwrap_or("warn");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Open ORIGINAL in an in-memory store and apply PROPOSED over it.
fn load(
    settings: EngineSettings,
    original: &Path,
    proposed: &Path,
) -> CliResult<(ReconciliationController<DocumentStore>, Url)> {
    let original_text = std::fs::read_to_string(original)?;
    let proposed_text = std::fs::read_to_string(proposed)?;

    let path = std::fs::canonicalize(original)?;
    let uri = Url::from_file_path(&path)
        .map_err(|()| format!("cannot express {} as a file URI", path.display()))?;

    let store = DocumentStore::new();
    store.open(uri.clone(), &original_text);

    let mut controller =
        ReconciliationController::new(DiffRegionRegistry::new(), store).with_settings(settings);
    controller.create_from_whole_document_replace(&uri, &proposed_text)?;
    Ok((controller, uri))
}

fn show(settings: EngineSettings, original: &Path, proposed: &Path, json: bool) -> CliResult<()> {
    let (controller, uri) = load(settings, original, proposed)?;
    let annotations = controller.list_annotations(&uri);

    if json {
        println!("{}", serde_json::to_string_pretty(&annotations)?);
        return Ok(());
    }

    for annotation in &annotations {
        println!(
            "region {} lines {} (+{} -{})",
            annotation.id, annotation.span, annotation.stats.added, annotation.stats.removed
        );
        println!("{}", annotation.render());
    }
    Ok(())
}

fn apply(
    settings: EngineSettings,
    action: Action,
    original: &Path,
    proposed: &Path,
    output: Option<&Path>,
) -> CliResult<()> {
    let (mut controller, uri) = load(settings, original, proposed)?;

    let resolved = match action {
        Action::Accept => controller.accept_all(&uri)?,
        Action::Reject => controller.reject_all(&uri)?,
    };
    log::info!(
        target: "diff_regions::cli",
        "Resolved {} region(s) in {}",
        resolved.len(),
        uri
    );

    let text = controller
        .host()
        .text(&uri)
        .ok_or_else(|| format!("{} was closed", uri))?;
    match output {
        Some(path) => std::fs::write(path, text)?,
        None => print!("{}", text),
    }
    Ok(())
}
