//! ontoscope CLI: explore, analyze and improve OWL/RDF ontologies.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use ontoscope::analysis::{AnalysisResult, Analyzer};
use ontoscope::config::{self, Config, Overrides, Provider};
use ontoscope::error::SessionError;
use ontoscope::llm::{self, ModelClient};
use ontoscope::projection::html;
use ontoscope::prompt::{self, PromptKind};
use ontoscope::report::Report;
use ontoscope::session::Session;

#[derive(Parser)]
#[command(
    name = "ontoscope",
    version,
    about = "OWL/RDF ontology explorer with LLM-assisted analysis"
)]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/ontoscope/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Model provider: openai, ollama or canned.
    #[arg(long, global = true)]
    provider: Option<Provider>,

    /// Model name, e.g. gpt-4o-mini or llama3.2.
    #[arg(long, global = true)]
    model: Option<String>,

    /// Model API base URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Base IRI for relative references in the RDF/XML input.
    #[arg(long, global = true)]
    base_iri: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the graph projection of an ontology.
    Render {
        /// RDF/XML file.
        file: PathBuf,

        /// Output format.
        #[arg(long, value_enum, default_value_t = RenderFormat::Json)]
        format: RenderFormat,

        /// Write to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Print the prompt that would be sent for one analysis kind.
    Prompt {
        /// RDF/XML file.
        file: PathBuf,

        /// structural, semantic, logical, recommendations or improvement.
        #[arg(long)]
        kind: PromptKind,

        /// Analysis JSON (required for the improvement prompt).
        #[arg(long)]
        analysis: Option<PathBuf>,
    },

    /// Run the four analyses and print the result as JSON.
    Analyze {
        /// RDF/XML file.
        file: PathBuf,

        /// Write the analysis JSON to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Apply model-proposed improvements and print the updated RDF/XML.
    Improve {
        /// RDF/XML file.
        file: PathBuf,

        /// Analysis JSON from `ontoscope analyze`; analyzed afresh when omitted.
        #[arg(long)]
        analysis: Option<PathBuf>,

        /// Write the updated ontology to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Write an analysis report (.docx, or Markdown for .md).
    Report {
        /// Analysis JSON from `ontoscope analyze`.
        analysis: PathBuf,

        /// Output path; the extension selects the format.
        #[arg(long, short, default_value = "ontology-analysis.docx")]
        output: PathBuf,
    },

    /// Check that the configured model is reachable.
    Check,

    /// Show or initialize the configuration.
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RenderFormat {
    Json,
    Html,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,
    /// Print the config file location.
    Path,
    /// Write the effective configuration to the config file.
    Init,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply(Overrides {
        provider: cli.provider,
        model: cli.model,
        base_url: cli.base_url,
        base_iri: cli.base_iri,
    })?;

    match cli.command {
        Commands::Render {
            file,
            format,
            output,
        } => {
            let mut session = session_for(&config, llm::CannedModel::new());
            let projection = session.load_file(&file)?;
            if projection.is_empty() {
                tracing::warn!("ontology has no nodes to draw");
            }
            for (group, count) in projection.group_counts() {
                tracing::info!(%group, count, "nodes");
            }
            let rendered = match format {
                RenderFormat::Json => projection.to_json().into_diagnostic()?,
                RenderFormat::Html => html::render_page(projection, &title_of(&file)),
            };
            emit(output.as_deref(), &rendered)?;
        }

        Commands::Prompt {
            file,
            kind,
            analysis,
        } => {
            let text = read_text(&file)?;
            let analyses = analysis.as_deref().map(read_analysis).transpose()?;
            let prompt =
                prompt::generate_prompt_with_base(&text, &config.base_iri, kind, analyses.as_ref())?;
            println!("{prompt}");
        }

        Commands::Analyze { file, output } => {
            let mut session = session_for(&config, llm::connect(&config.model)?);
            session.load_file(&file)?;
            let result = session.analyze()?;
            if result.is_empty() {
                tracing::warn!("every analysis section failed; see the log above");
            }
            let json = serde_json::to_string_pretty(result).into_diagnostic()?;
            emit(output.as_deref(), &json)?;
        }

        Commands::Improve {
            file,
            analysis,
            output,
        } => {
            let mut session = session_for(&config, llm::connect(&config.model)?);
            session.load_file(&file)?;
            match analysis {
                Some(path) => session.set_analysis(read_analysis(&path)?),
                None => {
                    session.analyze()?;
                }
            }
            let improved = session.improve()?;
            emit(output.as_deref(), improved)?;
        }

        Commands::Report { analysis, output } => {
            let result = read_analysis(&analysis)?;
            Report::from_analysis_with(&result, &config.report.placeholder).save(&output)?;
            eprintln!("Report written to {}", output.display());
        }

        Commands::Check => {
            let client = llm::connect(&config.model)?;
            client.probe()?;
            println!("{} is reachable", client.describe());
        }

        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => print!("{}", config.to_toml()?),
            ConfigAction::Path => println!("{}", config::default_path()?.display()),
            ConfigAction::Init => {
                let path = match cli.config {
                    Some(path) => path,
                    None => config::default_path()?,
                };
                if path.exists() {
                    miette::bail!("config file already exists: {}", path.display());
                }
                config.save(&path)?;
                println!("Wrote {}", path.display());
            }
        },
    }

    Ok(())
}

fn session_for<M: ModelClient>(config: &Config, model: M) -> Session<M> {
    let analyzer = Analyzer::new(model).with_base_iri(config.base_iri.clone());
    Session::new(analyzer)
        .with_palette(config.palette.clone())
        .with_placeholder(config.report.placeholder.clone())
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|source| SessionError::Read {
            path: path.display().to_string(),
            source,
        })
        .map_err(Into::into)
}

fn read_analysis(path: &Path) -> Result<AnalysisResult> {
    let content = read_text(path)?;
    serde_json::from_str(&content)
        .into_diagnostic()
        .map_err(|e| e.wrap_err(format!("invalid analysis JSON in {}", path.display())))
}

/// Window title for the HTML view.
fn title_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ontology".into())
}

fn emit(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).into_diagnostic()?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}
