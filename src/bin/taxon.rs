//! Taxon CLI: diagnostic front end over a JSON corpus.
//!
//! Usage:
//!   taxon compile <corpus.json> [--sequential] [--json] [--config path]
//!   taxon dump <corpus.json> [--concept id] [--config path]
//!   taxon classify <corpus.json> --concept id [--config path]

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taxon::compile::LogProgress;
use taxon::model::dump;
use taxon::{
    CompilerConfig, ConceptId, ConceptRegistry, CorpusCompiler, MemoryStore, ReasonerAdapter,
    Statistics, ToldClassifier,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "taxon",
    version,
    about = "Compile stated axiom graphs into an EL++ concept model"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Path to a YAML config file (default: <config dir>/taxon/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile every stated definition and print statistics
    Compile {
        /// JSON corpus file
        corpus: PathBuf,
        /// Compile on one thread
        #[arg(long)]
        sequential: bool,
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compile and print the text dump of the model
    Dump {
        /// JSON corpus file
        corpus: PathBuf,
        /// Only dump this concept
        #[arg(long)]
        concept: Option<i32>,
    },
    /// Classify with the told-subsumption classifier and query one concept
    Classify {
        /// JSON corpus file
        corpus: PathBuf,
        /// Concept to query
        #[arg(long)]
        concept: i32,
    },
}

fn init_tracing(config: &CompilerConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_store(corpus: &Path) -> Result<MemoryStore, String> {
    MemoryStore::load_json(corpus).map_err(|e| format!("Failed to load corpus '{}': {}", corpus.display(), e))
}

fn compile(config: &CompilerConfig, corpus: &Path) -> Result<(Arc<ConceptRegistry>, Statistics), String> {
    let store = open_store(corpus)?;
    let registry = Arc::new(ConceptRegistry::new());
    let compiler = CorpusCompiler::new(Arc::new(store), registry.clone(), config.clone())
        .with_progress(Arc::new(LogProgress));
    let stats = compiler.compile_stated().map_err(|e| e.to_string())?;
    Ok((registry, stats))
}

fn cmd_compile(config: CompilerConfig, corpus: &Path, sequential: bool, json: bool) -> i32 {
    let config = config.with_parallel(!sequential);
    let stats = match compile(&config, corpus) {
        Ok((_, stats)) => stats,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if json {
        match serde_json::to_string_pretty(&stats) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    } else {
        println!("{}", stats);
        for concept in &stats.without_definitions {
            println!("  no definitions: {}", concept);
        }
    }
    0
}

fn cmd_dump(config: CompilerConfig, corpus: &Path, concept: Option<i32>) -> i32 {
    let registry = match compile(&config, corpus) {
        Ok((registry, _)) => registry,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    match concept.map(ConceptId::new) {
        Some(id) => match registry.concept(id) {
            Some(model) => {
                print!("{}", dump::dump_concept(&model));
                if let Some(role_type) = registry.role_type(id) {
                    print!("{}", dump::dump_role_type(&role_type));
                }
                0
            }
            None => {
                eprintln!("Error: concept {} not found", id);
                1
            }
        },
        None => {
            print!("{}", dump::dump_registry(&registry));
            0
        }
    }
}

async fn cmd_classify(config: CompilerConfig, corpus: &Path, concept: i32) -> i32 {
    let store = match open_store(corpus) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let adapter = ReasonerAdapter::new(Arc::new(store), config, ToldClassifier::new());
    if let Err(e) = adapter.full_refresh().await {
        eprintln!("Error: {}", e);
        return 1;
    }

    let id = ConceptId::new(concept);
    let queries = async {
        let parents = adapter.get_parents(id).await?;
        let children = adapter.get_children(id).await?;
        let equivalents = adapter.get_equivalents(id).await?;
        Ok::<_, taxon::ReasonerError>((parents, children, equivalents))
    };
    match queries.await {
        Ok((parents, children, equivalents)) => {
            println!("parents: {}", join(&parents));
            println!("children: {}", join(&children));
            println!("equivalents: {}", join(&equivalents));
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn join<'a>(ids: impl IntoIterator<Item = &'a ConceptId>) -> String {
    let ids: Vec<String> = ids.into_iter().map(ToString::to_string).collect();
    ids.join(", ")
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = match CompilerConfig::load_or_default(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config);

    let code = match cli.command {
        Commands::Compile {
            corpus,
            sequential,
            json,
        } => cmd_compile(config, &corpus, sequential, json),
        Commands::Dump { corpus, concept } => cmd_dump(config, &corpus, concept),
        Commands::Classify { corpus, concept } => cmd_classify(config, &corpus, concept).await,
    };
    std::process::exit(code);
}
