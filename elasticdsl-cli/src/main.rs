use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use elasticdsl::{ClientConfig, IndexSettings, Method, SearchClient, TransportResponse};
use serde_json::Value;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "elasticdsl")]
#[command(about = "Search and index administration for Elasticsearch-style engines")]
#[command(version)]
struct Cli {
    /// Client config file (TOML)
    #[arg(short, long, global = true, env = "ELASTICDSL_CONFIG")]
    config: Option<PathBuf>,

    /// Engine host, overrides the config file
    #[arg(long, global = true)]
    host: Option<String>,

    /// Engine port, overrides the config file
    #[arg(long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simple `key:term` search
    Search {
        index: String,

        key: String,

        term: String,

        /// Restrict the search to one document type
        #[arg(short = 't', long = "type")]
        doc_type: Option<String>,
    },

    /// List indices
    Indices,

    /// Create an index
    CreateIndex {
        index: String,

        #[arg(long, default_value = "5")]
        shards: u32,

        #[arg(long, default_value = "1")]
        replicas: u32,
    },

    /// Delete an index
    DeleteIndex { index: String },

    /// Open a closed index
    OpenIndex { index: String },

    /// Close an index
    CloseIndex { index: String },

    /// Send a request to an arbitrary path
    Raw {
        /// Path relative to the engine root, e.g. `_cluster/health`
        path: String,

        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// JSON request body
        #[arg(short, long)]
        data: Option<String>,
    },
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    Ok(config)
}

fn init_logging(config: &ClientConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone()),
    );
    let json = config.logging.format.eq_ignore_ascii_case("json");

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn emit(response: TransportResponse) -> Result<()> {
    print_json(&response.body)?;
    if !response.is_success() {
        bail!("request failed (status {})", response.status.code());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(&config);

    tracing::debug!("Using engine at {}", config.base_url());
    let client = SearchClient::new(config)?;

    match cli.command {
        Commands::Search {
            index,
            key,
            term,
            doc_type,
        } => {
            let response = match doc_type {
                Some(doc_type) => client.search_simple(&index, &doc_type, &key, &term).await?,
                None => client.search_index_simple(&index, &key, &term).await?,
            };
            emit(response)?;
        }
        Commands::Indices => match client.index_list().await? {
            Ok(names) => {
                for name in names {
                    println!("{}", name);
                }
            }
            Err(response) => emit(response)?,
        },
        Commands::CreateIndex {
            index,
            shards,
            replicas,
        } => {
            let settings = IndexSettings::new(shards, replicas);
            emit(client.index_create(&index, settings).await?)?;
        }
        Commands::DeleteIndex { index } => emit(client.index_delete(&index).await?)?,
        Commands::OpenIndex { index } => emit(client.index_open(&index).await?)?,
        Commands::CloseIndex { index } => emit(client.index_close(&index).await?)?,
        Commands::Raw { path, method, data } => {
            let method: Method = method.parse()?;
            let body: Option<Value> = data
                .as_deref()
                .map(serde_json::from_str)
                .transpose()
                .context("--data is not valid JSON")?;
            emit(client.raw(&path, method, body.as_ref()).await?)?;
        }
    }

    Ok(())
}
