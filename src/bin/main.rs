//! modlit CLI - Inspect databases and harvest model metadata
//!
//! Usage:
//!   modlit exec-sql <file.sql> [--url <url>]
//!   modlit inspect [TABLE] [--url <url>] [--schema <schema>]
//!   modlit create-db [--url <url>]
//!   modlit exists [--url <url>]
//!   modlit schema <catalog.toml> [MODEL]... [--format api|serial]
//!   modlit meta <catalog.toml> [MODEL]
//!
//! Examples:
//!   modlit exec-sql migrations/001_roads.sql --url sqlite://data/roads.db
//!   modlit inspect roads --url sqlite://data/roads.db
//!   modlit schema catalog.toml Road --format serial

use clap::{Parser, Subcommand, ValueEnum};
use modlit::config::Settings;
use modlit::db::{self, ConnectionConfig};
use modlit::loader::{self, LoadedCatalog};
use modlit::meta::Export;
use modlit::schema::{api_model, ApiNamespace, SchemaCache, SerialSchema};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "modlit")]
#[command(about = "modlit - Column and table metadata for relational data models")]
#[command(version)]
struct Cli {
    /// Path to a config file (overrides MODLIT_CONFIG and the default locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute the statements in a SQL script
    ExecSql {
        /// Path to the .sql file
        file: PathBuf,

        /// Database URL (defaults to [database].url)
        #[arg(long)]
        url: Option<String>,
    },

    /// Describe the tables of a database as JSON
    Inspect {
        /// Describe only this table
        table: Option<String>,

        /// Database URL (defaults to [database].url)
        #[arg(long)]
        url: Option<String>,

        /// Schema to inspect
        #[arg(long)]
        schema: Option<String>,
    },

    /// Create an empty database
    CreateDb {
        /// Database URL (defaults to [database].url)
        #[arg(long)]
        url: Option<String>,

        /// Create this database next to the configured one instead
        #[arg(long)]
        dbname: Option<String>,
    },

    /// Check whether a database exists
    Exists {
        /// Database URL (defaults to [database].url)
        #[arg(long)]
        url: Option<String>,
    },

    /// Generate schemas for models in a catalog
    Schema {
        /// Path to the catalog .toml file
        catalog: PathBuf,

        /// Model names (every model in the catalog if none are given)
        models: Vec<String>,

        /// Schema flavor
        #[arg(short, long, default_value = "api")]
        format: SchemaFormat,

        /// Name for the generated schema
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Export table metadata from a catalog as JSON
    Meta {
        /// Path to the catalog .toml file
        catalog: PathBuf,

        /// Model name (exports the whole catalog if not specified)
        model: Option<String>,
    },
}

#[derive(Clone, ValueEnum)]
enum SchemaFormat {
    /// REST-style API model
    Api,
    /// Serialization schema
    Serial,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = modlit::logging::init(&settings.logging) {
        eprintln!("Error initializing logging: {}", e);
        return ExitCode::FAILURE;
    }

    match cli.command {
        Commands::ExecSql { file, url } => cmd_exec_sql(&settings, file, url),
        Commands::Inspect { table, url, schema } => cmd_inspect(&settings, table, url, schema),
        Commands::CreateDb { url, dbname } => cmd_create_db(&settings, url, dbname),
        Commands::Exists { url } => cmd_exists(&settings, url),
        Commands::Schema {
            catalog,
            models,
            format,
            name,
        } => cmd_schema(&settings, catalog, models, format, name),
        Commands::Meta { catalog, model } => cmd_meta(catalog, model),
    }
}

fn connection_config(settings: &Settings, url: Option<String>) -> Result<ConnectionConfig, String> {
    match url {
        Some(url) => ConnectionConfig::from_url(&url)
            .map(|c| c.read_only(settings.database.read_only))
            .map_err(|e| e.to_string()),
        None => settings
            .database
            .connection_config()
            .map_err(|e| e.to_string()),
    }
}

fn print_json(value: &Value) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{}", s);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error rendering JSON: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_catalog(path: &Path) -> Result<LoadedCatalog, ExitCode> {
    loader::load_file(path).map_err(|e| {
        eprintln!("Error loading catalog '{}': {}", path.display(), e);
        ExitCode::FAILURE
    })
}

fn cmd_exec_sql(settings: &Settings, file: PathBuf, url: Option<String>) -> ExitCode {
    let config = match connection_config(settings, url) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let result = db::connect(&config).and_then(|conn| db::exec_sql(&conn, &file));
    match result {
        Ok(count) => {
            println!("Executed {} statement(s) from {}", count, file.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error executing '{}': {}", file.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_inspect(
    settings: &Settings,
    table: Option<String>,
    url: Option<String>,
    schema: Option<String>,
) -> ExitCode {
    let config = match connection_config(settings, url) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let conn = match db::connect(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error connecting: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let schema = schema.as_deref();

    let tables = match &table {
        Some(name) => vec![name.clone()],
        None => match db::list_tables(&conn, schema) {
            Ok(names) => names,
            Err(e) => {
                eprintln!("Error listing tables: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let mut infos = Vec::with_capacity(tables.len());
    for name in &tables {
        match db::table_info(&conn, schema, name) {
            Ok(Some(info)) => infos.push(info),
            Ok(None) => {
                eprintln!("Table not found: {}", name);
                return ExitCode::FAILURE;
            }
            Err(e) => {
                eprintln!("Error inspecting '{}': {}", name, e);
                return ExitCode::FAILURE;
            }
        }
    }

    match serde_json::to_value(&infos) {
        Ok(value) => print_json(&value),
        Err(e) => {
            eprintln!("Error rendering JSON: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_create_db(settings: &Settings, url: Option<String>, dbname: Option<String>) -> ExitCode {
    let config = match connection_config(settings, url) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let config = match &dbname {
        Some(name) => config.with_dbname(name),
        None => config,
    };
    match db::create_db(&config) {
        Ok(()) => {
            match config.path() {
                Some(path) => println!("Created {}", path.display()),
                None => println!("In-memory databases need no creation"),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_exists(settings: &Settings, url: Option<String>) -> ExitCode {
    let config = match connection_config(settings, url) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if db::database_exists(&config) {
        println!("yes");
        ExitCode::SUCCESS
    } else {
        println!("no");
        ExitCode::FAILURE
    }
}

fn cmd_schema(
    settings: &Settings,
    catalog: PathBuf,
    models: Vec<String>,
    format: SchemaFormat,
    name: Option<String>,
) -> ExitCode {
    let loaded = match load_catalog(&catalog) {
        Ok(l) => l,
        Err(code) => return code,
    };

    let ids = if models.is_empty() {
        loaded.models.clone()
    } else {
        let mut ids = Vec::with_capacity(models.len());
        for model in &models {
            let Some(id) = loaded.model_id(model) else {
                eprintln!("Model not found: {}", model);
                return ExitCode::FAILURE;
            };
            ids.push(id);
        }
        ids
    };
    if name.is_some() && ids.len() != 1 {
        eprintln!("--name needs exactly one model");
        return ExitCode::FAILURE;
    }

    // One namespace and one cache serve every requested model.
    let mut namespace = ApiNamespace::new("default");
    let mut cache = settings.schema.cache.then(SchemaCache::new);
    let mut rendered = serde_json::Map::new();
    for &id in &ids {
        let value = match format {
            SchemaFormat::Api => api_model(&mut namespace, &loaded.registry, id, name.as_deref())
                .map(|m| m.to_json()),
            SchemaFormat::Serial => match cache.as_mut() {
                Some(cache) => cache
                    .get_or_build(&loaded.registry, id, name.as_deref())
                    .map(|s| s.to_json()),
                None => SerialSchema::for_model(&loaded.registry, id, name.as_deref())
                    .map(|s| s.to_json()),
            },
        };
        let value = match value {
            Ok(v) => v,
            Err(e) => {
                eprintln!("Error generating schema: {}", e);
                return ExitCode::FAILURE;
            }
        };
        let model = loaded
            .registry
            .model(id)
            .map(|m| m.name().to_string())
            .unwrap_or_default();
        rendered.insert(model, value);
    }
    if let Some(cache) = &cache {
        tracing::debug!(schemas = cache.len(), "serial schemas generated");
    }

    let output = if ids.len() == 1 {
        rendered.into_iter().map(|(_, v)| v).next().unwrap_or(Value::Null)
    } else {
        Value::Object(rendered)
    };
    print_json(&output)
}

fn cmd_meta(catalog: PathBuf, model: Option<String>) -> ExitCode {
    let loaded = match load_catalog(&catalog) {
        Ok(l) => l,
        Err(code) => return code,
    };

    let exported = match &model {
        Some(name) => {
            let Some(id) = loaded.model_id(name) else {
                eprintln!("Model not found: {}", name);
                return ExitCode::FAILURE;
            };
            match loaded.registry.table_meta(id) {
                Some(table) => table.export(),
                None => {
                    eprintln!("Model '{}' has no table metadata", name);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => match loaded.model_meta() {
            Some(meta) => meta.export(),
            None => {
                eprintln!("Catalog has no [catalog] header; name a model to export");
                return ExitCode::FAILURE;
            }
        },
    };

    print_json(&exported.unwrap_or(Value::Null))
}
