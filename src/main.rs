use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use thiserror::Error;

use pref_kv::{PrefStore, PrefValue, StoreError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid {kind} value '{raw}': {message}")]
    InvalidValue {
        kind: &'static str,
        raw: String,
        message: String,
    },

    #[error("Key not found: {0}")]
    KeyNotFound(String),
}

/// Value kind accepted by `set`.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Kind {
    Bool,
    Int,
    Float,
    Long,
    #[default]
    Text,
    /// Comma-separated set of strings
    Set,
}

impl Kind {
    fn name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Long => "long",
            Kind::Text => "text",
            Kind::Set => "set",
        }
    }
}

#[derive(Parser)]
#[command(name = "pref-kv")]
#[command(about = "Persistent typed preferences storage with base64 object encoding")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new preferences store
    Init {
        /// Store path
        #[arg(long, default_value = ".pref-kv", env = "PREF_KV_PATH")]
        path: PathBuf,

        /// Namespace to open
        #[arg(long, default_value = "default", env = "PREF_KV_NAME")]
        name: String,
    },

    /// Set a value
    Set {
        /// Key for the value
        key: String,

        /// Value to store
        value: String,

        /// Kind to parse the value as
        #[arg(long, value_enum, default_value_t)]
        kind: Kind,

        /// Store path
        #[arg(long, default_value = ".pref-kv", env = "PREF_KV_PATH")]
        path: PathBuf,

        /// Namespace to open
        #[arg(long, default_value = "default", env = "PREF_KV_NAME")]
        name: String,
    },

    /// Get a value
    Get {
        /// Key for the value
        key: String,

        /// Print the value kind alongside the value
        #[arg(long)]
        kind: bool,

        /// Store path
        #[arg(long, default_value = ".pref-kv", env = "PREF_KV_PATH")]
        path: PathBuf,

        /// Namespace to open
        #[arg(long, default_value = "default", env = "PREF_KV_NAME")]
        name: String,
    },

    /// Check whether a key exists
    Has {
        /// Key to check
        key: String,

        /// Store path
        #[arg(long, default_value = ".pref-kv", env = "PREF_KV_PATH")]
        path: PathBuf,

        /// Namespace to open
        #[arg(long, default_value = "default", env = "PREF_KV_NAME")]
        name: String,
    },

    /// Delete a key
    Del {
        /// Key to delete
        key: String,

        /// Store path
        #[arg(long, default_value = ".pref-kv", env = "PREF_KV_PATH")]
        path: PathBuf,

        /// Namespace to open
        #[arg(long, default_value = "default", env = "PREF_KV_NAME")]
        name: String,
    },

    /// List keys in the namespace
    List {
        /// Filter keys by prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Maximum number of keys to return
        #[arg(long)]
        limit: Option<usize>,

        /// Store path
        #[arg(long, default_value = ".pref-kv", env = "PREF_KV_PATH")]
        path: PathBuf,

        /// Namespace to open
        #[arg(long, default_value = "default", env = "PREF_KV_NAME")]
        name: String,
    },

    /// Remove every key in the namespace
    Clear {
        /// Store path
        #[arg(long, default_value = ".pref-kv", env = "PREF_KV_PATH")]
        path: PathBuf,

        /// Namespace to open
        #[arg(long, default_value = "default", env = "PREF_KV_NAME")]
        name: String,
    },
}

fn parse_value(kind: Kind, raw: &str) -> Result<PrefValue, AppError> {
    let invalid = |message: String| AppError::InvalidValue {
        kind: kind.name(),
        raw: raw.to_string(),
        message,
    };

    match kind {
        Kind::Bool => raw
            .parse()
            .map(PrefValue::Bool)
            .map_err(|e| invalid(format!("{}", e))),
        Kind::Int => raw
            .parse()
            .map(PrefValue::Int)
            .map_err(|e| invalid(format!("{}", e))),
        Kind::Float => raw
            .parse()
            .map(PrefValue::Float)
            .map_err(|e| invalid(format!("{}", e))),
        Kind::Long => raw
            .parse()
            .map(PrefValue::Long)
            .map_err(|e| invalid(format!("{}", e))),
        Kind::Text => Ok(PrefValue::Text(raw.to_string())),
        Kind::Set => Ok(PrefValue::TextSet(
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )),
    }
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path, name } => {
            PrefStore::init(&path, &name)?;
            println!("Initialized store at {}", path.display());
        }

        Commands::Set {
            key,
            value,
            kind,
            path,
            name,
        } => {
            let store = PrefStore::open(&path, &name)?;
            store.put(&key, parse_value(kind, &value)?)?;
        }

        Commands::Get {
            key,
            kind,
            path,
            name,
        } => {
            let store = PrefStore::open(&path, &name)?;
            match store.get(&key)? {
                Some(value) if kind => println!("{} ({})", value, value.kind()),
                Some(value) => println!("{}", value),
                None => return Err(AppError::KeyNotFound(key)),
            }
        }

        Commands::Has { key, path, name } => {
            let store = PrefStore::open(&path, &name)?;
            println!("{}", store.contains(&key)?);
        }

        Commands::Del { key, path, name } => {
            let store = PrefStore::open(&path, &name)?;
            store.remove(&key)?;
        }

        Commands::List {
            prefix,
            limit,
            path,
            name,
        } => {
            let store = PrefStore::open(&path, &name)?;
            for key in store.keys(prefix.as_deref(), limit)? {
                println!("{}", key);
            }
        }

        Commands::Clear { path, name } => {
            let store = PrefStore::open(&path, &name)?;
            store.clear()?;
        }
    }

    Ok(())
}
