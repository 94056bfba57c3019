use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::CastorError;

const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides, e.g. `MGDEMO_SERVER=db:27017`.
pub const ENV_PREFIX: &str = "MGDEMO_";

/// Command-line flags. Every flag is optional; an unset flag leaves the
/// value from the lower layers (defaults, `config.toml`, environment)
/// untouched.
#[derive(Debug, Clone, Default, Parser)]
#[command(version, about = "Looping CRUD exerciser for MongoDB collections")]
pub struct Args {
    /// MongoDB server to connect to, as host:port
    #[arg(long)]
    pub server: Option<String>,

    /// Database holding the demo collection
    #[arg(long)]
    pub database: Option<String>,

    /// Collection the CRUD sequence runs against
    #[arg(long)]
    pub collection: Option<String>,

    /// Insert-pair repetitions per insert-batch invocation
    #[arg(long)]
    pub rounds: Option<u32>,

    /// Number of CRUD passes to run (omit to loop forever)
    #[arg(long)]
    pub cycles: Option<u64>,
}

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// MongoDB endpoint as `host:port` (no scheme).
    /// TOML: `server`. Env: `MGDEMO_SERVER` (legacy alias
    /// `MGDEMO_SERVERNAME`). Default: `localhost:27017`.
    #[serde(default = "default_server")]
    pub server: String,

    /// Database holding the demo collection.
    /// TOML: `database`. Env: `MGDEMO_DATABASE`. Default: `test`.
    #[serde(default = "default_database")]
    pub database: String,

    /// Collection the CRUD sequence runs against.
    /// TOML: `collection`. Env: `MGDEMO_COLLECTION`. Default: `trainers`.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Insert-pair repetitions per insert-batch invocation (3 documents
    /// per repetition).
    /// TOML: `rounds`. Env: `MGDEMO_ROUNDS`. Default: `1000`.
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    /// Number of CRUD passes to run before exiting. Unset loops forever.
    /// TOML: `cycles`. Env: `MGDEMO_CYCLES`. Default: unset.
    #[serde(default)]
    pub cycles: Option<u64>,

    /// Exclusive upper bound, in whole seconds, on the random pause
    /// between passes.
    /// TOML: `pause_max_secs`. Env: `MGDEMO_PAUSE_MAX_SECS`. Default: `10`.
    #[serde(default = "default_pause_max_secs")]
    pub pause_max_secs: u64,

    /// Log level used when `RUST_LOG` is unset (e.g., "error", "warn",
    /// "info", "debug", "trace").
    /// TOML: `loglevel`. Env: `MGDEMO_LOGLEVEL`. Default: `info`.
    #[serde(default = "default_loglevel")]
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: default_server(),
            database: default_database(),
            collection: default_collection(),
            rounds: default_rounds(),
            cycles: None,
            pause_max_secs: default_pause_max_secs(),
            loglevel: default_loglevel(),
        }
    }
}

impl Config {
    /// Builds a Figment that merges defaults, an optional `config.toml`,
    /// and `MGDEMO_`-prefixed environment variables, in that precedence
    /// order (later layers win). `MGDEMO_SERVERNAME` is accepted as a
    /// legacy spelling of `MGDEMO_SERVER`.
    pub fn figment() -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let figment = if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment.merge(Toml::file(DEFAULT_CONFIG_FILE))
        } else {
            figment
        };
        figment.merge(Env::prefixed(ENV_PREFIX).map(|key| {
            if key.as_str().eq_ignore_ascii_case("servername") {
                "server".into()
            } else {
                key.as_str().to_owned().into()
            }
        }))
    }

    /// Loads configuration from all layers and applies command-line flags
    /// on top.
    pub fn load(args: &Args) -> Result<Self, CastorError> {
        let mut cfg: Self = Self::figment().extract()?;
        cfg.apply_args(args);
        Ok(cfg)
    }

    fn apply_args(&mut self, args: &Args) {
        if let Some(server) = args.server.clone() {
            self.server = server;
        }
        if let Some(database) = args.database.clone() {
            self.database = database;
        }
        if let Some(collection) = args.collection.clone() {
            self.collection = collection;
        }
        if let Some(rounds) = args.rounds {
            self.rounds = rounds;
        }
        if let Some(cycles) = args.cycles {
            self.cycles = Some(cycles);
        }
    }

    /// Resolves the knobs that shape one demo run.
    pub fn demo(&self) -> DemoOptions {
        DemoOptions {
            rounds: self.rounds,
            cycles: self.cycles,
            pause_max_secs: self.pause_max_secs,
        }
    }
}

/// Knobs resolved from [`Config`] that shape one demo run.
#[derive(Debug, Clone)]
pub struct DemoOptions {
    /// Insert-pair repetitions per insert-batch invocation.
    pub rounds: u32,

    /// Number of CRUD passes; `None` loops forever.
    pub cycles: Option<u64>,

    /// Exclusive upper bound on the random inter-pass pause, in seconds.
    pub pause_max_secs: u64,
}

fn default_server() -> String {
    "localhost:27017".to_string()
}

fn default_database() -> String {
    "test".to_string()
}

fn default_collection() -> String {
    "trainers".to_string()
}

fn default_rounds() -> u32 {
    1000
}

fn default_pause_max_secs() -> u64 {
    10
}

fn default_loglevel() -> String {
    "info".to_string()
}
