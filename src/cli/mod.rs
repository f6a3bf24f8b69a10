use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::crypto::KeyMaterial;
use crate::report::ReportFilters;

/// Environment variable holding the AES key as hex.
pub const KEY_ENV: &str = "AES_KEY_HEX";
/// Environment variable holding the AES IV as hex.
pub const IV_ENV: &str = "AES_IV_HEX";
/// Environment variable pointing at the character reference table.
pub const CHARACTERS_ENV: &str = "ASSETDIFF_CHARACTERS";
/// Character table used when neither `--characters` nor the environment names one.
pub const DEFAULT_CHARACTERS_PATH: &str = "data/character_info.csv";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// AES key as hex (16, 24 or 32 bytes). Falls back to the AES_KEY_HEX environment variable.
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// AES IV as hex (16 bytes). Falls back to the AES_IV_HEX environment variable.
    #[arg(long, global = true)]
    pub iv: Option<String>,

    /// Character reference table (CSV).
    /// Falls back to ASSETDIFF_CHARACTERS, then data/character_info.csv.
    #[arg(long, global = true)]
    pub characters: Option<PathBuf>,

    /// Log debug events, including classification ambiguities.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Report every asset path of one catalog, grouped by squad and character.
    #[command(alias = "a")]
    Analyze {
        /// The encrypted catalog (or path listing with --listing).
        #[arg(required = true)]
        catalog: PathBuf,

        /// Treat the input as a path listing written by `extract` instead of an encrypted catalog.
        #[arg(long)]
        listing: bool,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Report the asset paths added between two catalog versions.
    #[command(alias = "c")]
    Compare {
        /// The newer catalog.
        #[arg(required = true)]
        new: PathBuf,

        /// The older catalog to compare against.
        #[arg(required = true)]
        old: PathBuf,

        /// Treat both inputs as path listings written by `extract`.
        #[arg(long)]
        listing: bool,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Decode catalogs and write their sorted asset path listings.
    #[command(alias = "x")]
    Extract {
        /// One or more encrypted catalogs. A failing catalog is reported and skipped.
        #[arg(required = true)]
        catalogs: Vec<PathBuf>,

        /// Directory receiving one `<catalog stem>.txt` per catalog. Defaults to stdout.
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,
    },

    /// List squads and their characters from the reference table.
    #[command(alias = "r")]
    Roster {
        /// Only list these squads.
        #[arg(long = "squad", value_name = "SQUAD")]
        squads: Vec<String>,
    },
}

/// Squad, character and keyword restrictions shared by `analyze` and `compare`.
#[derive(ClapArgs, Clone, Debug, Default)]
pub struct FilterArgs {
    /// Only report characters of this squad. Repeat for several squads.
    #[arg(long = "squad", value_name = "SQUAD")]
    pub squads: Vec<String>,

    /// Only report this character (display name). Repeat for several characters.
    #[arg(long = "character", value_name = "NAME")]
    pub names: Vec<String>,

    /// Only report paths containing this text (case-insensitive).
    #[arg(long)]
    pub keyword: Option<String>,
}

impl FilterArgs {
    pub fn to_filters(&self) -> ReportFilters {
        ReportFilters::new()
            .with_squads(self.squads.iter().cloned())
            .with_characters(self.names.iter().cloned())
            .with_keyword(self.keyword.clone())
    }
}

/// Where and how a report is written.
#[derive(ClapArgs, Clone, Debug)]
pub struct OutputArgs {
    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Write the report to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Output format of a report.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    /// Markdown-flavoured text.
    Text,
    /// A JSON document with the same content plus diagnostics.
    Json,
}

/// Gets a hex value from the command-line option or the given environment variable.
///
/// Priority:
/// 1. the command-line argument.
/// 2. the environment variable.
/// 3. `None` if neither is present.
pub fn get_hex_from_opt_or_env(opt: Option<String>, var: &str) -> Option<String> {
    if let Some(value) = opt {
        return Some(value);
    }
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

/// Resolves and decodes the AES key material, once, at startup.
pub fn key_material(
    key: Option<String>,
    iv: Option<String>,
) -> Result<KeyMaterial, Box<dyn std::error::Error>> {
    let key = get_hex_from_opt_or_env(key, KEY_ENV)
        .ok_or_else(|| format!("no AES key given; pass --key or set {}", KEY_ENV))?;
    let iv = get_hex_from_opt_or_env(iv, IV_ENV)
        .ok_or_else(|| format!("no AES IV given; pass --iv or set {}", IV_ENV))?;
    Ok(KeyMaterial::from_hex(&key, &iv)?)
}

/// Picks the character table path: option, then environment, then the default.
pub fn characters_path(opt: Option<PathBuf>) -> PathBuf {
    opt.or_else(|| std::env::var_os(CHARACTERS_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CHARACTERS_PATH))
}

/// Parses command-line arguments using `clap`.
pub fn run() -> Args {
    Args::parse()
}
