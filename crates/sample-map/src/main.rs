mod loader;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use sample_map_render::{assemble, MapConfig};

const DEFAULT_SHEET_URL: &str =
    "https://docs.google.com/spreadsheets/d/1iiT7vFbSD5viC6HbDgk3-UziFO5OaffKlKr9PUTY5YM/edit?gid=0#gid=0";
const DEFAULT_OUTPUT: &str = "docs/index.html";

const USAGE: &str = "Usage: sample-map [--url <spreadsheet-url>] [--out <file.html>]";

fn get_arg(flag: &str) -> Option<String> {
    std::env::args().skip_while(|a| a != flag).nth(1)
}

/// Flag first, then environment variable, then the built-in default.
fn setting(flag: &str, env_var: &str, default: &str) -> String {
    get_arg(flag)
        .or_else(|| std::env::var(env_var).ok())
        .unwrap_or_else(|| default.to_string())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if std::env::args().any(|a| a == "--help" || a == "-h") {
        println!("{USAGE}");
        return Ok(());
    }

    let url = setting("--url", "SAMPLE_MAP_URL", DEFAULT_SHEET_URL);
    let out = PathBuf::from(setting("--out", "SAMPLE_MAP_OUT", DEFAULT_OUTPUT));

    let client = loader::http_client()?;
    let table = loader::fetch_table(&client, &url)?;

    let map = assemble(&table, &MapConfig::default()).context("Failed to build map")?;
    map.save(&out)
        .with_context(|| format!("Failed to save map to {}", out.display()))?;

    Ok(())
}
