//! Generate the OpenAPI specification file
//!
//! Writes `openapi.json` into the directory given as the first argument
//! (default `tourgate-web/docs`). The session cookie name follows the
//! environment, as in the served document.

use std::fs;
use std::path::PathBuf;
use tourgate_core::SecurityConfig;
use tourgate_web::openapi;

fn main() -> anyhow::Result<()> {
    let docs_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tourgate-web/docs"));
    fs::create_dir_all(&docs_dir)?;

    let json_path = docs_dir.join("openapi.json");
    let config = SecurityConfig::from_env()?;
    fs::write(&json_path, openapi::document(&config).to_pretty_json()?)?;
    println!("Generated: {}", json_path.display());

    Ok(())
}
