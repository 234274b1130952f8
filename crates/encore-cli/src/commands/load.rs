use anyhow::{Context, Result};
use encore_core::schema::Database;
use std::path::Path;

pub fn run_load(db: &Database, dir: &Path) -> Result<()> {
    log::info!("Loading fixtures from {}", dir.display());

    let summary = encore_ingest::load_fixtures(db, dir)
        .with_context(|| format!("Failed to load fixtures from {}", dir.display()))?;

    println!("\n✓ Loaded {} documents", summary.loaded());
    println!("  Bands:    {}", summary.bands);
    println!("  Venues:   {}", summary.venues);
    println!("  Concerts: {}", summary.concerts);

    if summary.skipped > 0 {
        println!("\n  ⚠ {} records skipped (see log for details)", summary.skipped);
    }

    Ok(())
}
