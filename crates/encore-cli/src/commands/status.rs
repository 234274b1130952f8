use anyhow::Result;
use encore_core::model::DocumentKind;
use encore_core::schema::Database;
use encore_ingest::Config;

pub fn show_status(db: &Database, config: &Config) -> Result<()> {
    let counts = db.count_by_kind()?;

    println!("\n📊 Encore Status\n");
    println!("  Database: {}", config.database_path.display());
    for (kind, count) in &counts {
        let label = match kind {
            DocumentKind::Band => "Bands",
            DocumentKind::Venue => "Venues",
            DocumentKind::Concert => "Concerts",
        };
        println!("  {label}: {count}");
    }
    println!("  Search envelope: {} km", config.envelope_km);

    if counts.iter().all(|(_, count)| *count == 0) {
        println!("\n  Run `encore load <dir>` to load fixtures");
    }

    Ok(())
}
