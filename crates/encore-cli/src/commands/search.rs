use anyhow::{Context, Result};
use encore_core::geo::distance_km;
use encore_core::model::{ConcertRecord, Point};
use encore_core::request::SearchMode;
use encore_core::schema::Database;
use encore_core::ConcertSearch;
use encore_ingest::Config;

pub async fn run_search(
    db: &Database,
    config: &Config,
    latitude: Option<f64>,
    longitude: Option<f64>,
    radius: Option<f64>,
    band_ids: Option<&str>,
    json: bool,
) -> Result<()> {
    let mode = SearchMode::select(latitude, longitude, radius, band_ids)?;
    let search = ConcertSearch::new(config.envelope_km);

    let records = search
        .run(db, &mode)
        .await
        .context("Concert search failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let center = match &mode {
        SearchMode::Location { center, .. } => Some(*center),
        SearchMode::Bands(_) => None,
    };
    print_table(&records, center);

    Ok(())
}

fn print_table(records: &[ConcertRecord], center: Option<Point>) {
    if records.is_empty() {
        println!("No concerts found.");
        return;
    }

    println!();
    for record in records {
        let distance = center
            .map(|c| {
                let km = distance_km(c, Point::new(record.latitude, record.longitude));
                format!("  ({km:.2} km)")
            })
            .unwrap_or_default();
        println!(
            "  {}  {:<30}  {}{distance}",
            format_date(record.date),
            record.band,
            record.location
        );
    }
    println!("\n{} concert(s)", records.len());
}

/// Dates are stored as milliseconds since the epoch.
fn format_date(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| millis.to_string())
}
