use anyhow::{Context, Result};
use encore_ingest::{config, Config};

const VALID_KEYS: &str = "database_path, envelope_km";

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!(
        "File exists: {}\n",
        if exists { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    println!("  database_path: {}", config.database_path.display());
    println!("  envelope_km: {}", config.envelope_km);
    println!("  logging.level: {:?}", config.logging.level());
    println!("  logging.coloured: {}", config.logging.coloured());
    println!("  logging.output: {:?}", config.logging.output());

    println!("\nPriority: CLI args > ENV vars (ENCORE_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value.
pub fn get_config(config: &Config, key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        println!("{}", config_value(config, &key)?);
    } else {
        // No key provided, show entire config file contents
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'encore config init' to create it.");
        }
    }

    Ok(())
}

/// The effective value of one key, as `get` prints it.
fn config_value(config: &Config, key: &str) -> Result<String> {
    match key {
        "database_path" => Ok(config.database_path.display().to_string()),
        "envelope_km" => Ok(config.envelope_km.to_string()),
        _ => anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, VALID_KEYS),
    }
}

/// Set a config value, keeping the rest of the file (comments included)
/// as it is.
pub fn set_config(key: &str, value: &str) -> Result<()> {
    let config_path = config::config_file_path();

    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    let mut doc = contents
        .parse::<toml_edit::DocumentMut>()
        .context("Failed to parse config file")?;

    match key {
        "database_path" => {
            doc["database_path"] = toml_edit::value(value);
        }
        "envelope_km" => {
            let km: f64 = value
                .parse()
                .with_context(|| format!("envelope_km must be a number, got '{value}'"))?;
            if !km.is_finite() || km < 0.0 {
                anyhow::bail!("envelope_km must be a non-negative distance, got {km}");
            }
            doc["envelope_km"] = toml_edit::value(km);
        }
        _ => anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, VALID_KEYS),
    }

    std::fs::write(&config_path, doc.to_string()).context("Failed to write config file")?;

    println!("✓ Updated {} = {}", key, value);
    println!("  in {}", config_path.display());

    Ok(())
}

/// Show the config file path.
pub fn show_path() {
    println!("{}", config::config_file_path().display());
}

/// Show example configuration.
pub fn show_example() {
    print!("{}", config::example_config());
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure encore.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
