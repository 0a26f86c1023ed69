use crate::error::{Result, ResultExt};
use crate::ui;
use dialoguer::{Confirm, theme::ColorfulTheme};
use report_diff::config::{DEFAULT_CONFIG_PATH, ensure_config_file_exists};
use std::path::Path;

pub fn execute(config: Option<String>, force: bool) -> Result<()> {
    let config_path = config.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let path = Path::new(&config_path);

    ui::section_header("Model Report Configuration Setup");

    if path.exists() && !force {
        ui::warning_message(&format!("{} already exists", path.display()));
        let overwrite = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Replace it with the default configuration?")
            .default(false)
            .interact()?;

        if !overwrite {
            ui::info_message("Keeping the existing configuration");
            return Ok(());
        }
    }

    ui::status_message("Creating configuration file...");
    ensure_config_file_exists(path, true).with_context(|| "Failed to create configuration file")?;

    ui::success_message(&format!("Configuration written to {}", path.display()));
    ui::info_message(&format!(
        "Edit {} to configure your branch sources",
        path.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_diff::config::ConfigLoader;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_init_writes_valid_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("model-report.toml");

        execute(Some(config_path.to_string_lossy().to_string()), false).unwrap();

        let config = ConfigLoader::load_with_validation(&config_path).unwrap();
        assert_eq!(config.reference, "master");
        assert!(!config.sources.is_empty());
    }

    #[test]
    fn test_init_force_overwrites() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("model-report.toml");
        fs::write(&config_path, "reference = \"main\"\n").unwrap();

        execute(Some(config_path.to_string_lossy().to_string()), true).unwrap();

        assert!(fs::read_to_string(&config_path).unwrap().contains("[sources]"));
    }
}
