use crate::config::Settings;
use crate::{Error, Result};

/// Create a new plugin-list.toml with the default settings.
pub fn run(global: bool) -> Result<()> {
    let path = if global {
        Settings::global_path().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine global config directory",
            ))
        })?
    } else {
        Settings::project_path()
    };

    if path.exists() {
        return Err(Error::SettingsExists(path));
    }

    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::FileWrite {
            path: path.clone(),
            source: e,
        })?;
    }

    let content = Settings::default_toml()?;
    std::fs::write(&path, content).map_err(|e| Error::FileWrite {
        path: path.clone(),
        source: e,
    })?;

    println!("Created {}", path.display());
    Ok(())
}
