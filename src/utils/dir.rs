use std::{env, io, path::PathBuf};

use anyhow::{anyhow, Result};

const APPLICATION_DIR_NAME: &str = "carbon-tracker";

/// Returns the directory used for application files (currently only logs), creating it if
/// necessary.
pub fn create_application_default_path() -> Result<PathBuf> {
    let path = default_application_path()?;

    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}

fn default_application_path() -> Result<PathBuf> {
    cfg_if::cfg_if! {
        if #[cfg(windows)] {
            let base = env::var("APPDATA")
                .map(PathBuf::from)
                .map_err(|_| anyhow!("APPDATA should be present on Windows"))?;
            Ok(base.join(APPLICATION_DIR_NAME))
        } else {
            state_path(env::var("XDG_STATE_HOME").ok(), env::var("HOME").ok())
        }
    }
}

/// `$XDG_STATE_HOME/carbon-tracker`, falling back to `$HOME/.local/state/carbon-tracker`.
fn state_path(xdg_state_home: Option<String>, home: Option<String>) -> Result<PathBuf> {
    let base = match (xdg_state_home.filter(|v| !v.is_empty()), home) {
        (Some(state), _) => PathBuf::from(state),
        (None, Some(home)) => PathBuf::from(home).join(".local/state"),
        (None, None) => return Err(anyhow!("Couldn't find neither XDG_STATE_HOME nor HOME")),
    };
    Ok(base.join(APPLICATION_DIR_NAME))
}
