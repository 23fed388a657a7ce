use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Session history CSV under the user's state directory.
    pub fn history_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("benkyo");
            Some(state_dir.join("session_data.csv"))
        } else {
            ProjectDirs::from("", "", "benkyo")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("session_data.csv"))
        }
    }
}
