// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use docsplit::Profile;

/// Options shared by every command
#[derive(Clone, Debug, Default)]
pub struct ProfileChoice {
    /// YAML profile file; the built-in exchange-rules profile when absent
    pub config: Option<PathBuf>,
}

impl ProfileChoice {
    pub fn new(config: Option<PathBuf>) -> Self {
        Self { config }
    }

    /// Load and validate the selected profile
    pub fn load(&self) -> Result<Profile> {
        match &self.config {
            Some(path) => load_profile(path),
            None => Ok(Profile::exchange_rules()),
        }
    }
}

/// Load a profile from a YAML file
pub fn load_profile(path: &Path) -> Result<Profile> {
    let profile = Profile::load(path)
        .with_context(|| format!("Failed to load profile {}", path.display()))?;
    let config = path.display().to_string();
    diagnostics::log_debug!("Loaded profile {config}");
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_choice_is_builtin_profile() {
        let profile = ProfileChoice::default().load().unwrap();
        assert_eq!(profile, Profile::exchange_rules());
    }

    #[test]
    fn test_missing_profile_file_names_the_path() {
        let err = ProfileChoice::new(Some(PathBuf::from("/nonexistent/profile.yaml")))
            .load()
            .unwrap_err();
        assert!(
            err.to_string()
                .contains("Failed to load profile /nonexistent/profile.yaml")
        );
    }
}
