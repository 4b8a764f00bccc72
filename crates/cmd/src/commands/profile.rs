// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use docsplit::Profile;

/// The effective profile as YAML
pub fn profile_command(profile: &Profile) -> Result<String> {
    Ok(profile.to_yaml()?)
}
