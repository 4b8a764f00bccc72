// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use anyhow::{Context, Result};
use docsplit::{Profile, RelinkReport};

/// Split `source` into a directory tree under `output`, optionally
/// followed by the relink pass. Returns the relink reports, if any.
pub fn split_command(
    source: &Path,
    output: &Path,
    relink: bool,
    profile: &Profile,
) -> Result<Vec<RelinkReport>> {
    docsplit::materialize_document(source, output, profile).with_context(|| {
        format!(
            "Failed to split {} into {}",
            source.display(),
            output.display()
        )
    })?;

    if !relink {
        return Ok(Vec::new());
    }
    docsplit::relink_output(output, &profile.references)
        .with_context(|| format!("Failed to relink {}", output.display()))
}
