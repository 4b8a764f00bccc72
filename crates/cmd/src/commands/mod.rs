// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod profile;
pub mod relink;
pub mod split;

pub use profile::profile_command;
pub use relink::{format_reports, relink_command};
pub use split::split_command;
