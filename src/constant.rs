// SPDX-License-Identifier: GPL-3.0-or-later
// src/constant.rs
//
// Application constants that should not be changed by the user.

/// Application directory name under the platform config dir.
pub const APP_DIR: &str = "tikcrop";

/// Settings file name inside the application config dir.
pub const SETTINGS_FILE: &str = "settings.json";

/// Settings key for the persisted theme preference.
pub const THEME_KEY: &str = "theme";

/// Environment variable overriding the default theme when nothing is persisted.
pub const THEME_ENV: &str = "TIKCROP_THEME";

/// Prefix of every exported file name.
pub const EXPORT_PREFIX: &str = "TikCrop_";

/// Extension of exported crops.
pub const EXPORT_EXT: &str = "png";

/// File name of the batch export archive.
pub const ARCHIVE_NAME: &str = "TikCrop_batch.zip";

/// Delay before a delivered download handle is released (milliseconds).
pub const DOWNLOAD_RELEASE_DELAY_MS: u64 = 2000;

/// Summed per-channel distance from the background color that counts as subject.
pub const TRIM_TOLERANCE: u32 = 48;
