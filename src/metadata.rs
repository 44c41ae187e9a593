use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::git::RepoProbe;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Dirty,
    Clean,
}

impl BuildStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStatus::Dirty => "dirty",
            BuildStatus::Clean => "clean",
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One snapshot of the build. Field order is the JSON key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildMetadata {
    pub name: String,
    pub version: String,
    pub commit: String,
    pub branch: String,
    pub status: BuildStatus,
    pub timestamp: String,
}

impl BuildMetadata {
    pub async fn collect<P: RepoProbe>(probe: &P, config: &Config, now: DateTime<Utc>) -> Self {
        let commit = probe.commit().await;
        let branch = probe.branch().await;
        let status = if probe.is_dirty().await { BuildStatus::Dirty } else { BuildStatus::Clean };
        let version = probe.describe().await;

        let meta = BuildMetadata {
            name: config.name.clone(),
            version: version.unwrap_or_else(|| config.version_placeholder.clone()),
            commit: commit.unwrap_or_else(|| config.unknown_placeholder.clone()),
            branch: branch.unwrap_or_else(|| config.unknown_placeholder.clone()),
            status,
            timestamp: format_timestamp(now),
        };
        log::debug!("collected {:?}", meta);
        meta
    }
}

pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}
