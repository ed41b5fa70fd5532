use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::info;

use crate::{error::Result, types::CompositePlan};

pub const DEFAULT_LOG_DIR: &str = "logs";

/// Writes each completed plan to `<dir>/travel_plan_<timestamp>.json`.
#[derive(Debug, Clone)]
pub struct PlanLog {
    dir: PathBuf,
}

impl Default for PlanLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_DIR)
    }
}

impl PlanLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File a plan would be written to at `at`.
    pub fn path_for(&self, at: DateTime<Local>) -> PathBuf {
        self.dir
            .join(format!("travel_plan_{}.json", at.format("%Y%m%d_%H%M%S")))
    }

    /// Serialize `plan` with a 4-space indent, creating the directory if needed.
    pub async fn write(&self, plan: &CompositePlan) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(Local::now());
        tokio::fs::write(&path, to_pretty_json(plan)?).await?;

        info!(path = %path.display(), "saved travel plan");
        Ok(path)
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(buffer)
}
