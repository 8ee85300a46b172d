//! Ordering configuration

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::orderable::Position;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingConfig {
	/// Position handed to the first record of an empty group.
	pub first_position: Position,

	/// Shift later members down when a record is removed or leaves its group. Off by default:
	/// the gap is left in place and neighbor lookups skip over it.
	pub close_gaps: bool,
}

impl Default for OrderingConfig {
	fn default() -> Self {
		Self {
			first_position: 1,
			close_gaps: false,
		}
	}
}

impl OrderingConfig {
	pub fn from_json(json: &str) -> Result<Self> {
		let config: Self = serde_json::from_str(json).context("invalid ordering config")?;
		config.validate()?;
		Ok(config)
	}

	/// Load configuration from a JSON file
	pub fn load_from(path: &Path) -> Result<Self> {
		info!("Loading ordering config from {:?}", path);
		let json = fs::read_to_string(path)
			.with_context(|| format!("failed to read {}", path.display()))?;
		Self::from_json(&json)
	}

	pub fn validate(&self) -> Result<()> {
		if self.first_position < 0 {
			bail!(
				"first_position must not be negative, got {}",
				self.first_position
			);
		}
		Ok(())
	}
}
