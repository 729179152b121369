use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ConfigOutput<'a> {
    pub config: &'a Config,
}

impl CommandOutput for ConfigOutput<'_> {
    fn to_human(&self) -> String {
        serde_yaml::to_string(self.config)
            .unwrap_or_else(|e| format!("failed to render configuration: {e}"))
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.config).unwrap_or_default()
    }
}

/// Handle `ragline config`
pub fn execute(config: &Config, json: bool) -> Result<()> {
    output(&ConfigOutput { config }, json);
    Ok(())
}
