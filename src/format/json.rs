//! JSON output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::selection::SelectionSnapshot;

/// JSON formatter - outputs the snapshot and its phase as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON snapshot"
    }

    fn format(&self, snapshot: &SelectionSnapshot, _config: &Config) -> Result<String> {
        let mut value = serde_json::to_value(snapshot)?;
        if let Some(object) = value.as_object_mut() {
            object.insert("phase".to_string(), serde_json::to_value(snapshot.phase())?);
        }
        Ok(serde_json::to_string_pretty(&value)?)
    }
}
