use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Layout and timing constants shared by the selector, reflow and controller.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Vertical gap between stacked siblings.
    pub row_gap: f64,
    /// Horizontal gap between a parent and its child column.
    pub column_gap: f64,
    /// Exponent applied to the alignment term when scoring navigation candidates.
    pub offset_weight: f64,
    /// Numerator of the `e / extent` term in the alignment offset; keeps the base of
    /// the non-integer power away from zero.
    pub alignment_epsilon: f64,
    /// Vertical offset given to a new node so the y-sort slots it next to its anchor.
    pub nudge: f64,
    pub edit_delay_ms: u32,
    pub debounce_ms: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            row_gap: 20.0,
            column_gap: 200.0,
            offset_weight: 1.1,
            alignment_epsilon: 2.0,
            nudge: 1.0,
            edit_delay_ms: 50,
            debounce_ms: 100.0,
        }
    }
}

/// User-facing settings persisted by the host as a small JSON object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Start editing every node the controller zooms to.
    pub auto_focus: bool,
}

impl Settings {
    /// Merge stored data over the defaults. `None` (nothing saved yet) and `null` both
    /// yield the defaults; unknown keys are ignored.
    pub fn from_json_value(v: Option<Value>) -> Result<Settings, Error> {
        match v {
            None | Some(Value::Null) => Ok(Settings::default()),
            Some(v) => serde_json::from_value(v).map_err(Error::Settings),
        }
    }

    pub fn to_json_value(&self) -> Value {
        serde_json::json!({ "autoFocus": self.auto_focus })
    }
}
