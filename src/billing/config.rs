//! Field configuration (`fields.json`).
//!
//! Describes what to ask for and how to name the output file:
//!
//! ```json
//! {
//!   "output_name_template": "invoice_{invoice_no}.docx",
//!   "fields": [
//!     {"key": "invoice_no", "label": "Invoice Number"},
//!     {"key": "invoice_date", "label": "Invoice Date", "default": "{today}", "date_format": "%d-%m-%Y"}
//!   ],
//!   "items": {
//!     "context_key": "items",
//!     "fields": [
//!       {"key": "description", "label": "Item Description"},
//!       {"key": "qty", "label": "Qty", "default": 1},
//!       {"key": "rate", "label": "Rate"}
//!     ]
//!   },
//!   "totals": {"tax_rate": 0.18, "number_format": "{:.2f}"}
//! }
//! ```
//!
//! Every section is optional.

use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Output name used when the configuration gives none.
pub const DEFAULT_OUTPUT_NAME_TEMPLATE: &str = "invoice_{invoice_no}.docx";

/// Date format used for `{today}` when a field gives none.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Number format used for totals when the configuration gives none.
pub const DEFAULT_NUMBER_FORMAT: &str = "{:.2f}";

/// Answer value that expands to the current date.
pub const TODAY: &str = "{today}";

/// One prompted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Context key the answer is stored under
    pub key: String,
    /// Prompt label; the key when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Answer used when the input is empty. Any JSON scalar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// strftime-style format for `{today}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
}

impl FieldDef {
    /// A field with only a key and a label.
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: Some(label.to_string()),
            default: None,
            date_format: None,
        }
    }

    /// Set the default answer.
    pub fn with_default<V: Into<serde_json::Value>>(mut self, default: V) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set the `{today}` date format.
    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = Some(format.to_string());
        self
    }

    /// Label shown in the prompt.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }

    /// Default answer as text, if there is one.
    ///
    /// Strings are used as is; numbers and booleans in their JSON form.
    pub fn default_text(&self) -> Option<String> {
        self.default.as_ref().map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Format for `{today}`.
    pub fn date_format(&self) -> &str {
        self.date_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT)
    }
}

fn default_items_key() -> String {
    "items".to_string()
}

/// Line item prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemsConfig {
    /// Context key of the item list
    #[serde(default = "default_items_key")]
    pub context_key: String,
    /// Per-item fields. No items are asked for when empty.
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl Default for ItemsConfig {
    fn default() -> Self {
        Self {
            context_key: default_items_key(),
            fields: Vec::new(),
        }
    }
}

fn default_number_format() -> String {
    DEFAULT_NUMBER_FORMAT.to_string()
}

/// How totals are computed and written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalsConfig {
    /// Tax as a fraction of the subtotal
    #[serde(default)]
    pub tax_rate: f64,
    /// Number format pattern, e.g. `{:.2f}`
    #[serde(default = "default_number_format")]
    pub number_format: String,
}

impl Default for TotalsConfig {
    fn default() -> Self {
        Self {
            tax_rate: 0.0,
            number_format: default_number_format(),
        }
    }
}

/// The whole field configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldsConfig {
    /// Output file name with `{key}` slots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_name_template: Option<String>,
    /// Scalar fields, asked in order
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    /// Line items
    #[serde(default)]
    pub items: ItemsConfig,
    /// Totals
    #[serde(default)]
    pub totals: TotalsConfig,
}

impl FieldsConfig {
    /// Read a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json(&text)?;
        log::debug!(
            "loaded {}: {} fields, {} item fields",
            path.display(),
            config.fields.len(),
            config.items.fields.len()
        );
        Ok(config)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// The invoice configuration written by [`write_sample_config`].
    pub fn sample() -> Self {
        Self {
            output_name_template: Some(DEFAULT_OUTPUT_NAME_TEMPLATE.to_string()),
            fields: vec![
                FieldDef::new("invoice_no", "Invoice Number"),
                FieldDef::new("invoice_date", "Invoice Date")
                    .with_default(TODAY)
                    .with_date_format("%d-%m-%Y"),
                FieldDef::new("bill_to_name", "Bill To - Name"),
                FieldDef::new("bill_to_addr", "Bill To - Address"),
                FieldDef::new("gstin", "GSTIN (optional)").with_default(""),
            ],
            items: ItemsConfig {
                context_key: default_items_key(),
                fields: vec![
                    FieldDef::new("description", "Item Description"),
                    FieldDef::new("qty", "Qty").with_default(1),
                    FieldDef::new("rate", "Rate"),
                ],
            },
            totals: TotalsConfig {
                tax_rate: 0.18,
                number_format: default_number_format(),
            },
        }
    }

    /// Output name template, falling back to the default.
    pub fn output_name_template(&self) -> &str {
        self.output_name_template
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_OUTPUT_NAME_TEMPLATE)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Write the sample configuration to `path` as pretty-printed JSON.
pub fn write_sample_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, FieldsConfig::sample().to_json_pretty()?)?;
    log::info!("wrote sample config to {}", path.display());
    Ok(())
}
