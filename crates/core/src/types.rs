//! Wire model of the remote search response.
//!
//! The endpoint wraps results in a `data.saltSuggestions` envelope; each
//! suggestion carries the backend's "most common" variant plus the nested
//! price catalog (`salt_forms_json`). Field names follow the external
//! contract, not ours.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::catalog::{Catalog, Selector};
use crate::pricing;

/// Top-level response wrapper: `{ "data": { "saltSuggestions": [...] } }`.
#[derive(Debug, Deserialize)]
pub struct SearchEnvelope {
    pub data: SearchData,
}

#[derive(Debug, Deserialize)]
pub struct SearchData {
    #[serde(rename = "saltSuggestions", default)]
    pub salt_suggestions: Vec<SaltSuggestion>,
}

/// The backend's representative variant for a suggestion. Wire keys are
/// capitalized (`Form`, `Strength`, `Packing`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MostCommon {
    #[serde(rename = "Form")]
    pub form: String,
    #[serde(rename = "Strength")]
    pub strength: String,
    #[serde(rename = "Packing")]
    pub packing: String,
}

/// One search result: a salt with its available forms, most-common variant,
/// and price catalog. Every field except `id` has been observed missing or
/// null in live responses, so all are defaulted.
#[derive(Debug, Clone, Deserialize)]
pub struct SaltSuggestion {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub salt: Option<String>,
    #[serde(default)]
    pub available_forms: Vec<String>,
    #[serde(default)]
    pub most_common: Option<MostCommon>,
    #[serde(default, deserialize_with = "catalog_or_none")]
    pub salt_forms_json: Option<Catalog>,
}

/// A malformed catalog degrades to "no offers" rather than failing the whole
/// response decode.
fn catalog_or_none<'de, D>(deserializer: D) -> Result<Option<Catalog>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl SaltSuggestion {
    /// Salt name for display, or a stand-in when the backend omits it.
    pub fn display_name(&self) -> &str {
        self.salt.as_deref().unwrap_or("Unknown salt")
    }

    /// Selector for the backend's most-common variant, if one was flagged.
    pub fn most_common_selector(&self) -> Option<Selector> {
        self.most_common
            .as_ref()
            .map(|mc| Selector::new(&mc.form, &mc.strength, &mc.packing))
    }

    /// Lowest price at a selector, `None` when the catalog is absent or the
    /// path yields no offers.
    pub fn lowest_price_for(&self, selector: &Selector) -> Option<f64> {
        let catalog = self.salt_forms_json.as_ref()?;
        pricing::lowest_price(catalog, selector)
    }
}
