//! Nested price catalog for a single search result: form → strength → packing →
//! offers, with a defined presence check at every level.
//!
//! The upstream endpoint emits this structure as schema-less JSON where any
//! level may be `null` or missing entirely. Absence at any depth means "no
//! offers for that key" and is never an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Offers
// ---------------------------------------------------------------------------

/// A single seller's price entry. The endpoint attaches pharmacy metadata we
/// don't interpret; everything beyond the selling price is kept in `extras`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub selling_price: f64,
    #[serde(flatten)]
    pub extras: BTreeMap<String, Value>,
}

/// The packing-level payload. The endpoint emits either a flat list of offer
/// slots or a map of named groups whose values are lists; both flatten to the
/// same offer sequence. Null slots mark sellers with no offer and are skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OfferSet {
    Flat(Vec<Option<Offer>>),
    Grouped(BTreeMap<String, Vec<Option<Offer>>>),
    /// Any other shape the endpoint produces; yields no offers.
    Other(Value),
}

impl OfferSet {
    /// All non-null offers in this set, group boundaries flattened away.
    pub fn offers(&self) -> Box<dyn Iterator<Item = &Offer> + '_> {
        match self {
            OfferSet::Flat(slots) => Box::new(slots.iter().filter_map(|s| s.as_ref())),
            OfferSet::Grouped(groups) => {
                Box::new(groups.values().flatten().filter_map(|s| s.as_ref()))
            }
            OfferSet::Other(_) => Box::new(std::iter::empty()),
        }
    }

    /// True if no non-null offer exists in this set.
    pub fn is_empty(&self) -> bool {
        self.offers().next().is_none()
    }
}

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// The (form, strength, packing) triple used to index into a [`Catalog`].
/// Selectors are arbitrary strings; unknown keys yield "no path", not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selector {
    pub form: String,
    pub strength: String,
    pub packing: String,
}

impl Selector {
    pub fn new(form: &str, strength: &str, packing: &str) -> Self {
        Self {
            form: form.to_string(),
            strength: strength.to_string(),
            packing: packing.to_string(),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {}", self.form, self.strength, self.packing)
    }
}

// ---------------------------------------------------------------------------
// Catalog levels
// ---------------------------------------------------------------------------

/// Strength → packing table, the second catalog level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrengthTable {
    strengths: BTreeMap<String, Option<PackingTable>>,
}

/// Packing → offer set, the innermost catalog level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackingTable {
    packings: BTreeMap<String, Option<OfferSet>>,
}

/// Nested pricing data for one search result, keyed form → strength → packing.
///
/// Read-only after deserialization: a catalog is constructed once per search
/// result and discarded when the next search replaces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    forms: BTreeMap<String, Option<StrengthTable>>,
}

impl Catalog {
    /// Navigate to the offer set for a selector. Returns `None` as soon as any
    /// level is absent or null; no partial paths.
    pub fn offer_set(&self, selector: &Selector) -> Option<&OfferSet> {
        self.forms
            .get(&selector.form)?
            .as_ref()?
            .strengths
            .get(&selector.strength)?
            .as_ref()?
            .packings
            .get(&selector.packing)?
            .as_ref()
    }

    /// Forms that have at least a populated strength table.
    pub fn forms(&self) -> Vec<&str> {
        self.forms
            .iter()
            .filter(|(_, t)| t.is_some())
            .map(|(f, _)| f.as_str())
            .collect()
    }

    /// Strengths available under a form.
    pub fn strengths(&self, form: &str) -> Vec<&str> {
        self.forms
            .get(form)
            .and_then(|t| t.as_ref())
            .map(|t| {
                t.strengths
                    .iter()
                    .filter(|(_, p)| p.is_some())
                    .map(|(s, _)| s.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Packings available under a form and strength.
    pub fn packings(&self, form: &str, strength: &str) -> Vec<&str> {
        self.forms
            .get(form)
            .and_then(|t| t.as_ref())
            .and_then(|t| t.strengths.get(strength))
            .and_then(|p| p.as_ref())
            .map(|p| {
                p.packings
                    .iter()
                    .filter(|(_, o)| o.is_some())
                    .map(|(k, _)| k.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every selector with a present offer set, in deterministic catalog order.
    /// The offer set may still contain only null slots.
    pub fn selectors(&self) -> Vec<Selector> {
        let mut out = Vec::new();
        for form in self.forms() {
            for strength in self.strengths(form) {
                for packing in self.packings(form, strength) {
                    out.push(Selector::new(form, strength, packing));
                }
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.selectors().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(json: &str) -> Catalog {
        serde_json::from_str(json).expect("catalog fixture should parse")
    }

    #[test]
    fn flat_offer_list_deserializes() {
        let c = catalog(r#"{"Tablet":{"500mg":{"10 strips":[{"selling_price":12},null]}}}"#);
        let sel = Selector::new("Tablet", "500mg", "10 strips");
        let set = c.offer_set(&sel).expect("path should be present");
        let prices: Vec<f64> = set.offers().map(|o| o.selling_price).collect();
        assert_eq!(prices, vec![12.0]);
    }

    #[test]
    fn grouped_offer_map_deserializes() {
        let c = catalog(
            r#"{"Tablet":{"500mg":{"10 strips":{"a":[{"selling_price":20}],"b":[{"selling_price":5},null]}}}}"#,
        );
        let sel = Selector::new("Tablet", "500mg", "10 strips");
        let set = c.offer_set(&sel).expect("path should be present");
        let mut prices: Vec<f64> = set.offers().map(|o| o.selling_price).collect();
        prices.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(prices, vec![5.0, 20.0]);
    }

    #[test]
    fn null_at_any_level_is_no_path() {
        let sel = Selector::new("Tablet", "500mg", "10 strips");

        let c = catalog(r#"{"Tablet":null}"#);
        assert!(c.offer_set(&sel).is_none());

        let c = catalog(r#"{"Tablet":{"500mg":null}}"#);
        assert!(c.offer_set(&sel).is_none());

        let c = catalog(r#"{"Tablet":{"500mg":{"10 strips":null}}}"#);
        assert!(c.offer_set(&sel).is_none());
    }

    #[test]
    fn missing_keys_are_no_path() {
        let c = catalog(r#"{}"#);
        assert!(c.offer_set(&Selector::new("Tablet", "500mg", "10 strips")).is_none());

        let c = catalog(r#"{"Syrup":{"100ml":{"1 bottle":[{"selling_price":30}]}}}"#);
        assert!(c.offer_set(&Selector::new("Tablet", "500mg", "10 strips")).is_none());
    }

    #[test]
    fn unexpected_slot_shape_yields_no_offers() {
        let c = catalog(r#"{"Tablet":{"500mg":{"10 strips":"out of stock"}}}"#);
        let set = c
            .offer_set(&Selector::new("Tablet", "500mg", "10 strips"))
            .expect("slot is present even when malformed");
        assert!(set.is_empty());
    }

    #[test]
    fn offer_extras_are_preserved() {
        let c = catalog(
            r#"{"Tablet":{"500mg":{"10 strips":[{"selling_price":9,"pharmacy_id":2,"mrp":15.5}]}}}"#,
        );
        let sel = Selector::new("Tablet", "500mg", "10 strips");
        let offer = c.offer_set(&sel).unwrap().offers().next().unwrap();
        assert_eq!(offer.extras.get("pharmacy_id"), Some(&Value::from(2)));
    }

    #[test]
    fn variant_enumeration_skips_null_levels() {
        let c = catalog(
            r#"{"Tablet":{"500mg":{"10 strips":[{"selling_price":9}],"15 strips":null}},"Syrup":null}"#,
        );
        assert_eq!(c.forms(), vec!["Tablet"]);
        assert_eq!(c.strengths("Tablet"), vec!["500mg"]);
        assert_eq!(c.packings("Tablet", "500mg"), vec!["10 strips"]);
        assert_eq!(
            c.selectors(),
            vec![Selector::new("Tablet", "500mg", "10 strips")]
        );
    }

    #[test]
    fn selector_display_matches_ui_copy() {
        let sel = Selector::new("Tablet", "500mg", "10 strips");
        assert_eq!(sel.to_string(), "Tablet | 500mg | 10 strips");
    }
}
