//! Lowest-price resolution over a [`Catalog`]: navigate one variant slice,
//! flatten its offers, and take the numeric minimum.
//!
//! Absence is not an error anywhere in this module — missing keys, null
//! levels, and all-null offer sets all resolve to `None`.

use crate::catalog::{Catalog, Selector};

/// Resolve the minimum selling price among the non-null offers at a selector.
///
/// Returns `None` when any catalog level is absent along the path or when the
/// resolved slice has no non-null offers. Prices are trusted as-is: zero and
/// negative values participate in the minimum. Pure and deterministic.
pub fn lowest_price(catalog: &Catalog, selector: &Selector) -> Option<f64> {
    catalog
        .offer_set(selector)?
        .offers()
        .map(|offer| offer.selling_price)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}

/// Scan every populated variant slice and return the globally cheapest one.
///
/// Ties resolve to the first slice in catalog iteration order, which is
/// deterministic (BTreeMap-backed levels).
pub fn best_price(catalog: &Catalog) -> Option<(Selector, f64)> {
    let mut best: Option<(Selector, f64)> = None;
    for selector in catalog.selectors() {
        if let Some(price) = lowest_price(catalog, &selector) {
            let better = best.as_ref().map_or(true, |(_, current)| price < *current);
            if better {
                best = Some((selector, price));
            }
        }
    }
    best
}
