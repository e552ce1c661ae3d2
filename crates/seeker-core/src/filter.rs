//! Client-side narrowing of a fetched shop list.

use std::collections::BTreeSet;

use crate::region::Region;
use crate::types::{BrandId, Shop, ViewportBounds};

/// Shops whose brand is in `selected`, in input order.
///
/// An empty selection means "no restriction" and returns every shop.
/// Unbranded shops are dropped as soon as any brand is selected.
#[must_use]
pub fn apply(shops: &[Shop], selected: &BTreeSet<BrandId>) -> Vec<Shop> {
    if selected.is_empty() {
        return shops.to_vec();
    }
    shops
        .iter()
        .filter(|shop| shop.brand_id.is_some_and(|id| selected.contains(&id)))
        .cloned()
        .collect()
}

/// Shops located inside `bounds`, in input order.
#[must_use]
pub fn within_bounds(shops: &[Shop], bounds: &ViewportBounds) -> Vec<Shop> {
    shops
        .iter()
        .filter(|shop| bounds.contains(shop.location))
        .cloned()
        .collect()
}

/// The user's brand selection and active region.
///
/// Brand catalogs are region-scoped, so switching region clears the
/// selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    selected_brands: BTreeSet<BrandId>,
    /// Empty string means no region restriction.
    region: String,
}

impl FilterState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn selected_brands(&self) -> &BTreeSet<BrandId> {
        &self.selected_brands
    }

    #[must_use]
    pub fn is_brand_selected(&self, id: BrandId) -> bool {
        self.selected_brands.contains(&id)
    }

    #[must_use]
    pub fn has_brand_filter(&self) -> bool {
        !self.selected_brands.is_empty()
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The active region as a typed value; unknown codes read as `None`.
    #[must_use]
    pub fn active_region(&self) -> Option<Region> {
        Region::from_code(&self.region).ok().flatten()
    }

    /// Flips membership of `id`. Returns whether it is now selected.
    pub fn toggle_brand(&mut self, id: BrandId) -> bool {
        if self.selected_brands.remove(&id) {
            false
        } else {
            self.selected_brands.insert(id);
            true
        }
    }

    /// Returns `true` if anything was selected.
    pub fn clear_brands(&mut self) -> bool {
        let had_any = !self.selected_brands.is_empty();
        self.selected_brands.clear();
        had_any
    }

    /// Switches region, clearing the brand selection when the code changes.
    /// Returns `true` if the region changed.
    pub fn set_region(&mut self, code: &str) -> bool {
        if self.region == code {
            return false;
        }
        self.region = code.to_string();
        self.selected_brands.clear();
        true
    }

    /// Narrows `shops` by the current brand selection.
    #[must_use]
    pub fn apply(&self, shops: &[Shop]) -> Vec<Shop> {
        apply(shops, &self.selected_brands)
    }
}
