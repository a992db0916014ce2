#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region lookup by mesh code.
//!
//! Each administrative region is described by the first-order mesh cells it
//! touches. Neighbouring regions share the cells along their border, so a
//! code can belong to more than one region.

pub mod registry;

use std::collections::BTreeMap;

use thiserror::Error;
use wild_hazard_geography_models::Region;
use wild_hazard_mesh::MeshCode;

/// Errors that can occur during region lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    /// No region with the given id is registered.
    #[error("Unknown region: {id}")]
    UnknownRegion {
        /// The id that was looked up.
        id: String,
    },
}

/// Immutable set of regions, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    regions: Vec<Region>,
    by_id: BTreeMap<String, usize>,
}

impl RegionTable {
    /// Builds a table from caller-supplied regions.
    ///
    /// When two regions share an id the later one wins the id lookup; both
    /// still take part in [`Self::regions_for`].
    #[must_use]
    pub fn from_regions(regions: Vec<Region>) -> Self {
        let by_id = regions
            .iter()
            .enumerate()
            .map(|(i, region)| (region.id.clone(), i))
            .collect();
        Self { regions, by_id }
    }

    /// The regions compiled into this crate.
    ///
    /// # Panics
    ///
    /// Panics if an embedded region file fails to parse.
    #[must_use]
    pub fn embedded() -> Self {
        Self::from_regions(registry::all_regions())
    }

    /// All regions in registration order.
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Looks up a region by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Region> {
        self.by_id.get(id).map(|&i| &self.regions[i])
    }

    /// Every region whose first-order list contains the first-order prefix
    /// of `code`, in registration order.
    ///
    /// Codes shorter than four digits match nothing.
    #[must_use]
    pub fn regions_for(&self, code: MeshCode) -> Vec<&Region> {
        let Some(first) = code.first_order() else {
            return Vec::new();
        };
        self.regions
            .iter()
            .filter(|region| region.first_order_meshes.contains(&first.value()))
            .collect()
    }

    /// Whether the region `id` covers `code`.
    ///
    /// # Errors
    ///
    /// * [`RegionError::UnknownRegion`] if no region has the id `id`.
    pub fn contains(&self, id: &str, code: MeshCode) -> Result<bool, RegionError> {
        let region = self.get(id).ok_or_else(|| RegionError::UnknownRegion {
            id: id.to_string(),
        })?;
        Ok(code
            .first_order()
            .is_some_and(|first| region.first_order_meshes.contains(&first.value())))
    }
}
