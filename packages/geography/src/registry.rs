//! Compile-time registry of region definitions.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a region requires creating a TOML file in `regions/` and adding
//! a corresponding entry here.

use wild_hazard_geography_models::Region;

/// Number of registered regions. Enforced by a test.
#[cfg(test)]
const EXPECTED_REGION_COUNT: usize = 6;

/// Embedded TOML region definitions.
const REGION_TOMLS: &[(&str, &str)] = &[
    ("aomori", include_str!("../regions/aomori.toml")),
    ("iwate", include_str!("../regions/iwate.toml")),
    ("miyagi", include_str!("../regions/miyagi.toml")),
    ("akita", include_str!("../regions/akita.toml")),
    ("yamagata", include_str!("../regions/yamagata.toml")),
    ("fukushima", include_str!("../regions/fukushima.toml")),
];

/// Returns all registered regions.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests below.
#[must_use]
pub fn all_regions() -> Vec<Region> {
    let regions: Vec<Region> = REGION_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse region '{name}': {e}"))
        })
        .collect();
    log::debug!("Loaded {} embedded regions", regions.len());
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_regions() {
        let regions = all_regions();
        assert_eq!(
            regions.len(),
            EXPECTED_REGION_COUNT,
            "Expected {EXPECTED_REGION_COUNT} regions, found {}. \
             Update EXPECTED_REGION_COUNT after adding/removing regions.",
            regions.len()
        );
    }

    #[test]
    fn region_ids_and_codes_are_unique() {
        let regions = all_regions();
        let mut ids = BTreeSet::new();
        let mut codes = BTreeSet::new();
        for region in &regions {
            assert!(ids.insert(&region.id), "Duplicate region ID: {}", region.id);
            assert!(
                codes.insert(&region.code),
                "Duplicate region code: {}",
                region.code
            );
        }
    }

    #[test]
    fn file_names_match_ids() {
        for ((name, _), region) in REGION_TOMLS.iter().zip(all_regions()) {
            assert_eq!(*name, region.id);
        }
    }

    #[test]
    fn all_regions_have_required_fields() {
        for region in &all_regions() {
            assert!(!region.name.is_empty(), "Region {} has empty name", region.id);
            assert!(
                region.code.len() == 2 && region.code.bytes().all(|b| b.is_ascii_digit()),
                "Region {} has invalid code: {}",
                region.id,
                region.code
            );
            assert!(
                !region.first_order_meshes.is_empty(),
                "Region {} has no mesh cells",
                region.id
            );
            for mesh in &region.first_order_meshes {
                assert!(
                    (1000..10000).contains(mesh),
                    "Region {} has non first-order mesh {mesh}",
                    region.id
                );
            }
        }
    }
}
