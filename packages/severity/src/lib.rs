#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Alert severity bands and ABC (Pareto) ranking.
//!
//! Areas are ranked by how much they contribute to the total number of
//! sightings. Sorting ascending and accumulating shares places the largest
//! contributors at the top of the cumulative curve, where the fixed
//! thresholds put them in the [`SeverityBand::Danger`] band.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Cumulative share at which [`SeverityBand::Warning`] begins.
pub const WARNING_THRESHOLD: f64 = 0.71;

/// Cumulative share at which [`SeverityBand::Danger`] begins.
pub const DANGER_THRESHOLD: f64 = 0.91;

/// Ordered alert level, least severe first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityBand {
    /// Cumulative share below 0.71.
    Caution,
    /// Cumulative share in `[0.71, 0.91)`.
    Warning,
    /// Cumulative share of 0.91 or more.
    Danger,
}

impl SeverityBand {
    /// Returns all variants, least severe first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Caution, Self::Warning, Self::Danger]
    }
}

/// Maps a cumulative share to its band.
///
/// Total over all `f64`: values outside `[0, 1]` are compared as-is, with
/// no clamping (negative values are [`SeverityBand::Caution`], values
/// above 1 are [`SeverityBand::Danger`]). `NaN` fails both threshold
/// comparisons and lands in [`SeverityBand::Danger`].
#[must_use]
pub fn classify(cumulative_ratio: f64) -> SeverityBand {
    if cumulative_ratio < WARNING_THRESHOLD {
        SeverityBand::Caution
    } else if cumulative_ratio < DANGER_THRESHOLD {
        SeverityBand::Warning
    } else {
        SeverityBand::Danger
    }
}

/// One item of an ABC ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedItem<K> {
    /// Caller's identifier for the item (area, mesh code, ...).
    pub key: K,
    /// The item's own count.
    pub count: u64,
    /// Share of the total accumulated up to and including this item.
    pub cumulative_ratio: f64,
    /// Band of `cumulative_ratio`.
    pub band: SeverityBand,
}

/// Ranks `(key, count)` items by cumulative share of the total.
///
/// Items are sorted ascending by count (ties by key), so the output ends
/// with the largest contributors and a cumulative ratio of 1. When every
/// count is zero all ratios are 0.
#[must_use]
pub fn rank_by_share<K: Ord>(items: impl IntoIterator<Item = (K, u64)>) -> Vec<RankedItem<K>> {
    let mut items: Vec<(K, u64)> = items.into_iter().collect();
    items.sort_by(|(ka, a), (kb, b)| a.cmp(b).then_with(|| ka.cmp(kb)));

    let total: u64 = items.iter().map(|(_, count)| count).sum();
    let mut running = 0u64;

    items
        .into_iter()
        .map(|(key, count)| {
            running += count;
            #[allow(clippy::cast_precision_loss)]
            let cumulative_ratio = if total == 0 {
                0.0
            } else {
                running as f64 / total as f64
            };
            RankedItem {
                key,
                count,
                cumulative_ratio,
                band: classify(cumulative_ratio),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn boundaries_are_inclusive_on_the_upper_band() {
        assert_eq!(classify(0.70), SeverityBand::Caution);
        assert_eq!(classify(0.71), SeverityBand::Warning);
        assert_eq!(classify(0.90), SeverityBand::Warning);
        assert_eq!(classify(0.91), SeverityBand::Danger);
        assert_eq!(classify(1.0), SeverityBand::Danger);
    }

    #[test]
    fn out_of_range_values_are_not_clamped() {
        assert_eq!(classify(-0.5), SeverityBand::Caution);
        assert_eq!(classify(0.0), SeverityBand::Caution);
        assert_eq!(classify(1.5), SeverityBand::Danger);
    }

    #[test]
    fn bands_are_ordered() {
        assert!(SeverityBand::Caution < SeverityBand::Warning);
        assert!(SeverityBand::Warning < SeverityBand::Danger);
    }

    #[test]
    fn band_names_round_trip() {
        for band in SeverityBand::all() {
            let name = band.to_string();
            assert_eq!(SeverityBand::from_str(&name).unwrap(), *band);
        }
        assert_eq!(SeverityBand::Danger.as_ref(), "DANGER");
    }

    #[test]
    fn largest_contributors_are_danger() {
        let ranked = rank_by_share([("a", 1), ("b", 1), ("c", 8), ("d", 90)]);
        let keys: Vec<&str> = ranked.iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["a", "b", "c", "d"]);

        let bands: Vec<SeverityBand> = ranked.iter().map(|r| r.band).collect();
        assert_eq!(
            bands,
            vec![
                SeverityBand::Caution,
                SeverityBand::Caution,
                SeverityBand::Caution,
                SeverityBand::Danger,
            ]
        );
        assert!((ranked[3].cumulative_ratio - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn middle_contributors_are_warning() {
        // Sorted counts 12, 13, 15, 20, 20, 20 give cumulative shares
        // 0.12, 0.25, 0.40, 0.60, 0.80, 1.00.
        let ranked = rank_by_share([(6, 20), (3, 15), (1, 12), (5, 20), (2, 13), (4, 20)]);
        let bands: Vec<(i32, SeverityBand)> = ranked.iter().map(|r| (r.key, r.band)).collect();
        assert_eq!(
            bands,
            vec![
                (1, SeverityBand::Caution),
                (2, SeverityBand::Caution),
                (3, SeverityBand::Caution),
                (4, SeverityBand::Caution),
                (5, SeverityBand::Warning),
                (6, SeverityBand::Danger),
            ]
        );
        assert!((ranked[4].cumulative_ratio - 0.80).abs() < 1e-12);
    }

    #[test]
    fn zero_total_is_all_caution() {
        let ranked = rank_by_share([("x", 0), ("y", 0)]);
        assert!(ranked.iter().all(|r| r.band == SeverityBand::Caution));
        assert!(ranked.iter().all(|r| r.cumulative_ratio == 0.0));
    }

    #[test]
    fn empty_input_ranks_nothing() {
        assert!(rank_by_share(Vec::<(String, u64)>::new()).is_empty());
    }
}
