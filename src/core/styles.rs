use std::collections::HashSet;

use crate::core::tables::UNRECOGNIZED_LEVEL_DISTANCE;
use crate::models::{DanceLevel, DanceStyleEntry, DanceStyleKind};

/// Styles present on both lists, in the order of `other`
pub fn shared_styles(own: &[DanceStyleEntry], other: &[DanceStyleEntry]) -> Vec<DanceStyleKind> {
    let own: HashSet<DanceStyleKind> = own.iter().map(|entry| entry.style).collect();
    other
        .iter()
        .map(|entry| entry.style)
        .filter(|style| own.contains(style))
        .collect()
}

/// Ordinal distance between two levels
///
/// A level outside the fixed ordering is treated as maximally distant.
#[inline]
pub fn level_distance(a: DanceLevel, b: DanceLevel) -> usize {
    match (a.ordinal(), b.ordinal()) {
        (Some(a), Some(b)) => a.abs_diff(b),
        _ => UNRECOGNIZED_LEVEL_DISTANCE,
    }
}

/// Smallest distance between any of the viewer's levels and the candidate's levels on
/// the given shared styles
pub fn closest_shared_level_distance(
    viewer: &[DanceStyleEntry],
    candidate: &[DanceStyleEntry],
    shared: &[DanceStyleKind],
) -> usize {
    let candidate_levels: Vec<DanceLevel> = candidate
        .iter()
        .filter(|entry| shared.contains(&entry.style))
        .map(|entry| entry.level)
        .collect();

    viewer
        .iter()
        .flat_map(|own| {
            candidate_levels
                .iter()
                .map(move |&level| level_distance(own.level, level))
        })
        .fold(UNRECOGNIZED_LEVEL_DISTANCE, usize::min)
}

/// True if any level on one list is within `max_distance` of any level on the other,
/// regardless of style
pub fn levels_within(a: &[DanceStyleEntry], b: &[DanceStyleEntry], max_distance: usize) -> bool {
    a.iter().any(|left| {
        b.iter()
            .any(|right| level_distance(left.level, right.level) <= max_distance)
    })
}

/// Comma-separated labels of the first few styles
pub fn style_list(styles: &[DanceStyleKind], limit: usize) -> String {
    styles
        .iter()
        .take(limit)
        .map(DanceStyleKind::label)
        .collect::<Vec<_>>()
        .join(", ")
}
