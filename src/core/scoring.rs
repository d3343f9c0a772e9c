use crate::core::styles::{closest_shared_level_distance, levels_within, shared_styles, style_list};
use crate::core::tables::*;
use crate::models::{Dancer, MatchMode, MatchResult, PartnershipType, TravelWillingness};

const NO_SHARED_STYLES: &str = "No shared dance styles";

/// Compatibility of `candidate` as seen by `viewer`.
///
/// Pro-Am scoring applies when the viewer is looking for a Pro-Am partnership and the
/// candidate is a teacher open to Pro-Am; otherwise amateur scoring applies. The check
/// only looks viewer -> candidate, so swapping the arguments can change the result.
///
/// Missing optional fields fall back to neutral or zero credit; this never fails.
pub fn score(viewer: &Dancer, candidate: &Dancer) -> MatchResult {
    match select_mode(viewer, candidate) {
        MatchMode::Proam => pro_am_score(viewer, candidate),
        MatchMode::Amateur => amateur_score(viewer, candidate),
    }
}

#[inline]
pub fn select_mode(viewer: &Dancer, candidate: &Dancer) -> MatchMode {
    if viewer.seeks(PartnershipType::ProAm) && candidate.is_pro_am_teacher() {
        MatchMode::Proam
    } else {
        MatchMode::Amateur
    }
}

/// Peer partnership score (0-100)
///
/// score = shared styles (30, required)
///       + closest level on shared styles (20/15/8/0)
///       + geography (20 same city, 15 same state, 5 unknown)
///       + competition frequency (15/10/5/0, 7 unknown)
///       + budget (10/7/3/0, 5 unknown)
///       + partnership goal overlap (5)
pub fn amateur_score(viewer: &Dancer, candidate: &Dancer) -> MatchResult {
    let shared = shared_styles(&viewer.dance_styles, &candidate.dance_styles);
    if shared.is_empty() {
        return no_shared_styles(MatchMode::Amateur);
    }

    let mut total = SHARED_STYLE_POINTS;
    let mut reasons = vec![format!(
        "Shares {} dance style{}: {}",
        shared.len(),
        if shared.len() > 1 { "s" } else { "" },
        style_list(&shared, REASON_STYLE_LIMIT)
    )];

    let level_gap = closest_shared_level_distance(&viewer.dance_styles, &candidate.dance_styles, &shared);
    total += LEVEL_POINTS.points(level_gap);
    match level_gap {
        0 => reasons.push("Same competition level".to_string()),
        1 => reasons.push("Compatible competition levels".to_string()),
        2 => reasons.push("Close competition levels".to_string()),
        _ => {}
    }

    let (geo_points, geo_reason) = geography(viewer, candidate);
    total += geo_points;
    if let Some(reason) = geo_reason {
        reasons.push(reason);
    }

    let frequency = match (viewer.competition_frequency, candidate.competition_frequency) {
        (Some(a), Some(b)) => FREQUENCY_POINTS.points(a.ordinal().abs_diff(b.ordinal())),
        _ => FREQUENCY_NEUTRAL,
    };
    total += frequency;
    if frequency >= FREQUENCY_NOTABLE {
        reasons.push("Similar competition schedule".to_string());
    }

    let budget = match (viewer.budget_range, candidate.budget_range) {
        (Some(a), Some(b)) => BUDGET_POINTS.points(a.ordinal().abs_diff(b.ordinal())),
        _ => BUDGET_NEUTRAL,
    };
    total += budget;
    if budget >= BUDGET_NOTABLE {
        reasons.push("Compatible budget range".to_string());
    }

    let overlaps = viewer
        .partnership_types
        .iter()
        .any(|goal| candidate.partnership_types.contains(goal));
    if overlaps {
        total += PARTNERSHIP_OVERLAP_POINTS;
        reasons.push("Compatible partnership goals".to_string());
    }

    MatchResult {
        score: clamp(total),
        reasons,
        mode: MatchMode::Amateur,
    }
}

/// Free-text location comparison; no reason is given for the neutral or zero branches
fn geography(viewer: &Dancer, candidate: &Dancer) -> (u32, Option<String>) {
    let (Some(own_state), Some(other_state)) = (viewer.state(), candidate.state()) else {
        return (GEO_NEUTRAL, None);
    };

    if let (Some(own_city), Some(other_city)) = (viewer.city(), candidate.city()) {
        if own_city == other_city {
            return (SAME_CITY_POINTS, Some(format!("Both in {}", own_city)));
        }
    }

    if own_state == other_state {
        return (SAME_STATE_POINTS, Some(format!("Both in {}", own_state)));
    }

    (0, None)
}

/// Student/teacher score (0-100)
///
/// score = min(40, 15 * shared styles) (required)
///       + location/travel (30 same state, 20 national+, 10 regional, 15 unknown)
///       + level fit across all styles (30)
pub fn pro_am_score(student: &Dancer, teacher: &Dancer) -> MatchResult {
    let shared = shared_styles(&student.dance_styles, &teacher.dance_styles);
    if shared.is_empty() {
        return no_shared_styles(MatchMode::Proam);
    }

    let style_points = (shared.len() as u32)
        .saturating_mul(PRO_AM_STYLE_POINTS_PER_STYLE)
        .min(PRO_AM_STYLE_POINTS_CAP);
    let mut total = style_points;
    let mut reasons = vec![format!(
        "Teacher specializes in: {}",
        style_list(&shared, REASON_STYLE_LIMIT)
    )];

    match (student.state(), teacher.state()) {
        (Some(own), Some(other)) if own == other => {
            total += PRO_AM_LOCAL_POINTS;
            reasons.push("Local teacher".to_string());
        }
        (Some(_), Some(_)) => match teacher.travel_willingness {
            Some(TravelWillingness::National) | Some(TravelWillingness::International) => {
                total += PRO_AM_NATIONAL_TRAVEL_POINTS;
                reasons.push("Teacher travels nationally".to_string());
            }
            Some(TravelWillingness::Regional) => {
                total += PRO_AM_REGIONAL_TRAVEL_POINTS;
                reasons.push("Teacher travels regionally".to_string());
            }
            Some(TravelWillingness::LocalOnly) | None => {}
        },
        _ => total += PRO_AM_LOCATION_NEUTRAL,
    }

    // Compared over every style, not only shared ones.
    if levels_within(&student.dance_styles, &teacher.dance_styles, PRO_AM_LEVEL_FIT_DISTANCE) {
        total += PRO_AM_LEVEL_FIT_POINTS;
        reasons.push("Level is a good fit".to_string());
    }

    MatchResult {
        score: clamp(total),
        reasons,
        mode: MatchMode::Proam,
    }
}

fn no_shared_styles(mode: MatchMode) -> MatchResult {
    MatchResult {
        score: 0,
        reasons: vec![NO_SHARED_STYLES.to_string()],
        mode,
    }
}

#[inline]
fn clamp(total: u32) -> u8 {
    total.min(MAX_SCORE) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetRange, CompetitionFrequency, DanceLevel, DanceStyleEntry, DanceStyleKind};

    fn create_test_dancer(styles: &[(DanceStyleKind, DanceLevel)]) -> Dancer {
        Dancer {
            first_name: "Test".to_string(),
            last_name: "Dancer".to_string(),
            dance_styles: styles
                .iter()
                .map(|&(style, level)| DanceStyleEntry::new(style, level))
                .collect(),
            ..Default::default()
        }
    }

    fn create_teacher(styles: &[(DanceStyleKind, DanceLevel)], state: &str) -> Dancer {
        Dancer {
            is_teacher: true,
            open_to_pro_am: true,
            state: Some(state.to_string()),
            ..create_test_dancer(styles)
        }
    }

    #[test]
    fn test_no_shared_styles_scores_zero() {
        let viewer = create_test_dancer(&[(DanceStyleKind::Waltz, DanceLevel::Gold)]);
        let candidate = create_test_dancer(&[(DanceStyleKind::Samba, DanceLevel::Gold)]);

        let result = score(&viewer, &candidate);

        assert_eq!(result.score, 0);
        assert_eq!(result.reasons, vec!["No shared dance styles"]);
        assert_eq!(result.mode, MatchMode::Amateur);
    }

    #[test]
    fn test_geography_branches() {
        let mut viewer = create_test_dancer(&[(DanceStyleKind::Waltz, DanceLevel::Gold)]);
        let mut candidate = viewer.clone();

        assert_eq!(geography(&viewer, &candidate), (GEO_NEUTRAL, None));

        viewer.state = Some("OH".to_string());
        candidate.state = Some("OH".to_string());
        assert_eq!(geography(&viewer, &candidate), (15, Some("Both in OH".to_string())));

        viewer.city = Some("Columbus".to_string());
        candidate.city = Some("Columbus".to_string());
        assert_eq!(geography(&viewer, &candidate), (20, Some("Both in Columbus".to_string())));

        candidate.city = Some("Dayton".to_string());
        candidate.state = Some("MI".to_string());
        assert_eq!(geography(&viewer, &candidate), (0, None));
    }

    #[test]
    fn test_missing_frequency_and_budget_are_neutral() {
        let viewer = create_test_dancer(&[(DanceStyleKind::Waltz, DanceLevel::Gold)]);
        let mut candidate = viewer.clone();
        candidate.competition_frequency = Some(CompetitionFrequency::SevenPlus);
        candidate.budget_range = Some(BudgetRange::Unlimited);

        let result = amateur_score(&viewer, &candidate);

        // 30 shared + 20 level + 5 geo + 7 frequency + 5 budget
        assert_eq!(result.score, 67);
        assert!(!result.reasons.iter().any(|r| r.contains("schedule")));
        assert!(!result.reasons.iter().any(|r| r.contains("budget")));
    }

    #[test]
    fn test_distant_frequency_and_budget_earn_nothing() {
        let mut viewer = create_test_dancer(&[(DanceStyleKind::Waltz, DanceLevel::Gold)]);
        viewer.competition_frequency = Some(CompetitionFrequency::Rarely);
        viewer.budget_range = Some(BudgetRange::Budget);
        let mut candidate = viewer.clone();
        candidate.competition_frequency = Some(CompetitionFrequency::SevenPlus);
        candidate.budget_range = Some(BudgetRange::Unlimited);

        // 30 shared + 20 level + 5 geo
        assert_eq!(amateur_score(&viewer, &candidate).score, 55);
    }

    #[test]
    fn test_level_reason_texts() {
        let viewer = create_test_dancer(&[(DanceStyleKind::Tango, DanceLevel::Bronze)]);

        let cases = [
            (DanceLevel::Silver, Some("Compatible competition levels"), 45),
            (DanceLevel::Gold, Some("Close competition levels"), 38),
            (DanceLevel::Novice, None, 30),
        ];
        for (level, reason, expected) in cases {
            let candidate = create_test_dancer(&[(DanceStyleKind::Tango, level)]);
            let result = amateur_score(&viewer, &candidate);

            // 30 shared + level + 5 geo + 7 frequency + 5 budget
            assert_eq!(result.score as u32, expected + 17);
            assert_eq!(result.reasons.get(1).map(String::as_str), reason);
        }
    }

    #[test]
    fn test_unrecognized_level_gets_no_credit() {
        let viewer = create_test_dancer(&[(DanceStyleKind::Tango, DanceLevel::Unrecognized)]);
        let candidate = create_test_dancer(&[(DanceStyleKind::Tango, DanceLevel::Unrecognized)]);

        let result = amateur_score(&viewer, &candidate);

        assert_eq!(result.score, 30 + 5 + 7 + 5);
        assert_eq!(result.reasons.len(), 1);
    }

    #[test]
    fn test_shared_style_reason_pluralizes() {
        let viewer = create_test_dancer(&[
            (DanceStyleKind::Waltz, DanceLevel::Gold),
            (DanceStyleKind::Tango, DanceLevel::Gold),
        ]);
        let single = create_test_dancer(&[(DanceStyleKind::Waltz, DanceLevel::Gold)]);

        assert_eq!(amateur_score(&viewer, &single).reasons[0], "Shares 1 dance style: Waltz");
        assert_eq!(
            amateur_score(&single, &viewer).reasons[0],
            "Shares 1 dance style: Waltz"
        );
        assert_eq!(
            amateur_score(&viewer, &viewer).reasons[0],
            "Shares 2 dance styles: Waltz, Tango"
        );
    }

    #[test]
    fn test_pro_am_single_style_without_level_fit() {
        let mut student = create_test_dancer(&[(DanceStyleKind::Rumba, DanceLevel::Newcomer)]);
        student.partnership_types = vec![PartnershipType::ProAm];
        let teacher = Dancer {
            state: None,
            ..create_teacher(&[(DanceStyleKind::Rumba, DanceLevel::Championship)], "NV")
        };

        // 15 for one style + 15 neutral location, no level fit (distance 6)
        let result = score(&student, &teacher);
        assert_eq!(result.mode, MatchMode::Proam);
        assert_eq!(result.score, 30);
        assert_eq!(result.reasons, vec!["Teacher specializes in: Rumba"]);
    }

    #[test]
    fn test_pro_am_travel_branches() {
        let mut student = create_test_dancer(&[(DanceStyleKind::Rumba, DanceLevel::Gold)]);
        student.state = Some("OH".to_string());
        student.partnership_types = vec![PartnershipType::ProAm];

        let cases = [
            (Some(TravelWillingness::International), 20, Some("Teacher travels nationally")),
            (Some(TravelWillingness::National), 20, Some("Teacher travels nationally")),
            (Some(TravelWillingness::Regional), 10, Some("Teacher travels regionally")),
            (Some(TravelWillingness::LocalOnly), 0, None),
            (None, 0, None),
        ];

        for (travel, points, reason) in cases {
            let mut teacher = create_teacher(&[(DanceStyleKind::Rumba, DanceLevel::Gold)], "FL");
            teacher.travel_willingness = travel;

            let result = pro_am_score(&student, &teacher);

            assert_eq!(result.score as u32, 15 + points + 30);
            assert_eq!(
                result.reasons.iter().any(|r| Some(r.as_str()) == reason),
                reason.is_some()
            );
        }
    }
}
