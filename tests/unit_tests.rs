// Scoring properties exercised through the public API

use ballroom_match::core::{score, select_mode, Matcher};
use ballroom_match::models::{
    BudgetRange, CompetitionFrequency, DanceLevel, DanceStyleEntry, DanceStyleKind, Dancer,
    MatchMode, PartnershipType, TravelWillingness,
};
use uuid::Uuid;

fn create_dancer(styles: &[(DanceStyleKind, DanceLevel)]) -> Dancer {
    Dancer {
        id: Uuid::new_v4(),
        first_name: "Test".to_string(),
        last_name: "Dancer".to_string(),
        dance_styles: styles
            .iter()
            .map(|&(style, level)| DanceStyleEntry::new(style, level))
            .collect(),
        ..Default::default()
    }
}

fn located(mut dancer: Dancer, city: &str, state: &str) -> Dancer {
    dancer.city = Some(city.to_string());
    dancer.state = Some(state.to_string());
    dancer
}

fn pro_am_student(styles: &[(DanceStyleKind, DanceLevel)]) -> Dancer {
    let mut student = create_dancer(styles);
    student.partnership_types = vec![PartnershipType::ProAm];
    student
}

fn pro_am_teacher(styles: &[(DanceStyleKind, DanceLevel)]) -> Dancer {
    let mut teacher = create_dancer(styles);
    teacher.is_teacher = true;
    teacher.open_to_pro_am = true;
    teacher
}

fn columbus_dancer(styles: &[(DanceStyleKind, DanceLevel)]) -> Dancer {
    let mut dancer = located(create_dancer(styles), "Columbus", "OH");
    dancer.competition_frequency = Some(CompetitionFrequency::FourToSix);
    dancer.budget_range = Some(BudgetRange::Moderate);
    dancer.partnership_types = vec![PartnershipType::AmateurAmateur];
    dancer
}

#[test]
fn test_columbus_pair_scores_full_marks() {
    let viewer = columbus_dancer(&[(DanceStyleKind::Waltz, DanceLevel::Gold)]);
    let candidate = columbus_dancer(&[
        (DanceStyleKind::Waltz, DanceLevel::Gold),
        (DanceStyleKind::Foxtrot, DanceLevel::Gold),
    ]);

    let result = score(&viewer, &candidate);

    assert_eq!(result.score, 100);
    assert_eq!(result.mode, MatchMode::Amateur);
    assert_eq!(
        result.reasons,
        vec![
            "Shares 1 dance style: Waltz",
            "Same competition level",
            "Both in Columbus",
            "Similar competition schedule",
            "Compatible budget range",
            "Compatible partnership goals",
        ]
    );
}

#[test]
fn test_no_shared_styles_scores_zero_in_both_modes() {
    let viewer = create_dancer(&[(DanceStyleKind::Waltz, DanceLevel::Gold)]);
    let candidate = located(
        create_dancer(&[(DanceStyleKind::Rumba, DanceLevel::Gold)]),
        "Columbus",
        "OH",
    );

    let amateur = score(&viewer, &candidate);
    assert_eq!(amateur.score, 0);
    assert_eq!(amateur.reasons, vec!["No shared dance styles"]);

    let student = pro_am_student(&[(DanceStyleKind::Waltz, DanceLevel::Gold)]);
    let teacher = pro_am_teacher(&[(DanceStyleKind::ChaCha, DanceLevel::Championship)]);
    let pro_am = score(&student, &teacher);
    assert_eq!(pro_am.score, 0);
    assert_eq!(pro_am.mode, MatchMode::Proam);
    assert_eq!(pro_am.reasons, vec!["No shared dance styles"]);
}

#[test]
fn test_empty_style_lists_score_zero() {
    let empty = create_dancer(&[]);
    let other = create_dancer(&[(DanceStyleKind::Waltz, DanceLevel::Gold)]);

    assert_eq!(score(&empty, &other).score, 0);
    assert_eq!(score(&other, &empty).score, 0);
    assert_eq!(score(&empty, &empty).score, 0);
}

#[test]
fn test_pro_am_saturates_at_one_hundred() {
    let student = located(
        pro_am_student(&[
            (DanceStyleKind::Waltz, DanceLevel::Gold),
            (DanceStyleKind::Tango, DanceLevel::Gold),
            (DanceStyleKind::Foxtrot, DanceLevel::Gold),
        ]),
        "Columbus",
        "OH",
    );
    let teacher = located(
        pro_am_teacher(&[
            (DanceStyleKind::Waltz, DanceLevel::PreChamp),
            (DanceStyleKind::Tango, DanceLevel::PreChamp),
            (DanceStyleKind::Foxtrot, DanceLevel::PreChamp),
        ]),
        "Dublin",
        "OH",
    );

    let result = score(&student, &teacher);

    assert_eq!(result.mode, MatchMode::Proam);
    assert_eq!(result.score, 100);
    assert_eq!(
        result.reasons,
        vec![
            "Teacher specializes in: Waltz, Tango, Foxtrot",
            "Local teacher",
            "Level is a good fit",
        ]
    );
}

#[test]
fn test_pro_am_local_only_teacher_out_of_state_gets_no_location_credit() {
    let student = located(
        pro_am_student(&[(DanceStyleKind::Rumba, DanceLevel::Silver)]),
        "Columbus",
        "OH",
    );
    let mut teacher = located(
        pro_am_teacher(&[(DanceStyleKind::Rumba, DanceLevel::Gold)]),
        "Miami",
        "FL",
    );
    teacher.travel_willingness = Some(TravelWillingness::LocalOnly);

    let result = score(&student, &teacher);

    // 15 for the style, 0 for location, 30 for level fit
    assert_eq!(result.score, 45);
    assert!(!result.reasons.iter().any(|r| r.contains("travels") || r.contains("Local")));

    teacher.travel_willingness = Some(TravelWillingness::International);
    let result = score(&student, &teacher);
    assert_eq!(result.score, 65);
    assert!(result.reasons.contains(&"Teacher travels nationally".to_string()));
}

#[test]
fn test_missing_state_is_neutral() {
    let viewer = create_dancer(&[(DanceStyleKind::Waltz, DanceLevel::Gold)]);
    let candidate = located(
        create_dancer(&[(DanceStyleKind::Waltz, DanceLevel::Gold)]),
        "Columbus",
        "OH",
    );

    // 30 style + 20 level + 5 geography + 7 frequency + 5 budget
    let amateur = score(&viewer, &candidate);
    assert_eq!(amateur.score, 67);
    assert!(!amateur.reasons.iter().any(|r| r.starts_with("Both in")));

    let student = pro_am_student(&[(DanceStyleKind::Waltz, DanceLevel::Gold)]);
    let teacher = located(
        pro_am_teacher(&[(DanceStyleKind::Waltz, DanceLevel::Championship)]),
        "Columbus",
        "OH",
    );

    // 15 style + 15 neutral location, Gold vs Championship is 3 apart
    let pro_am = score(&student, &teacher);
    assert_eq!(pro_am.score, 30);
}

#[test]
fn test_empty_state_counts_as_missing() {
    let mut viewer = create_dancer(&[(DanceStyleKind::Waltz, DanceLevel::Gold)]);
    viewer.state = Some(String::new());
    let candidate = located(
        create_dancer(&[(DanceStyleKind::Waltz, DanceLevel::Gold)]),
        "Columbus",
        "OH",
    );

    assert_eq!(score(&viewer, &candidate).score, 67);
}

#[test]
fn test_mode_selection_is_directional() {
    let student = pro_am_student(&[(DanceStyleKind::Samba, DanceLevel::Bronze)]);
    let teacher = pro_am_teacher(&[(DanceStyleKind::Samba, DanceLevel::Silver)]);

    assert_eq!(select_mode(&student, &teacher), MatchMode::Proam);
    assert_eq!(select_mode(&teacher, &student), MatchMode::Amateur);

    let forward = score(&student, &teacher);
    let backward = score(&teacher, &student);
    assert_eq!(forward.mode, MatchMode::Proam);
    assert_eq!(backward.mode, MatchMode::Amateur);
    assert_ne!(forward.score, backward.score);
}

#[test]
fn test_teacher_closed_to_pro_am_scored_as_amateur() {
    let student = pro_am_student(&[(DanceStyleKind::Jive, DanceLevel::Gold)]);
    let mut teacher = pro_am_teacher(&[(DanceStyleKind::Jive, DanceLevel::Gold)]);
    teacher.open_to_pro_am = false;

    assert_eq!(score(&student, &teacher).mode, MatchMode::Amateur);
}

#[test]
fn test_level_proximity_looks_at_all_viewer_levels() {
    // Viewer's Bronze is on a style the candidate does not dance, but still counts
    let viewer = create_dancer(&[
        (DanceStyleKind::Waltz, DanceLevel::Gold),
        (DanceStyleKind::Rumba, DanceLevel::Bronze),
    ]);
    let candidate = create_dancer(&[(DanceStyleKind::Waltz, DanceLevel::Bronze)]);

    let forward = score(&viewer, &candidate);
    assert!(forward.reasons.contains(&"Same competition level".to_string()));

    // The candidate's levels only count on shared styles
    let backward = score(&candidate, &viewer);
    assert!(backward.reasons.contains(&"Close competition levels".to_string()));
    assert!(forward.score > backward.score);
}

#[test]
fn test_scores_stay_in_bounds() {
    let levels = DanceLevel::ORDER;
    let styles = DanceStyleKind::ALL;

    for (i, &level) in levels.iter().enumerate() {
        let mut viewer = columbus_dancer(&[(styles[i], level), (styles[i + 1], level)]);
        viewer.partnership_types.push(PartnershipType::ProAm);

        let candidates = [
            columbus_dancer(&[(styles[i], levels[levels.len() - 1 - i])]),
            pro_am_teacher(&styles.iter().map(|&s| (s, level)).collect::<Vec<_>>()),
            located(create_dancer(&[(styles[i + 1], DanceLevel::Unrecognized)]), "Austin", "TX"),
        ];

        for candidate in &candidates {
            let result = score(&viewer, candidate);
            assert!(result.score <= 100);
            assert!(!result.reasons.is_empty());
        }
    }
}

#[test]
fn test_scoring_is_deterministic() {
    let viewer = columbus_dancer(&[(DanceStyleKind::Tango, DanceLevel::Silver)]);
    let candidate = located(
        create_dancer(&[(DanceStyleKind::Tango, DanceLevel::Novice)]),
        "Cleveland",
        "OH",
    );

    let first = score(&viewer, &candidate);
    for _ in 0..10 {
        assert_eq!(score(&viewer, &candidate), first);
    }
}

#[test]
fn test_matcher_splits_and_orders_candidates() {
    let viewer = columbus_dancer(&[
        (DanceStyleKind::Waltz, DanceLevel::Gold),
        (DanceStyleKind::Tango, DanceLevel::Gold),
    ]);

    let strong = columbus_dancer(&[(DanceStyleKind::Waltz, DanceLevel::Gold)]);
    let weak = located(
        create_dancer(&[(DanceStyleKind::Tango, DanceLevel::Newcomer)]),
        "Austin",
        "TX",
    );
    let unrelated = create_dancer(&[(DanceStyleKind::Mambo, DanceLevel::Gold)]);
    let teacher = pro_am_teacher(&[(DanceStyleKind::Waltz, DanceLevel::Championship)]);
    let mut closed_teacher = pro_am_teacher(&[(DanceStyleKind::Waltz, DanceLevel::Championship)]);
    closed_teacher.open_to_pro_am = false;

    let candidates = vec![
        weak.clone(),
        viewer.clone(),
        unrelated,
        strong.clone(),
        teacher.clone(),
        closed_teacher,
    ];

    let lists = Matcher::default().rank(&viewer, candidates);

    assert_eq!(lists.total_candidates, 6);
    let partner_ids: Vec<Uuid> = lists.partners.iter().map(|m| m.dancer.id).collect();
    assert_eq!(partner_ids, vec![strong.id, weak.id]);
    assert!(lists.partners[0].score >= lists.partners[1].score);

    assert_eq!(lists.teachers.len(), 1);
    assert_eq!(lists.teachers[0].dancer.id, teacher.id);
    // The viewer does not seek Pro-Am, so teachers are scored as peers
    assert_eq!(lists.teachers[0].mode, MatchMode::Amateur);
}
