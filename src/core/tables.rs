//! Point tables keyed by ordinal distance.
//!
//! Every proximity component of the score is an explicit lookup so thresholds can be
//! audited and tested without going through the aggregate score.

/// Points awarded for an ordinal distance; anything past the table earns `beyond`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceTable {
    points: &'static [u32],
    beyond: u32,
}

impl DistanceTable {
    pub const fn new(points: &'static [u32], beyond: u32) -> Self {
        Self { points, beyond }
    }

    #[inline]
    pub fn points(&self, distance: usize) -> u32 {
        self.points.get(distance).copied().unwrap_or(self.beyond)
    }

    /// Highest value the table can award
    pub fn max(&self) -> u32 {
        self.points.iter().copied().fold(self.beyond, u32::max)
    }
}

/// Distance used when either level has no place in the ordering
pub const UNRECOGNIZED_LEVEL_DISTANCE: usize = 10;

/// Amateur mode: flat credit for sharing at least one style
pub const SHARED_STYLE_POINTS: u32 = 30;

/// Amateur mode: closest level pair among shared styles
pub const LEVEL_POINTS: DistanceTable = DistanceTable::new(&[20, 15, 8], 0);

/// Amateur mode: competitions per year
pub const FREQUENCY_POINTS: DistanceTable = DistanceTable::new(&[15, 10, 5], 0);
pub const FREQUENCY_NEUTRAL: u32 = 7;
pub const FREQUENCY_NOTABLE: u32 = 10;

/// Amateur mode: budget tier
pub const BUDGET_POINTS: DistanceTable = DistanceTable::new(&[10, 7, 3], 0);
pub const BUDGET_NEUTRAL: u32 = 5;
pub const BUDGET_NOTABLE: u32 = 7;

/// Amateur mode geography
pub const SAME_CITY_POINTS: u32 = 20;
pub const SAME_STATE_POINTS: u32 = 15;
pub const GEO_NEUTRAL: u32 = 5;

pub const PARTNERSHIP_OVERLAP_POINTS: u32 = 5;

/// Pro-Am mode: per shared style, capped
pub const PRO_AM_STYLE_POINTS_PER_STYLE: u32 = 15;
pub const PRO_AM_STYLE_POINTS_CAP: u32 = 40;

/// Pro-Am mode location and travel
pub const PRO_AM_LOCAL_POINTS: u32 = 30;
pub const PRO_AM_NATIONAL_TRAVEL_POINTS: u32 = 20;
pub const PRO_AM_REGIONAL_TRAVEL_POINTS: u32 = 10;
pub const PRO_AM_LOCATION_NEUTRAL: u32 = 15;

/// Pro-Am mode: any level pair within this distance is a fit
pub const PRO_AM_LEVEL_FIT_DISTANCE: usize = 2;
pub const PRO_AM_LEVEL_FIT_POINTS: u32 = 30;

pub const MAX_SCORE: u32 = 100;

/// Number of style names listed in a reason
pub const REASON_STYLE_LIMIT: usize = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_points() {
        assert_eq!(LEVEL_POINTS.points(0), 20);
        assert_eq!(LEVEL_POINTS.points(1), 15);
        assert_eq!(LEVEL_POINTS.points(2), 8);
        assert_eq!(LEVEL_POINTS.points(3), 0);
        assert_eq!(LEVEL_POINTS.points(UNRECOGNIZED_LEVEL_DISTANCE), 0);
    }

    #[test]
    fn test_frequency_points() {
        assert_eq!(FREQUENCY_POINTS.points(0), 15);
        assert_eq!(FREQUENCY_POINTS.points(1), 10);
        assert_eq!(FREQUENCY_POINTS.points(2), 5);
        assert_eq!(FREQUENCY_POINTS.points(3), 0);
    }

    #[test]
    fn test_budget_points() {
        assert_eq!(BUDGET_POINTS.points(0), 10);
        assert_eq!(BUDGET_POINTS.points(1), 7);
        assert_eq!(BUDGET_POINTS.points(2), 3);
        assert_eq!(BUDGET_POINTS.points(3), 0);
    }

    #[test]
    fn test_amateur_maximum_is_one_hundred() {
        let max = SHARED_STYLE_POINTS
            + LEVEL_POINTS.max()
            + SAME_CITY_POINTS
            + FREQUENCY_POINTS.max()
            + BUDGET_POINTS.max()
            + PARTNERSHIP_OVERLAP_POINTS;
        assert_eq!(max, MAX_SCORE);
    }

    #[test]
    fn test_pro_am_maximum_is_one_hundred() {
        let max = PRO_AM_STYLE_POINTS_CAP + PRO_AM_LOCAL_POINTS + PRO_AM_LEVEL_FIT_POINTS;
        assert_eq!(max, MAX_SCORE);
    }
}
