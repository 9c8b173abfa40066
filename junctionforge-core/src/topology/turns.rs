//! Lane eligibility per turn type
//!
//! Every function takes the lanes of one road end ordered from the
//! reference line outward, so index 0 is nearest the junction interior.

use crate::model::Lane;

use super::TurnType;

pub(crate) fn select_lanes<'a>(turn: TurnType, lanes: &[&'a Lane], corner: bool) -> Vec<&'a Lane> {
    match turn {
        TurnType::Straight => straight_lanes(lanes),
        TurnType::Left => left_lanes(lanes),
        TurnType::Right => right_lanes(lanes, corner),
    }
}

/// Driving lanes from the innermost driving lane outward
fn straight_lanes<'a>(lanes: &[&'a Lane]) -> Vec<&'a Lane> {
    let Some(first) = lanes.iter().position(|lane| lane.is_driving_lane()) else {
        return Vec::new();
    };
    lanes[first..]
        .iter()
        .copied()
        .filter(|lane| lane.is_driving_lane())
        .collect()
}

/// Left turns always run from a single lane into a single lane
fn left_lanes<'a>(lanes: &[&'a Lane]) -> Vec<&'a Lane> {
    lanes
        .iter()
        .copied()
        .find(|lane| lane.is_driving_lane())
        .into_iter()
        .collect()
}

/// Lanes from the outermost driving lane to the road edge
fn right_lanes<'a>(lanes: &[&'a Lane], corner: bool) -> Vec<&'a Lane> {
    match lanes.iter().rposition(|lane| lane.is_driving_lane()) {
        Some(outermost) => lanes[outermost..]
            .iter()
            .copied()
            .filter(|lane| corner || lane.is_driving_lane())
            .collect(),
        None if corner => lanes.to_vec(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LaneType;

    fn lanes() -> Vec<Lane> {
        vec![
            Lane::new(-1, LaneType::Driving, 3.0),
            Lane::new(-2, LaneType::Driving, 3.0),
            Lane::new(-3, LaneType::Shoulder, 1.0),
            Lane::new(-4, LaneType::Sidewalk, 2.0),
        ]
    }

    fn ids(lanes: Vec<&Lane>) -> Vec<i32> {
        lanes.iter().map(|lane| lane.id).collect()
    }

    #[test]
    fn straight_keeps_every_driving_lane() {
        let owned = lanes();
        let refs: Vec<&Lane> = owned.iter().collect();

        assert_eq!(ids(select_lanes(TurnType::Straight, &refs, true)), vec![-1, -2]);
    }

    #[test]
    fn left_takes_innermost_driving_lane() {
        let owned = lanes();
        let refs: Vec<&Lane> = owned.iter().collect();

        assert_eq!(ids(select_lanes(TurnType::Left, &refs, false)), vec![-1]);
    }

    #[test]
    fn right_takes_outer_edge() {
        let owned = lanes();
        let refs: Vec<&Lane> = owned.iter().collect();

        assert_eq!(
            ids(select_lanes(TurnType::Right, &refs, true)),
            vec![-2, -3, -4]
        );
        assert_eq!(ids(select_lanes(TurnType::Right, &refs, false)), vec![-2]);
    }

    #[test]
    fn no_driving_lanes() {
        let owned = vec![
            Lane::new(1, LaneType::Sidewalk, 2.0),
            Lane::new(2, LaneType::Border, 0.5),
        ];
        let refs: Vec<&Lane> = owned.iter().collect();

        assert_eq!(ids(select_lanes(TurnType::Right, &refs, true)), vec![1, 2]);
        assert!(select_lanes(TurnType::Right, &refs, false).is_empty());
        assert!(select_lanes(TurnType::Left, &refs, true).is_empty());
        assert!(select_lanes(TurnType::Straight, &refs, true).is_empty());
    }
}
