//! Incoming/outgoing lane pairing for a single connection
//!
//! A single greedy pass: every entry lane takes the first free exit lane of
//! the same type. There is no backtracking, so the result depends on the
//! order of the entry and exit lists.

use hashbrown::HashSet;

use crate::model::{ContactPoint, LaneCoord, RoadNetwork};
use crate::LaneId;

use super::{JunctionConnection, TurnType};

/// An entry lane matched with an exit lane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanePair {
    pub incoming: LaneCoord,
    pub outgoing: LaneCoord,
}

/// Pairs the connection's entry lanes with its exit lanes, in entry order
pub fn lane_pairs(connection: &JunctionConnection, network: &RoadNetwork) -> Vec<LanePair> {
    let entries = connection.entry_coords(network);
    let exits = connection.exit_coords(network);
    let turn = connection.turn_type();
    let relaxed = turn == TurnType::Right;

    let incoming_lanes = connection.incoming_lanes(network);
    let outer_threshold = incoming_lanes
        .iter()
        .rev()
        .find(|lane| lane.is_driving_lane())
        .map(|lane| lane.id);
    let inner_threshold = incoming_lanes
        .iter()
        .find(|lane| lane.is_driving_lane())
        .map(|lane| lane.id);
    let incoming_contact = connection
        .incoming_road_contact(network)
        .map(|contact| contact.contact_point);

    let mut paired_incoming: HashSet<LaneId> = HashSet::new();
    let mut paired_outgoing: HashSet<LaneId> = HashSet::new();
    let mut pairs = Vec::new();

    for entry in &entries {
        if paired_incoming.contains(&entry.lane_id) || (!relaxed && !entry.is_driving_lane()) {
            continue;
        }

        let within_bound = match turn {
            TurnType::Right => outer_threshold
                .is_none_or(|threshold| is_outside(entry.lane_id, threshold, incoming_contact)),
            TurnType::Left => inner_threshold
                .is_none_or(|threshold| is_inside(entry.lane_id, threshold, incoming_contact)),
            TurnType::Straight => true,
        };
        if !within_bound {
            continue;
        }

        let candidate = exits.iter().find(|exit| {
            !paired_outgoing.contains(&exit.lane_id) && exit.lane_type == entry.lane_type
        });

        if let Some(exit) = candidate {
            paired_incoming.insert(entry.lane_id);
            paired_outgoing.insert(exit.lane_id);
            pairs.push(LanePair {
                incoming: *entry,
                outgoing: *exit,
            });
        }
    }

    log::trace!(
        "Connection {} ({}) paired {} of {} entry lanes",
        connection.id(),
        turn,
        pairs.len(),
        entries.len()
    );

    pairs
}

/// Whether `lane` lies at or beyond `threshold` towards the road edge
///
/// Incoming lanes are right lanes (negative ids) at an END contact and left
/// lanes (positive ids) at a START contact.
fn is_outside(lane: LaneId, threshold: LaneId, contact: Option<ContactPoint>) -> bool {
    match contact {
        Some(ContactPoint::Start) => lane >= threshold,
        Some(ContactPoint::End) | None => lane <= threshold,
    }
}

/// Whether `lane` lies at or inside `threshold` towards the reference line
fn is_inside(lane: LaneId, threshold: LaneId, contact: Option<ContactPoint>) -> bool {
    lane == threshold || !is_outside(lane, threshold, contact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Lane, LaneSection, LaneType, Road, RoadLink};

    fn section(lanes: &[(i32, LaneType)]) -> LaneSection {
        lanes.iter().fold(LaneSection::new(0.0), |section, &(id, lane_type)| {
            section.with_lane(Lane::new(id, lane_type, 3.0))
        })
    }

    fn network(incoming: LaneSection, outgoing: LaneSection, outgoing_contact: ContactPoint) -> RoadNetwork {
        let mut network = RoadNetwork::new();
        network
            .add_road(Road::new(1, 20.0).with_lane_section(incoming))
            .unwrap();
        network
            .add_road(Road::new(2, 20.0).with_lane_section(outgoing))
            .unwrap();
        let mut connecting = Road::new(3, 10.0).with_lane_section(LaneSection::new(0.0));
        connecting.junction = Some(1);
        connecting.predecessor = Some(RoadLink::road(1, ContactPoint::End));
        connecting.successor = Some(RoadLink::road(2, outgoing_contact));
        network.add_road(connecting).unwrap();
        network
    }

    fn full_layout() -> LaneSection {
        section(&[
            (3, LaneType::Sidewalk),
            (2, LaneType::Driving),
            (1, LaneType::Driving),
            (-1, LaneType::Driving),
            (-2, LaneType::Driving),
            (-3, LaneType::Sidewalk),
        ])
    }

    fn ids(pairs: &[LanePair]) -> Vec<(i32, i32)> {
        pairs
            .iter()
            .map(|pair| (pair.incoming.lane_id, pair.outgoing.lane_id))
            .collect()
    }

    #[test]
    fn straight_pairs_driving_lanes_in_order() {
        let network = network(full_layout(), full_layout(), ContactPoint::Start);
        let connection = JunctionConnection::new(0, 1, 3, ContactPoint::Start, TurnType::Straight);

        assert_eq!(ids(&lane_pairs(&connection, &network)), vec![(-1, -1), (-2, -2)]);
    }

    #[test]
    fn corner_right_turn_pairs_sidewalks() {
        let network = network(full_layout(), full_layout(), ContactPoint::End);
        let connection =
            JunctionConnection::new(0, 1, 3, ContactPoint::Start, TurnType::Right).with_corner(true);

        assert_eq!(ids(&lane_pairs(&connection, &network)), vec![(-2, 2), (-3, 3)]);
    }

    #[test]
    fn left_turn_is_single_lane() {
        let network = network(full_layout(), full_layout(), ContactPoint::End);
        let connection = JunctionConnection::new(0, 1, 3, ContactPoint::Start, TurnType::Left);

        assert_eq!(ids(&lane_pairs(&connection, &network)), vec![(-1, 1)]);
    }

    #[test]
    fn type_mismatch_leaves_lane_unpaired() {
        let outgoing = section(&[(-1, LaneType::Biking), (-2, LaneType::Driving)]);
        let network = network(full_layout(), outgoing, ContactPoint::Start);
        let connection = JunctionConnection::new(0, 1, 3, ContactPoint::Start, TurnType::Straight);

        let pairs = lane_pairs(&connection, &network);
        assert_eq!(ids(&pairs), vec![(-1, -2)]);
        assert_eq!(pairs[0].outgoing.lane_type, LaneType::Driving);
    }

    #[test]
    fn greedy_first_fit_never_reuses_lanes() {
        let incoming = section(&[
            (-1, LaneType::Driving),
            (-2, LaneType::Driving),
            (-3, LaneType::Driving),
        ]);
        let outgoing = section(&[(-1, LaneType::Driving), (-2, LaneType::Driving)]);
        let network = network(incoming, outgoing, ContactPoint::Start);
        let connection = JunctionConnection::new(0, 1, 3, ContactPoint::Start, TurnType::Straight);

        let pairs = lane_pairs(&connection, &network);
        assert_eq!(ids(&pairs), vec![(-1, -1), (-2, -2)]);

        let mut outgoing_ids: Vec<_> = pairs.iter().map(|p| p.outgoing.lane_id).collect();
        outgoing_ids.dedup();
        assert_eq!(outgoing_ids.len(), pairs.len());
    }

    #[test]
    fn outside_test_respects_contact_sign() {
        assert!(is_outside(-3, -2, Some(ContactPoint::End)));
        assert!(!is_outside(-1, -2, Some(ContactPoint::End)));
        assert!(is_outside(3, 2, Some(ContactPoint::Start)));
        assert!(!is_outside(1, 2, Some(ContactPoint::Start)));
        assert!(is_inside(2, 2, Some(ContactPoint::Start)));
        assert!(is_inside(-1, -2, Some(ContactPoint::End)));
    }
}
