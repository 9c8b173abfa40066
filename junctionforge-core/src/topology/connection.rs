use log::error;

use crate::model::{
    ContactPoint, Lane, LaneCoord, Road, RoadContact, RoadNetwork, TravelDirection,
};
use crate::{ConnectionId, LaneId, RoadId};

use super::TurnType;
use super::turns;

/// One incoming lane to connecting lane pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LaneLink {
    pub from: LaneId,
    pub to: LaneId,
}

impl LaneLink {
    pub fn new(from: LaneId, to: LaneId) -> Self {
        Self { from, to }
    }
}

/// Directed bridge from an incoming road into a connecting road
#[derive(Debug, Clone, PartialEq)]
pub struct JunctionConnection {
    id: ConnectionId,
    incoming_road: RoadId,
    connecting_road: RoadId,
    /// Contact point on the connecting road where the incoming road attaches
    contact_point: ContactPoint,
    turn_type: TurnType,
    lane_links: Vec<LaneLink>,
    corner: bool,
}

impl JunctionConnection {
    pub fn new(
        id: ConnectionId,
        incoming_road: RoadId,
        connecting_road: RoadId,
        contact_point: ContactPoint,
        turn_type: TurnType,
    ) -> Self {
        if incoming_road == connecting_road {
            error!(
                "Connection {id} uses road {incoming_road} as both incoming and connecting road"
            );
        }
        Self {
            id,
            incoming_road,
            connecting_road,
            contact_point,
            turn_type,
            lane_links: Vec::new(),
            corner: false,
        }
    }

    pub fn with_corner(mut self, corner: bool) -> Self {
        self.corner = corner;
        self
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn incoming_road(&self) -> RoadId {
        self.incoming_road
    }

    pub fn connecting_road(&self) -> RoadId {
        self.connecting_road
    }

    pub fn contact_point(&self) -> ContactPoint {
        self.contact_point
    }

    pub fn turn_type(&self) -> TurnType {
        self.turn_type
    }

    /// Corner connections may carry non-driving lanes such as sidewalks
    pub fn is_corner_connection(&self) -> bool {
        self.corner
    }

    pub fn lane_links(&self) -> &[LaneLink] {
        &self.lane_links
    }

    /// Adds a link unless the same pairing is already present
    pub fn add_lane_link(&mut self, link: LaneLink) {
        if !self.lane_links.contains(&link) {
            self.lane_links.push(link);
        }
    }

    pub fn remove_lane_link(&mut self, link: &LaneLink) {
        self.lane_links.retain(|existing| existing != link);
    }

    pub fn retain_lane_links(&mut self, keep: impl FnMut(&LaneLink) -> bool) {
        self.lane_links.retain(keep);
    }

    pub fn lane_link_from(&self, from: LaneId) -> Option<&LaneLink> {
        self.lane_links.iter().find(|link| link.from == from)
    }

    /// End of the incoming road the connecting road attaches to
    pub fn incoming_road_contact(&self, network: &RoadNetwork) -> Option<RoadContact> {
        self.connecting_road_link(network, self.contact_point)
    }

    /// End of the outgoing road at the far side of the connecting road
    pub fn outgoing_road_contact(&self, network: &RoadNetwork) -> Option<RoadContact> {
        self.connecting_road_link(network, self.contact_point.opposite())
    }

    fn connecting_road_link(
        &self,
        network: &RoadNetwork,
        side: ContactPoint,
    ) -> Option<RoadContact> {
        network
            .road(self.connecting_road)?
            .link_at(side)?
            .road_contact()
    }

    /// Lanes of the incoming road travelling into the junction, innermost first
    pub fn incoming_lanes<'n>(&self, network: &'n RoadNetwork) -> Vec<&'n Lane> {
        self.incoming_road_contact(network)
            .and_then(|contact| contact_lanes(network, contact, true))
            .unwrap_or_default()
    }

    /// Lanes of the outgoing road travelling away from the junction, innermost first
    pub fn outgoing_lanes<'n>(&self, network: &'n RoadNetwork) -> Vec<&'n Lane> {
        self.outgoing_road_contact(network)
            .and_then(|contact| contact_lanes(network, contact, false))
            .unwrap_or_default()
    }

    /// Incoming lane coordinates eligible for this connection's turn
    pub fn entry_coords(&self, network: &RoadNetwork) -> Vec<LaneCoord> {
        let Some(contact) = self.incoming_road_contact(network) else {
            return Vec::new();
        };
        let lanes = self.incoming_lanes(network);
        let selected = turns::select_lanes(self.turn_type, &lanes, self.corner);
        lane_coords(network, contact, &selected)
    }

    /// Outgoing lane coordinates eligible for this connection's turn
    pub fn exit_coords(&self, network: &RoadNetwork) -> Vec<LaneCoord> {
        let Some(contact) = self.outgoing_road_contact(network) else {
            return Vec::new();
        };
        let lanes = self.outgoing_lanes(network);
        let selected = turns::select_lanes(self.turn_type, &lanes, self.corner);
        lane_coords(network, contact, &selected)
    }
}

/// Lanes at a road end moving into (`entering`) or out of the junction
///
/// At an END contact the right lanes run into the junction, at a START
/// contact the left lanes do. Lanes whose travel direction is overridden
/// against their side are left out. Lanes come back ordered from the
/// reference line outward.
fn contact_lanes(
    network: &RoadNetwork,
    contact: RoadContact,
    entering: bool,
) -> Option<Vec<&Lane>> {
    let road = network.road(contact.road_id)?;
    let section = road.lane_section_at(contact.contact_point)?;
    let right_side = matches!(
        (contact.contact_point, entering),
        (ContactPoint::End, true) | (ContactPoint::Start, false)
    );
    let (lanes, direction): (Vec<&Lane>, _) = if right_side {
        (section.right_lanes().collect(), TravelDirection::Forward)
    } else {
        (section.left_lanes().collect(), TravelDirection::Backward)
    };
    Some(
        lanes
            .into_iter()
            .filter(|lane| lane.direction() == direction)
            .collect(),
    )
}

fn lane_coords(network: &RoadNetwork, contact: RoadContact, lanes: &[&Lane]) -> Vec<LaneCoord> {
    let Some(road) = network.road(contact.road_id) else {
        return Vec::new();
    };
    let Some(section_index) = road.section_index_at(contact.contact_point) else {
        return Vec::new();
    };
    let s = road.s_at(contact.contact_point);
    lanes
        .iter()
        .filter_map(|lane| LaneCoord::on(road, section_index, lane.id, s))
        .collect()
}

/// Width of the lane at the given road end
pub(crate) fn lane_width_at(road: &Road, contact: ContactPoint, lane_id: LaneId) -> f64 {
    road.lane_section_at(contact)
        .and_then(|section| {
            let ds = road.s_at(contact) - section.s;
            section.lane(lane_id).map(|lane| lane.width_at(ds))
        })
        .unwrap_or(0.0)
}
