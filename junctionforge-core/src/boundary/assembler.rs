use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::JunctionConfig;
use crate::geometry::RoadGeometry;
use crate::model::{ContactPoint, Junction, Lane, LaneSection, RoadContact, RoadLink, RoadNetwork};
use crate::topology::ordering::sort_contacts;
use crate::{Error, JunctionId};

use super::{
    BoundarySegment, JointBoundarySegment, JunctionBoundary, LaneBoundarySegment,
};

/// Which lanes delimit the junction area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryKind {
    /// Full road width, sidewalks included
    #[default]
    Outer,
    /// Carriageway only
    Inner,
}

/// Walks the roads of a junction in angular order and emits its perimeter
///
/// Every road contributes its cross-section followed by the lane strip of the
/// corner connection leaving it, so joints and lane strips alternate.
pub struct BoundaryAssembler<'g, G: ?Sized> {
    geometry: &'g G,
    config: JunctionConfig,
    kind: BoundaryKind,
}

impl<'g, G: RoadGeometry + ?Sized> BoundaryAssembler<'g, G> {
    pub fn new(geometry: &'g G, config: JunctionConfig, kind: BoundaryKind) -> Self {
        Self {
            geometry,
            config,
            kind,
        }
    }

    /// Builds the boundary of `junction_id` from its current connections
    ///
    /// # Errors
    ///
    /// Returns an error if the junction does not exist
    pub fn assemble(
        &self,
        network: &RoadNetwork,
        junction_id: JunctionId,
    ) -> Result<JunctionBoundary, Error> {
        let junction = network
            .junction(junction_id)
            .ok_or(Error::JunctionNotFound(junction_id))?;

        let contacts = network
            .incident_links(junction_id)
            .iter()
            .filter_map(RoadLink::road_contact)
            .collect();
        let contacts = sort_contacts(network, self.geometry, contacts);

        let mut segments = Vec::new();
        for contact in contacts {
            let Some(section) = network
                .road(contact.road_id)
                .and_then(|road| road.lane_section_at(contact.contact_point))
            else {
                warn!(
                    "Road {} has no lane section at its {} contact, skipped in boundary of junction {junction_id}",
                    contact.road_id,
                    contact.contact_point.as_str()
                );
                continue;
            };

            match self.joint_segment(contact, section) {
                Some(joint) => segments.push(BoundarySegment::Joint(joint)),
                None => warn!(
                    "Road {} has no {:?} lanes for a joint segment",
                    contact.road_id, self.kind
                ),
            }

            let strips = self.corner_segments(network, junction, contact, section);
            if strips.is_empty() {
                warn!(
                    "No linked corner connection leaves road {} in junction {junction_id}",
                    contact.road_id
                );
            }
            segments.extend(strips.into_iter().map(BoundarySegment::Lane));
        }

        debug!(
            "Junction {junction_id}: assembled {:?} boundary with {} segments",
            self.kind,
            segments.len()
        );
        Ok(JunctionBoundary::new(segments))
    }

    /// Assembles the boundary and stores it on the junction
    ///
    /// # Errors
    ///
    /// Returns an error if the junction does not exist
    pub fn update_boundary(
        &self,
        network: &mut RoadNetwork,
        junction_id: JunctionId,
    ) -> Result<(), Error> {
        let boundary = self.assemble(network, junction_id)?;
        network
            .junction_mut(junction_id)
            .ok_or(Error::JunctionNotFound(junction_id))?
            .replace_boundary(boundary);
        Ok(())
    }

    fn joint_segment(
        &self,
        contact: RoadContact,
        section: &LaneSection,
    ) -> Option<JointBoundarySegment> {
        let (lowest, highest) = match self.kind {
            BoundaryKind::Outer => (section.right_most_lane()?, section.left_most_lane()?),
            BoundaryKind::Inner => (
                section.lowest_carriageway_lane()?,
                section.highest_carriageway_lane()?,
            ),
        };

        // Seen from inside the junction, END contacts run left to right and
        // START contacts right to left
        let (start, end) = match contact.contact_point {
            ContactPoint::End => (highest.id, lowest.id),
            ContactPoint::Start => (lowest.id, highest.id),
        };

        Some(JointBoundarySegment {
            road_id: contact.road_id,
            contact_point: contact.contact_point,
            joint_lane_start: start,
            joint_lane_end: end,
        })
    }

    /// Lane strips of the corner connections leaving `contact`
    ///
    /// The strip follows the outermost incoming lane that still carries a
    /// lane link, so removing links shrinks the boundary onto the carriageway.
    fn corner_segments(
        &self,
        network: &RoadNetwork,
        junction: &Junction,
        contact: RoadContact,
        section: &LaneSection,
    ) -> Vec<LaneBoundarySegment> {
        let incoming: Vec<&Lane> = match contact.contact_point {
            ContactPoint::End => section.right_lanes().collect(),
            ContactPoint::Start => section.left_lanes().collect(),
        };

        for lane in incoming.into_iter().rev() {
            if self.kind == BoundaryKind::Inner && !lane.is_carriageway() {
                continue;
            }

            let strips: Vec<LaneBoundarySegment> = junction
                .connections_from(contact.road_id)
                .filter(|connection| connection.is_corner_connection())
                .filter_map(|connection| {
                    let link = connection.lane_link_from(lane.id)?;
                    let road = network.road(connection.connecting_road())?;
                    Some(LaneBoundarySegment::new(road.id, link.to, 0.0, road.length))
                })
                .collect();

            if !strips.is_empty() {
                return strips;
            }
        }
        Vec::new()
    }
}
