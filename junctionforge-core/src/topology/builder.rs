use std::f64::consts::PI;

use log::{debug, info, warn};

use crate::config::JunctionConfig;
use crate::geometry::{ReferenceLineFactory, RoadPosition};
use crate::model::{
    ContactPoint, Lane, LaneSection, LaneWidth, Road, RoadContact, RoadCoord, RoadLink,
    RoadNetwork,
};
use crate::{ConnectionId, Error, JunctionId, LaneId};

use super::connection::lane_width_at;
use super::ordering::sort_links;
use super::{JunctionConnection, LaneLink, LanePair, TurnClassifier, lane_pairs};

/// Synthesizes the full connection set of a junction
pub struct ConnectionBuilder<'g, G: ?Sized> {
    geometry: &'g mut G,
    config: JunctionConfig,
}

impl<'g, G: ReferenceLineFactory + ?Sized> ConnectionBuilder<'g, G> {
    pub fn new(geometry: &'g mut G, config: JunctionConfig) -> Self {
        Self { geometry, config }
    }

    /// Replaces every connection of `junction_id`
    ///
    /// Each unordered pair of distinct roads yields two directed connections.
    /// Walking the roads in angular order, the first connection created for a
    /// road and the connection closing the cycle are corner connections.
    ///
    /// # Errors
    ///
    /// Returns an error if the junction or a linked road does not exist
    pub fn build(
        &mut self,
        network: &mut RoadNetwork,
        junction_id: JunctionId,
        extra_links: &[RoadLink],
    ) -> Result<(), Error> {
        if network.junction(junction_id).is_none() {
            return Err(Error::JunctionNotFound(junction_id));
        }

        let mut links = network.incident_links(junction_id);
        links.extend_from_slice(extra_links);
        check_links(network, junction_id, &links)?;
        let links = sort_links(network, &*self.geometry, links);

        // Nothing below fails on missing roads, so the old state is only
        // dropped once the new connections are certain to be built.

        for road_id in network.remove_connecting_roads(junction_id) {
            self.geometry.remove_road(road_id);
        }

        let mut connections = Vec::new();
        let mut next_id: ConnectionId = 0;
        let last = links.len().saturating_sub(1);

        for i in 0..links.len() {
            let mut right_connection_created = false;

            for j in (i + 1)..links.len() {
                let (link_a, link_b) = (links[i], links[j]);
                if link_a.element == link_b.element || link_a.is_junction() || link_b.is_junction()
                {
                    continue;
                }
                let (Some(a), Some(b)) = (link_a.road_contact(), link_b.road_contact()) else {
                    continue;
                };

                let forward = self.create_connection(
                    network,
                    junction_id,
                    next_id,
                    a,
                    b,
                    !right_connection_created,
                )?;
                right_connection_created = true;
                next_id += 1;

                let backward = self.create_connection(
                    network,
                    junction_id,
                    next_id,
                    b,
                    a,
                    i == 0 && j == last,
                )?;
                next_id += 1;

                connections.push(forward);
                connections.push(backward);
            }
        }

        let corners = connections
            .iter()
            .filter(|connection| connection.is_corner_connection())
            .count();
        info!(
            "Junction {junction_id}: built {} connections ({corners} corner) for {} road links",
            connections.len(),
            links.len()
        );

        let junction = network
            .junction_mut(junction_id)
            .ok_or(Error::JunctionNotFound(junction_id))?;
        junction.replace_connections(connections);
        Ok(())
    }

    fn create_connection(
        &mut self,
        network: &mut RoadNetwork,
        junction_id: JunctionId,
        id: ConnectionId,
        incoming: RoadContact,
        outgoing: RoadContact,
        corner: bool,
    ) -> Result<JunctionConnection, Error> {
        let connecting_id = network.next_road_id();

        let (turn_type, entry, exit) = {
            let incoming_road = network
                .road(incoming.road_id)
                .ok_or(Error::RoadNotFound(incoming.road_id))?;
            let outgoing_road = network
                .road(outgoing.road_id)
                .ok_or(Error::RoadNotFound(outgoing.road_id))?;

            let entry = RoadCoord::at_contact(incoming_road, incoming.contact_point);
            let exit = RoadCoord::at_contact(outgoing_road, outgoing.contact_point);
            let turn_type = TurnClassifier::new(&*self.geometry, self.config).classify(&entry, &exit);

            (
                turn_type,
                travel_position(&*self.geometry, incoming_road, incoming.contact_point, true),
                travel_position(&*self.geometry, outgoing_road, outgoing.contact_point, false),
            )
        };

        let fitted = match (entry, exit) {
            (Some(entry), Some(exit)) => {
                self.geometry
                    .fit_connecting_road(connecting_id, &entry, &exit)
            }
            _ => None,
        };
        let length = fitted.unwrap_or_else(|| {
            warn!(
                "No reference line for connecting road {connecting_id} from road {} to road {}",
                incoming.road_id, outgoing.road_id
            );
            0.0
        });

        let mut road = Road::new(connecting_id, length)
            .with_name(format!("connecting road {}-{}", incoming.road_id, outgoing.road_id))
            .with_lane_section(LaneSection::new(0.0));
        road.junction = Some(junction_id);
        road.predecessor = Some(RoadLink::road(incoming.road_id, incoming.contact_point));
        road.successor = Some(RoadLink::road(outgoing.road_id, outgoing.contact_point));
        network.insert_road(road);

        let mut connection = JunctionConnection::new(
            id,
            incoming.road_id,
            connecting_id,
            ContactPoint::Start,
            turn_type,
        )
        .with_corner(corner);

        let pairs = lane_pairs(&connection, network);
        if pairs.is_empty() {
            warn!(
                "Connection {id} ({turn_type}) from road {} to road {} has no lane links",
                incoming.road_id, outgoing.road_id
            );
        }

        let lanes = connecting_lanes(network, incoming, outgoing, &pairs, length);
        for lane in &lanes {
            if let Some(from) = lane.predecessor {
                connection.add_lane_link(LaneLink::new(from, lane.id));
            }
        }
        if let Some(section) = network
            .road_mut(connecting_id)
            .and_then(|road| road.lane_sections.first_mut())
        {
            for lane in lanes {
                section.add_lane(lane);
            }
        }

        debug!(
            "Connection {id}: road {} -> road {} via {connecting_id}, {turn_type}, corner {corner}, {} lane links",
            incoming.road_id,
            outgoing.road_id,
            connection.lane_links().len()
        );

        Ok(connection)
    }
}

/// Every road link must name an existing road outside the junction
fn check_links(
    network: &RoadNetwork,
    junction_id: JunctionId,
    links: &[RoadLink],
) -> Result<(), Error> {
    for contact in links.iter().filter_map(RoadLink::road_contact) {
        let road = network
            .road(contact.road_id)
            .ok_or(Error::RoadNotFound(contact.road_id))?;
        if road.junction == Some(junction_id) {
            return Err(Error::InvalidData(format!(
                "Road {} is a connecting road of junction {junction_id}",
                road.id
            )));
        }
    }
    Ok(())
}

/// Position at a road end with the heading of traffic crossing the junction
fn travel_position<G: ReferenceLineFactory + ?Sized>(
    geometry: &G,
    road: &Road,
    contact: ContactPoint,
    entering: bool,
) -> Option<RoadPosition> {
    let position = geometry.position_at(road, road.s_at(contact), 0.0)?;
    let against_reference_line = matches!(
        (contact, entering),
        (ContactPoint::Start, true) | (ContactPoint::End, false)
    );
    Some(if against_reference_line {
        position.rotated(PI)
    } else {
        position
    })
}

/// Right-side lanes of a connecting road, one per lane pair, innermost first
fn connecting_lanes(
    network: &RoadNetwork,
    incoming: RoadContact,
    outgoing: RoadContact,
    pairs: &[LanePair],
    length: f64,
) -> Vec<Lane> {
    let (Some(incoming_road), Some(outgoing_road)) =
        (network.road(incoming.road_id), network.road(outgoing.road_id))
    else {
        return Vec::new();
    };

    let mut lane_id: LaneId = 0;
    pairs
        .iter()
        .map(|pair| {
            lane_id -= 1;
            let start = lane_width_at(incoming_road, incoming.contact_point, pair.incoming.lane_id);
            let end = lane_width_at(outgoing_road, outgoing.contact_point, pair.outgoing.lane_id);
            let mut lane = Lane::new(lane_id, pair.incoming.lane_type, 0.0)
                .with_width(LaneWidth::linear(start, end, length));
            lane.predecessor = Some(pair.incoming.lane_id);
            lane.successor = Some(pair.outgoing.lane_id);
            lane
        })
        .collect()
}
