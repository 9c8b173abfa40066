//! Road network: the owner of roads and junctions

use std::collections::BTreeMap;

use log::error;

use crate::{Error, JunctionId, RoadId};

use super::junction::Junction;
use super::road::{ContactPoint, LinkElement, Road, RoadLink};

#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    roads: BTreeMap<RoadId, Road>,
    junctions: BTreeMap<JunctionId, Junction>,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a road, validating its links
    ///
    /// # Errors
    ///
    /// Returns an error if the id is taken or the road links to itself
    pub fn add_road(&mut self, road: Road) -> Result<(), Error> {
        if self.roads.contains_key(&road.id) {
            return Err(Error::InvalidData(format!("Duplicate road id {}", road.id)));
        }
        for link in [road.predecessor, road.successor].iter().flatten() {
            check_self_link(road.id, link)?;
        }
        self.roads.insert(road.id, road);
        Ok(())
    }

    /// Removes a road and clears every link that pointed at it
    pub fn remove_road(&mut self, road_id: RoadId) -> Option<Road> {
        let removed = self.roads.remove(&road_id)?;
        for road in self.roads.values_mut() {
            if road
                .predecessor
                .is_some_and(|link| link.element == LinkElement::Road(road_id))
            {
                road.predecessor = None;
            }
            if road
                .successor
                .is_some_and(|link| link.element == LinkElement::Road(road_id))
            {
                road.successor = None;
            }
        }
        Some(removed)
    }

    pub fn road(&self, road_id: RoadId) -> Option<&Road> {
        self.roads.get(&road_id)
    }

    pub fn road_mut(&mut self, road_id: RoadId) -> Option<&mut Road> {
        self.roads.get_mut(&road_id)
    }

    pub fn roads(&self) -> impl Iterator<Item = &Road> {
        self.roads.values()
    }

    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    pub fn next_road_id(&self) -> RoadId {
        self.roads.keys().next_back().map_or(1, |id| id + 1)
    }

    /// # Errors
    ///
    /// Returns an error if the id is taken
    pub fn add_junction(&mut self, junction: Junction) -> Result<(), Error> {
        if self.junctions.contains_key(&junction.id) {
            return Err(Error::InvalidData(format!(
                "Duplicate junction id {}",
                junction.id
            )));
        }
        self.junctions.insert(junction.id, junction);
        Ok(())
    }

    pub fn junction(&self, junction_id: JunctionId) -> Option<&Junction> {
        self.junctions.get(&junction_id)
    }

    pub fn junction_mut(&mut self, junction_id: JunctionId) -> Option<&mut Junction> {
        self.junctions.get_mut(&junction_id)
    }

    pub fn junctions(&self) -> impl Iterator<Item = &Junction> {
        self.junctions.values()
    }

    pub fn junction_ids(&self) -> Vec<JunctionId> {
        self.junctions.keys().copied().collect()
    }

    /// # Errors
    ///
    /// Returns an error if the road does not exist or the link points back at it
    pub fn set_predecessor(&mut self, road_id: RoadId, link: Option<RoadLink>) -> Result<(), Error> {
        self.set_link(road_id, ContactPoint::Start, link)
    }

    /// # Errors
    ///
    /// Returns an error if the road does not exist or the link points back at it
    pub fn set_successor(&mut self, road_id: RoadId, link: Option<RoadLink>) -> Result<(), Error> {
        self.set_link(road_id, ContactPoint::End, link)
    }

    fn set_link(
        &mut self,
        road_id: RoadId,
        contact: ContactPoint,
        link: Option<RoadLink>,
    ) -> Result<(), Error> {
        if let Some(link) = &link {
            check_self_link(road_id, link)?;
        }
        let road = self
            .roads
            .get_mut(&road_id)
            .ok_or(Error::RoadNotFound(road_id))?;
        match contact {
            ContactPoint::Start => road.predecessor = link,
            ContactPoint::End => road.successor = link,
        }
        Ok(())
    }

    /// Links of the regular roads attached to a junction
    ///
    /// The contact point of each link is the end of the road touching the junction.
    pub fn incident_links(&self, junction_id: JunctionId) -> Vec<RoadLink> {
        let target = LinkElement::Junction(junction_id);
        let mut links = Vec::new();
        for road in self.roads.values().filter(|road| !road.is_connecting_road()) {
            if road.predecessor.is_some_and(|link| link.element == target) {
                links.push(RoadLink::road(road.id, ContactPoint::Start));
            }
            if road.successor.is_some_and(|link| link.element == target) {
                links.push(RoadLink::road(road.id, ContactPoint::End));
            }
        }
        links
    }

    /// Removes the connecting roads owned by a junction, returning their ids
    pub fn remove_connecting_roads(&mut self, junction_id: JunctionId) -> Vec<RoadId> {
        let stale: Vec<RoadId> = self
            .roads
            .values()
            .filter(|road| road.junction == Some(junction_id))
            .map(|road| road.id)
            .collect();
        for road_id in &stale {
            self.roads.remove(road_id);
        }
        stale
    }

    pub(crate) fn insert_road(&mut self, road: Road) {
        self.roads.insert(road.id, road);
    }
}

fn check_self_link(road_id: RoadId, link: &RoadLink) -> Result<(), Error> {
    if link.element == LinkElement::Road(road_id) {
        error!("Road {road_id} cannot be its own predecessor or successor");
        return Err(Error::SelfLink(road_id));
    }
    Ok(())
}
