use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use geo::Point;
use hashbrown::HashSet;
use log::{info, warn};

use super::raw_types::{RawElementType, RawLink, RawNetwork, RawRoad};
use crate::geometry::LineGeometry;
use crate::model::{ContactPoint, Junction, Lane, LaneSection, Road, RoadLink, RoadNetwork};
use crate::{Error, RoadId};

/// Reads a JSON network description from disk
///
/// # Errors
///
/// Returns an error if the file cannot be read or the description is invalid
pub fn load_road_network(path: impl AsRef<Path>) -> Result<(RoadNetwork, LineGeometry), Error> {
    let path = path.as_ref();
    info!("Loading road network from {}", path.display());
    let raw: RawNetwork = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    create_road_network(&raw)
}

/// Parses a JSON network description
///
/// # Errors
///
/// Returns an error if the JSON is malformed or the description is invalid
pub fn parse_road_network(json: &str) -> Result<(RoadNetwork, LineGeometry), Error> {
    let raw: RawNetwork = serde_json::from_str(json)?;
    create_road_network(&raw)
}

/// Builds the network model and reference lines from a raw description
///
/// # Errors
///
/// Returns an error on duplicate ids, non-positive lengths, dangling or self
/// links, centre lanes declared explicitly, or unresolvable shared lines
pub fn create_road_network(raw: &RawNetwork) -> Result<(RoadNetwork, LineGeometry), Error> {
    validate_network(raw)?;

    let mut network = RoadNetwork::new();
    for junction in &raw.junctions {
        network.add_junction(Junction::new(junction.id).with_name(junction.name.clone()))?;
    }
    for raw_road in &raw.roads {
        network.add_road(convert_road(raw_road))?;
    }

    let geometry = build_geometry(raw)?;

    info!(
        "Road network created: {} roads, {} junctions",
        network.road_count(),
        raw.junctions.len()
    );
    Ok((network, geometry))
}

fn validate_network(raw: &RawNetwork) -> Result<(), Error> {
    let mut road_ids: HashSet<RoadId> = HashSet::new();
    for road in &raw.roads {
        if !road_ids.insert(road.id) {
            return Err(Error::InvalidData(format!("Duplicate road id {}", road.id)));
        }
        if road.length.is_nan() || road.length <= 0.0 {
            return Err(Error::InvalidData(format!(
                "Road {} has non-positive length {}",
                road.id, road.length
            )));
        }
        if let Some(lane) = road
            .lane_sections
            .iter()
            .flat_map(|section| &section.lanes)
            .find(|lane| lane.id == 0)
        {
            return Err(Error::InvalidData(format!(
                "Road {} declares lane {}, the centre lane is implicit",
                road.id, lane.id
            )));
        }
    }

    let junction_ids: HashSet<_> = raw.junctions.iter().map(|junction| junction.id).collect();
    if junction_ids.len() != raw.junctions.len() {
        return Err(Error::InvalidData("Duplicate junction id".to_string()));
    }

    for road in &raw.roads {
        if let Some(junction) = road.junction
            && !junction_ids.contains(&junction)
        {
            return Err(Error::InvalidData(format!(
                "Road {} belongs to unknown junction {junction}",
                road.id
            )));
        }
        for link in [road.predecessor, road.successor].iter().flatten() {
            let known = match link.element_type {
                RawElementType::Road => road_ids.contains(&link.element_id),
                RawElementType::Junction => junction_ids.contains(&link.element_id),
            };
            if !known {
                return Err(Error::InvalidData(format!(
                    "Road {} links to unknown {:?} {}",
                    road.id, link.element_type, link.element_id
                )));
            }
        }
    }
    Ok(())
}

fn convert_link(link: &RawLink) -> RoadLink {
    match link.element_type {
        RawElementType::Road => RoadLink::road(
            link.element_id,
            link.contact_point.unwrap_or(ContactPoint::Start),
        ),
        RawElementType::Junction => RoadLink::junction(link.element_id),
    }
}

fn convert_road(raw: &RawRoad) -> Road {
    let mut road = Road::new(raw.id, raw.length).with_name(raw.name.clone());
    road.junction = raw.junction;
    road.predecessor = raw.predecessor.as_ref().map(convert_link);
    road.successor = raw.successor.as_ref().map(convert_link);

    if raw.lane_sections.is_empty() {
        warn!("Road {} has no lane sections", raw.id);
    }
    for raw_section in &raw.lane_sections {
        let section = raw_section
            .lanes
            .iter()
            .fold(LaneSection::new(raw_section.s), |section, lane| {
                let mut converted = Lane::new(lane.id, lane.lane_type, lane.width);
                converted.direction = lane.direction;
                section.with_lane(converted)
            });
        road = road.with_lane_section(section);
    }
    road
}

/// Own lines first, then shared spans until no more can be resolved
fn build_geometry(raw: &RawNetwork) -> Result<LineGeometry, Error> {
    let mut geometry = LineGeometry::new();
    let mut shared = Vec::new();

    for road in &raw.roads {
        let Some(line) = road.reference_line else {
            warn!("Road {} has no reference line", road.id);
            continue;
        };
        match line.shared_with {
            Some(other) => shared.push((road.id, other, line.s_offset)),
            None => {
                geometry.add_line(road.id, Point::new(line.x, line.y), line.heading.to_radians());
            }
        }
    }

    while !shared.is_empty() {
        let before = shared.len();
        shared.retain(|&(road, other, s_offset)| {
            geometry.share_line(road, other, s_offset).is_none()
        });
        if shared.len() == before {
            let roads: Vec<String> = shared.iter().map(|(road, _, _)| road.to_string()).collect();
            return Err(Error::InvalidData(format!(
                "Unresolvable shared reference lines for roads {}",
                roads.join(", ")
            )));
        }
    }
    Ok(geometry)
}
