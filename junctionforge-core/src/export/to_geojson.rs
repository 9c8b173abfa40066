use geo::{Coord, LineString};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use crate::boundary::{BoundaryAssembler, BoundaryKind, JunctionBoundary};
use crate::config::JunctionConfig;
use crate::geometry::{RoadGeometry, has_geometry};
use crate::model::{Junction, RoadNetwork};
use crate::topology::JunctionConnection;
use crate::{Error, JunctionId};

/// Converts a junction to a `GeoJSON` `FeatureCollection`: the boundary
/// polygon of `kind` followed by one centre line per connection.
///
/// # Errors
///
/// Returns an error if the junction does not exist or a feature cannot be built
pub fn junction_to_geojson<G: RoadGeometry + ?Sized>(
    network: &RoadNetwork,
    geometry: &G,
    config: &JunctionConfig,
    junction_id: JunctionId,
    kind: BoundaryKind,
) -> Result<FeatureCollection, Error> {
    let junction = network
        .junction(junction_id)
        .ok_or(Error::JunctionNotFound(junction_id))?;

    let boundary = match (kind, junction.boundary()) {
        (BoundaryKind::Outer, Some(boundary)) => boundary.clone(),
        _ => BoundaryAssembler::new(geometry, *config, kind).assemble(network, junction_id)?,
    };

    let mut features = Vec::new();
    if let Some(feature) = boundary_feature(network, geometry, config, junction, &boundary, kind)? {
        features.push(feature);
    }
    for connection in junction.connections() {
        if let Some(feature) = connection_feature(network, geometry, config, junction, connection)? {
            features.push(feature);
        }
    }

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

pub fn junction_to_geojson_string<G: RoadGeometry + ?Sized>(
    network: &RoadNetwork,
    geometry: &G,
    config: &JunctionConfig,
    junction_id: JunctionId,
    kind: BoundaryKind,
) -> Result<String, Error> {
    serde_json::to_string(&junction_to_geojson(
        network,
        geometry,
        config,
        junction_id,
        kind,
    )?)
    .map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn boundary_feature<G: RoadGeometry + ?Sized>(
    network: &RoadNetwork,
    geometry: &G,
    config: &JunctionConfig,
    junction: &Junction,
    boundary: &JunctionBoundary,
    kind: BoundaryKind,
) -> Result<Option<Feature>, Error> {
    let Some(polygon) = boundary.to_polygon(network, geometry, config) else {
        log::warn!(
            "Junction {} boundary has too few points for a polygon",
            junction.id
        );
        return Ok(None);
    };

    let value = json!({
        "type": "Feature",
        "geometry": Geometry::new(GeoJsonValue::from(&polygon)),
        "properties": {
            "feature_type": "boundary",
            "junction_id": junction.id,
            "junction_name": junction.name,
            "boundary_kind": kind,
            "segment_count": boundary.segment_count(),
            "segment_kinds": boundary.segment_kinds(),
        }
    });

    serde_json::from_value::<Feature>(value)
        .map(Some)
        .map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn connection_feature<G: RoadGeometry + ?Sized>(
    network: &RoadNetwork,
    geometry: &G,
    config: &JunctionConfig,
    junction: &Junction,
    connection: &JunctionConnection,
) -> Result<Option<Feature>, Error> {
    let Some(road) = network
        .road(connection.connecting_road())
        .filter(|road| has_geometry(geometry, road))
    else {
        return Ok(None);
    };

    let step = config.sample_step();
    let steps = (road.length / step).ceil().max(1.0) as usize;
    let coords: Vec<Coord<f64>> = (0..=steps)
        .filter_map(|i| {
            let s = (i as f64 * step).min(road.length);
            geometry.position_at(road, s, 0.0)
        })
        .map(|position| position.point.0)
        .collect();

    let outgoing_road = connection
        .outgoing_road_contact(network)
        .map(|contact| contact.road_id);

    let value = json!({
        "type": "Feature",
        "geometry": Geometry::new(GeoJsonValue::from(&LineString::new(coords))),
        "properties": {
            "feature_type": "connection",
            "junction_id": junction.id,
            "connection_id": connection.id(),
            "incoming_road": connection.incoming_road(),
            "connecting_road": connection.connecting_road(),
            "outgoing_road": outgoing_road,
            "turn_type": connection.turn_type(),
            "corner": connection.is_corner_connection(),
            "lane_links": connection.lane_links().len(),
        }
    });

    serde_json::from_value::<Feature>(value)
        .map(Some)
        .map_err(|e| Error::GeoJsonError(e.to_string()))
}
