//! Angular ordering of road ends around a junction
//!
//! Connection synthesis and boundary assembly both walk the roads of a
//! junction in this order. Corner connections are only meaningful if the two
//! agree, so there is exactly one ordering function.

use geo::{Centroid, MultiPoint, Point};

use crate::geometry::RoadGeometry;
use crate::model::{LinkElement, RoadContact, RoadLink, RoadNetwork};

/// Sorts items counter-clockwise by their angle around the centroid of all
/// positioned items
///
/// Items without a position keep their relative order after the positioned ones.
pub fn sort_by_angle<T>(items: Vec<(T, Option<Point<f64>>)>) -> Vec<T> {
    let points: MultiPoint<f64> = items.iter().filter_map(|(_, point)| *point).collect();
    let Some(center) = points.centroid() else {
        return items.into_iter().map(|(item, _)| item).collect();
    };

    let mut keyed: Vec<(T, Option<f64>)> = items
        .into_iter()
        .map(|(item, point)| {
            let angle = point.map(|p| (p.y() - center.y()).atan2(p.x() - center.x()));
            (item, angle)
        })
        .collect();

    keyed.sort_by(|(_, a), (_, b)| match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    keyed.into_iter().map(|(item, _)| item).collect()
}

/// Reference-line position of a road end
pub fn contact_position<G: RoadGeometry + ?Sized>(
    network: &RoadNetwork,
    geometry: &G,
    contact: RoadContact,
) -> Option<Point<f64>> {
    let road = network.road(contact.road_id)?;
    geometry
        .position_at(road, road.s_at(contact.contact_point), 0.0)
        .map(|position| position.point)
}

/// Sorts junction links by angle; junction elements have no position
pub fn sort_links<G: RoadGeometry + ?Sized>(
    network: &RoadNetwork,
    geometry: &G,
    links: Vec<RoadLink>,
) -> Vec<RoadLink> {
    let keyed = links
        .into_iter()
        .map(|link| {
            let point = match link.element {
                LinkElement::Road(_) => link
                    .road_contact()
                    .and_then(|contact| contact_position(network, geometry, contact)),
                LinkElement::Junction(_) => None,
            };
            (link, point)
        })
        .collect();
    sort_by_angle(keyed)
}

/// Sorts road ends by angle
pub fn sort_contacts<G: RoadGeometry + ?Sized>(
    network: &RoadNetwork,
    geometry: &G,
    contacts: Vec<RoadContact>,
) -> Vec<RoadContact> {
    let keyed = contacts
        .into_iter()
        .map(|contact| (contact, contact_position(network, geometry, contact)))
        .collect();
    sort_by_angle(keyed)
}
