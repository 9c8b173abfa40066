use geo::{Area, Contains, Point};
use hashbrown::HashSet;
use junctionforge_core::boundary::{BoundaryAssembler, BoundaryKind, BoundarySegment, SegmentKind};
use junctionforge_core::geometry::LineGeometry;
use junctionforge_core::loading::RadialJunctionTemplate;
use junctionforge_core::model::{ContactPoint, Junction, Lane, LaneSection, LaneType, Road, RoadLink, RoadNetwork};
use junctionforge_core::topology::{ConnectionBuilder, JunctionConnection, TurnType, rebuild_junction};
use junctionforge_core::{Error, JunctionConfig, JunctionId};

fn build(template: RadialJunctionTemplate) -> (RoadNetwork, LineGeometry, JunctionId) {
    let (mut network, mut geometry, junction_id) = template.build().unwrap();
    rebuild_junction(
        &mut network,
        &mut geometry,
        junction_id,
        &JunctionConfig::default(),
    )
    .unwrap();
    (network, geometry, junction_id)
}

fn alternates(kinds: &[SegmentKind]) -> bool {
    kinds.iter().enumerate().all(|(i, kind)| {
        *kind
            == if i % 2 == 0 {
                SegmentKind::Joint
            } else {
                SegmentKind::Lane
            }
    })
}

#[test]
fn four_way_junction_connects_every_ordered_pair() {
    let (network, _, junction_id) = build(RadialJunctionTemplate::new(&[0.0, 90.0, 180.0, 270.0]));
    let junction = network.junction(junction_id).unwrap();

    assert_eq!(junction.connection_count(), 12);
    assert_eq!(junction.corner_connections().count(), 4);

    let mut incoming: Vec<_> = junction
        .corner_connections()
        .map(JunctionConnection::incoming_road)
        .collect();
    incoming.sort_unstable();
    assert_eq!(incoming, vec![1, 2, 3, 4]);

    let turns = |turn| {
        junction
            .connections()
            .filter(|connection| connection.turn_type() == turn)
            .count()
    };
    assert_eq!(turns(TurnType::Straight), 4);
    assert_eq!(turns(TurnType::Left), 4);
    assert_eq!(turns(TurnType::Right), 4);

    assert!(
        junction
            .corner_connections()
            .all(|connection| connection.turn_type() == TurnType::Right)
    );
}

#[test]
fn connecting_roads_link_incoming_to_outgoing() {
    let (network, _, junction_id) = build(RadialJunctionTemplate::new(&[0.0, 90.0, 180.0, 270.0]));
    let junction = network.junction(junction_id).unwrap();

    for connection in junction.connections() {
        let road = network.road(connection.connecting_road()).unwrap();
        assert_eq!(road.junction, Some(junction_id));
        assert_eq!(
            road.predecessor,
            Some(RoadLink::road(connection.incoming_road(), ContactPoint::End))
        );
        assert!(road.length > 0.0);

        let outgoing = connection.outgoing_road_contact(&network).unwrap();
        assert_ne!(outgoing.road_id, connection.incoming_road());

        let section = &road.lane_sections[0];
        for link in connection.lane_links() {
            let lane = section.lane(link.to).unwrap();
            assert_eq!(lane.predecessor, Some(link.from));
            assert!(lane.id < 0);
        }
    }
}

#[test]
fn no_outgoing_lane_is_shared() {
    let (network, _, junction_id) = build(
        RadialJunctionTemplate::new(&[0.0, 90.0, 180.0, 270.0]).with_layout(
            junctionforge_core::loading::LaneLayout {
                driving_per_side: 3,
                lane_width: 3.0,
                sidewalk_width: Some(2.0),
            },
        ),
    );
    let junction = network.junction(junction_id).unwrap();

    for connection in junction.connections() {
        let road = network.road(connection.connecting_road()).unwrap();
        let successors: Vec<_> = road.lane_sections[0]
            .side_lanes()
            .filter_map(|lane| lane.successor)
            .collect();
        let unique: HashSet<_> = successors.iter().collect();
        assert_eq!(unique.len(), successors.len());

        let from: HashSet<_> = connection.lane_links().iter().map(|link| link.from).collect();
        assert_eq!(from.len(), connection.lane_links().len());
    }

    let straight = junction
        .connections()
        .find(|connection| connection.turn_type() == TurnType::Straight)
        .unwrap();
    assert_eq!(straight.lane_links().len(), 3);

    let left = junction
        .connections()
        .find(|connection| connection.turn_type() == TurnType::Left)
        .unwrap();
    assert_eq!(left.lane_links().len(), 1);
}

#[test]
fn boundary_alternates_joints_and_lane_strips() {
    let cases: [(&[f64], usize); 3] = [
        (&[0.0, 90.0, 180.0, 270.0], 8),
        (&[0.0, 90.0, 180.0], 6),
        (&[0.0, 180.0], 4),
    ];

    for (angles, expected) in cases {
        let (network, _, junction_id) = build(RadialJunctionTemplate::new(angles));
        let boundary = network.junction(junction_id).unwrap().boundary().unwrap();

        assert_eq!(boundary.segment_count(), expected, "arms {angles:?}");
        assert!(alternates(&boundary.segment_kinds()), "arms {angles:?}");
    }
}

#[test]
fn two_road_junction_has_two_corner_connections() {
    let (network, _, junction_id) = build(RadialJunctionTemplate::new(&[0.0, 180.0]));
    let junction = network.junction(junction_id).unwrap();

    assert_eq!(junction.connection_count(), 2);
    assert_eq!(junction.corner_connections().count(), 2);
    assert!(
        junction
            .connections()
            .all(|connection| connection.turn_type() == TurnType::Straight)
    );
}

#[test]
fn outer_boundary_encloses_the_junction_centre() {
    let (network, geometry, junction_id) = build(RadialJunctionTemplate::new(&[0.0, 90.0, 180.0, 270.0]));
    let config = JunctionConfig::default();
    let boundary = network.junction(junction_id).unwrap().boundary().unwrap();

    let polygon = boundary.to_polygon(&network, &geometry, &config).unwrap();
    assert!(polygon.signed_area() > 0.0);
    assert!(polygon.contains(&Point::new(0.0, 0.0)));

    let inner = BoundaryAssembler::new(&geometry, config, BoundaryKind::Inner)
        .assemble(&network, junction_id)
        .unwrap()
        .to_polygon(&network, &geometry, &config)
        .unwrap();
    assert!(inner.unsigned_area() < polygon.unsigned_area());
}

#[test]
fn dropping_sidewalk_links_pulls_boundary_onto_driving_lanes() {
    let (mut network, geometry, junction_id) =
        build(RadialJunctionTemplate::new(&[0.0, 90.0, 180.0, 270.0]));
    let config = JunctionConfig::default();

    let boundary = network.junction(junction_id).unwrap().boundary().unwrap().clone();
    assert!(boundary.segments().iter().any(|segment| match segment {
        BoundarySegment::Lane(strip) => strip.lane(&network).is_some_and(Lane::is_sidewalk),
        BoundarySegment::Joint(_) => false,
    }));

    let trimmed: Vec<JunctionConnection> = {
        let junction = network.junction(junction_id).unwrap();
        junction
            .connections()
            .map(|connection| {
                let mut connection = connection.clone();
                let incoming = network
                    .road(connection.incoming_road())
                    .and_then(|road| road.lane_section_at(ContactPoint::End))
                    .unwrap();
                connection.retain_lane_links(|link| {
                    incoming.lane(link.from).is_some_and(Lane::is_driving_lane)
                });
                connection
            })
            .collect()
    };
    network
        .junction_mut(junction_id)
        .unwrap()
        .replace_connections(trimmed);

    BoundaryAssembler::new(&geometry, config, BoundaryKind::Outer)
        .update_boundary(&mut network, junction_id)
        .unwrap();

    let boundary = network.junction(junction_id).unwrap().boundary().unwrap();
    assert_eq!(boundary.segment_count(), 8);
    for segment in boundary.segments() {
        if let BoundarySegment::Lane(strip) = segment {
            let lane = strip.lane(&network).unwrap();
            assert!(lane.is_driving_lane());
            assert!(!lane.is_sidewalk());
        }
    }
}

#[test]
fn rebuilding_is_idempotent() {
    let (mut network, mut geometry, junction_id) =
        build(RadialJunctionTemplate::new(&[0.0, 90.0, 180.0, 270.0]));
    let config = JunctionConfig::default();

    let snapshot = |network: &RoadNetwork| {
        let junction = network.junction(junction_id).unwrap();
        (
            junction.connections().cloned().collect::<Vec<_>>(),
            junction.boundary().cloned(),
            network.road_count(),
        )
    };

    let first = snapshot(&network);
    rebuild_junction(&mut network, &mut geometry, junction_id, &config).unwrap();
    let second = snapshot(&network);

    assert_eq!(first, second);
    assert_eq!(second.2, 4 + 12);
}

#[test]
fn mixed_contact_points_build_the_same_topology() {
    let (network, _, junction_id) = build(
        RadialJunctionTemplate::new(&[0.0, 90.0, 180.0, 270.0])
            .with_contact(1, ContactPoint::Start)
            .with_contact(3, ContactPoint::Start),
    );
    let junction = network.junction(junction_id).unwrap();

    assert_eq!(junction.connection_count(), 12);
    assert_eq!(junction.corner_connections().count(), 4);
    assert!(
        junction
            .connections()
            .all(|connection| !connection.lane_links().is_empty())
    );

    let boundary = junction.boundary().unwrap();
    assert_eq!(boundary.segment_count(), 8);
    assert!(alternates(&boundary.segment_kinds()));

    for connection in junction.connections().filter(|c| c.incoming_road() == 2) {
        assert!(connection.lane_links().iter().all(|link| link.from > 0));
    }
}

#[test]
fn roads_on_one_reference_line_go_straight() {
    let mut network = RoadNetwork::new();
    network.add_junction(Junction::new(1)).unwrap();
    let section = LaneSection::new(0.0)
        .with_lane(Lane::new(1, LaneType::Driving, 3.5))
        .with_lane(Lane::new(-1, LaneType::Driving, 3.5));

    let mut west = Road::new(1, 20.0).with_lane_section(section.clone());
    west.successor = Some(RoadLink::junction(1));
    let mut east = Road::new(2, 20.0).with_lane_section(section);
    east.predecessor = Some(RoadLink::junction(1));
    network.add_road(west).unwrap();
    network.add_road(east).unwrap();

    let mut geometry = LineGeometry::new();
    geometry.add_line(1, Point::new(-30.0, 0.0), 0.0);
    geometry.share_line(2, 1, 30.0).unwrap();

    rebuild_junction(&mut network, &mut geometry, 1, &JunctionConfig::default()).unwrap();
    let junction = network.junction(1).unwrap();

    assert_eq!(junction.connection_count(), 2);
    for connection in junction.connections() {
        assert_eq!(connection.turn_type(), TurnType::Straight);
        assert_eq!(connection.lane_links().len(), 1);
        let road = network.road(connection.connecting_road()).unwrap();
        assert!((road.length - 10.0).abs() < 1e-9);
    }
}

#[test]
fn missing_geometry_still_builds_topology() {
    let (mut network, _, junction_id) =
        RadialJunctionTemplate::new(&[0.0, 90.0, 180.0, 270.0]).build().unwrap();
    let mut geometry = LineGeometry::new();
    let config = JunctionConfig::default();

    rebuild_junction(&mut network, &mut geometry, junction_id, &config).unwrap();
    let junction = network.junction(junction_id).unwrap();

    assert_eq!(junction.connection_count(), 12);
    assert!(
        junction
            .connections()
            .all(|connection| connection.turn_type() == TurnType::Straight)
    );
    assert!(
        junction
            .boundary()
            .unwrap()
            .to_polygon(&network, &geometry, &config)
            .is_none()
    );
}

#[test]
fn unknown_junction_is_reported() {
    let mut network = RoadNetwork::new();
    let mut geometry = LineGeometry::new();

    assert!(matches!(
        rebuild_junction(&mut network, &mut geometry, 3, &JunctionConfig::default()),
        Err(Error::JunctionNotFound(3))
    ));
}

#[test]
fn extra_link_adds_an_arm() {
    let (mut network, mut geometry, junction_id) =
        RadialJunctionTemplate::new(&[0.0, 90.0, 180.0, 270.0]).build().unwrap();
    network.set_successor(4, None).unwrap();
    assert_eq!(network.incident_links(junction_id).len(), 3);

    ConnectionBuilder::new(&mut geometry, JunctionConfig::default())
        .build(
            &mut network,
            junction_id,
            &[RoadLink::road(4, ContactPoint::End)],
        )
        .unwrap();

    let junction = network.junction(junction_id).unwrap();
    assert_eq!(junction.connection_count(), 4 * 3);
    assert_eq!(junction.corner_connections().count(), 4);
    assert_eq!(junction.connections_from(4).count(), 3);
}

#[test]
fn failed_rebuild_keeps_previous_connections() {
    let (mut network, mut geometry, junction_id) =
        build(RadialJunctionTemplate::new(&[0.0, 90.0, 180.0]));
    let before: Vec<_> = network
        .junction(junction_id)
        .unwrap()
        .connections()
        .cloned()
        .collect();
    let road_count = network.road_count();
    let connecting_road = before[0].connecting_road();

    for extra in [
        RoadLink::road(99, ContactPoint::End),
        RoadLink::road(connecting_road, ContactPoint::Start),
    ] {
        let result = ConnectionBuilder::new(&mut geometry, JunctionConfig::default()).build(
            &mut network,
            junction_id,
            &[extra],
        );
        assert!(matches!(
            result,
            Err(Error::RoadNotFound(99) | Error::InvalidData(_))
        ));
    }

    let junction = network.junction(junction_id).unwrap();
    assert_eq!(junction.connections().cloned().collect::<Vec<_>>(), before);
    assert_eq!(network.road_count(), road_count);
    for connection in junction.connections() {
        let road = network.road(connection.connecting_road()).unwrap();
        let incoming = road
            .predecessor
            .and_then(|link| link.road_contact())
            .map(|contact| contact.road_id);
        assert_eq!(incoming, Some(connection.incoming_road()));
    }
}
