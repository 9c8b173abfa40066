//! OpenDRIVE XML fragments for junctions and their connecting roads

use std::fmt::Write;

use crate::model::{Junction, Lane, LinkElement, Road, RoadLink, RoadNetwork};
use crate::topology::JunctionConnection;
use crate::{Error, JunctionId};

const INDENT: &str = "    ";

/// `<junction>` element with one `<connection>` per junction connection
///
/// # Errors
///
/// Returns an error if the junction does not exist
pub fn junction_to_xml(network: &RoadNetwork, junction_id: JunctionId) -> Result<String, Error> {
    let junction = network
        .junction(junction_id)
        .ok_or(Error::JunctionNotFound(junction_id))?;

    let mut out = String::new();
    write_junction(&mut out, junction)?;
    Ok(out)
}

/// `<connection>` element with its lane links
///
/// # Errors
///
/// Returns an error if writing to the buffer fails
pub fn connection_to_xml(connection: &JunctionConnection) -> Result<String, Error> {
    let mut out = String::new();
    write_connection(&mut out, connection, 0)?;
    Ok(out)
}

/// `<road>` elements of the connecting roads owned by a junction
///
/// # Errors
///
/// Returns an error if the junction does not exist
pub fn connecting_roads_to_xml(
    network: &RoadNetwork,
    junction_id: JunctionId,
) -> Result<String, Error> {
    if network.junction(junction_id).is_none() {
        return Err(Error::JunctionNotFound(junction_id));
    }

    let mut out = String::new();
    for road in network
        .roads()
        .filter(|road| road.junction == Some(junction_id))
    {
        write_road(&mut out, road)?;
    }
    Ok(out)
}

fn write_junction(out: &mut String, junction: &Junction) -> std::fmt::Result {
    writeln!(
        out,
        r#"<junction id="{}" name="{}">"#,
        junction.id,
        escape(&junction.name)
    )?;
    for connection in junction.connections() {
        write_connection(out, connection, 1)?;
    }
    writeln!(out, "</junction>")
}

fn write_connection(
    out: &mut String,
    connection: &JunctionConnection,
    depth: usize,
) -> std::fmt::Result {
    let pad = INDENT.repeat(depth);
    writeln!(
        out,
        r#"{pad}<connection id="{}" incomingRoad="{}" connectingRoad="{}" contactPoint="{}">"#,
        connection.id(),
        connection.incoming_road(),
        connection.connecting_road(),
        connection.contact_point().as_str()
    )?;
    for link in connection.lane_links() {
        writeln!(
            out,
            r#"{pad}{INDENT}<laneLink from="{}" to="{}"/>"#,
            link.from, link.to
        )?;
    }
    writeln!(out, "{pad}</connection>")
}

fn write_road(out: &mut String, road: &Road) -> std::fmt::Result {
    let junction = road.junction.map_or_else(|| "-1".to_string(), |id| id.to_string());
    writeln!(
        out,
        r#"<road id="{}" name="{}" length="{}" junction="{junction}">"#,
        road.id,
        escape(&road.name),
        road.length
    )?;

    writeln!(out, "{INDENT}<link>")?;
    for (tag, link) in [("predecessor", road.predecessor), ("successor", road.successor)] {
        if let Some(link) = link {
            write_road_link(out, tag, &link)?;
        }
    }
    writeln!(out, "{INDENT}</link>")?;

    writeln!(out, "{INDENT}<lanes>")?;
    for section in &road.lane_sections {
        writeln!(out, r#"{INDENT}{INDENT}<laneSection s="{}">"#, section.s)?;
        let left: Vec<&Lane> = section.left_lanes().collect();
        let right: Vec<&Lane> = section.right_lanes().collect();
        if !left.is_empty() {
            write_side(out, "left", left.into_iter().rev())?;
        }
        writeln!(out, "{INDENT}{INDENT}{INDENT}<center>")?;
        writeln!(
            out,
            r#"{INDENT}{INDENT}{INDENT}{INDENT}<lane id="0" type="none"/>"#
        )?;
        writeln!(out, "{INDENT}{INDENT}{INDENT}</center>")?;
        if !right.is_empty() {
            write_side(out, "right", right.into_iter())?;
        }
        writeln!(out, "{INDENT}{INDENT}</laneSection>")?;
    }
    writeln!(out, "{INDENT}</lanes>")?;
    writeln!(out, "</road>")
}

fn write_road_link(out: &mut String, tag: &str, link: &RoadLink) -> std::fmt::Result {
    match link.element {
        LinkElement::Road(road_id) => writeln!(
            out,
            r#"{INDENT}{INDENT}<{tag} elementType="road" elementId="{road_id}" contactPoint="{}"/>"#,
            link.contact_point.as_str()
        ),
        LinkElement::Junction(junction_id) => writeln!(
            out,
            r#"{INDENT}{INDENT}<{tag} elementType="junction" elementId="{junction_id}"/>"#
        ),
    }
}

fn write_side<'a>(
    out: &mut String,
    side: &str,
    lanes: impl Iterator<Item = &'a Lane>,
) -> std::fmt::Result {
    let pad = INDENT.repeat(3);
    writeln!(out, "{pad}<{side}>")?;
    for lane in lanes {
        writeln!(
            out,
            r#"{pad}{INDENT}<lane id="{}" type="{}">"#,
            lane.id,
            lane.lane_type.as_str()
        )?;
        if lane.predecessor.is_some() || lane.successor.is_some() {
            writeln!(out, "{pad}{INDENT}{INDENT}<link>")?;
            if let Some(id) = lane.predecessor {
                writeln!(out, r#"{pad}{INDENT}{INDENT}{INDENT}<predecessor id="{id}"/>"#)?;
            }
            if let Some(id) = lane.successor {
                writeln!(out, r#"{pad}{INDENT}{INDENT}{INDENT}<successor id="{id}"/>"#)?;
            }
            writeln!(out, "{pad}{INDENT}{INDENT}</link>")?;
        }
        for width in &lane.widths {
            writeln!(
                out,
                r#"{pad}{INDENT}{INDENT}<width sOffset="{}" a="{}" b="{}" c="{}" d="{}"/>"#,
                width.s_offset, width.a, width.b, width.c, width.d
            )?;
        }
        writeln!(out, "{pad}{INDENT}</lane>")?;
    }
    writeln!(out, "{pad}</{side}>")
}

/// Escapes the XML special characters of an attribute value
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContactPoint, LaneSection, LaneType};
    use crate::topology::{LaneLink, TurnType};

    #[test]
    fn connection_lists_lane_links() {
        let mut connection = JunctionConnection::new(3, 1, 7, ContactPoint::Start, TurnType::Right);
        connection.add_lane_link(LaneLink::new(-1, -1));
        connection.add_lane_link(LaneLink::new(-2, -2));

        let xml = connection_to_xml(&connection).unwrap();
        assert_eq!(
            xml,
            concat!(
                "<connection id=\"3\" incomingRoad=\"1\" connectingRoad=\"7\" contactPoint=\"start\">\n",
                "    <laneLink from=\"-1\" to=\"-1\"/>\n",
                "    <laneLink from=\"-2\" to=\"-2\"/>\n",
                "</connection>\n",
            )
        );
    }

    #[test]
    fn junction_name_is_escaped() {
        let mut network = RoadNetwork::new();
        network
            .add_junction(Junction::new(2).with_name("Main & \"First\""))
            .unwrap();

        let xml = junction_to_xml(&network, 2).unwrap();
        assert!(xml.starts_with(r#"<junction id="2" name="Main &amp; &quot;First&quot;">"#));
        assert!(xml.trim_end().ends_with("</junction>"));
        assert!(matches!(junction_to_xml(&network, 5), Err(Error::JunctionNotFound(5))));
    }

    #[test]
    fn connecting_road_carries_links_and_widths() {
        let mut network = RoadNetwork::new();
        network.add_junction(Junction::new(1)).unwrap();
        let mut lane = Lane::new(-1, LaneType::Driving, 3.5);
        lane.predecessor = Some(-2);
        let mut road = Road::new(9, 12.0).with_lane_section(LaneSection::new(0.0).with_lane(lane));
        road.junction = Some(1);
        road.predecessor = Some(RoadLink::road(4, ContactPoint::End));
        network.add_road(road).unwrap();

        let xml = connecting_roads_to_xml(&network, 1).unwrap();
        assert!(xml.contains(r#"<road id="9" name="" length="12" junction="1">"#));
        assert!(xml.contains(r#"<predecessor elementType="road" elementId="4" contactPoint="end"/>"#));
        assert!(xml.contains(r#"<predecessor id="-2"/>"#));
        assert!(xml.contains(r#"<width sOffset="0" a="3.5" b="0" c="0" d="0"/>"#));
        assert!(!xml.contains("<left>"));
    }
}
