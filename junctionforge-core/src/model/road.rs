//! Roads, road links and road coordinates

use serde::{Deserialize, Serialize};

use crate::{JunctionId, RoadId};

use super::lane::LaneSection;

/// End of a road's reference line a link attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactPoint {
    Start,
    End,
}

impl ContactPoint {
    pub fn opposite(self) -> Self {
        match self {
            ContactPoint::Start => ContactPoint::End,
            ContactPoint::End => ContactPoint::Start,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContactPoint::Start => "start",
            ContactPoint::End => "end",
        }
    }
}

/// Element on the other side of a road link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "element_type", content = "element_id", rename_all = "lowercase")]
pub enum LinkElement {
    Road(RoadId),
    Junction(JunctionId),
}

/// Predecessor/successor link of a road
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoadLink {
    pub element: LinkElement,
    /// Contact point on the linked element; meaningful for road elements only
    pub contact_point: ContactPoint,
}

impl RoadLink {
    pub fn road(road_id: RoadId, contact_point: ContactPoint) -> Self {
        Self {
            element: LinkElement::Road(road_id),
            contact_point,
        }
    }

    pub fn junction(junction_id: JunctionId) -> Self {
        Self {
            element: LinkElement::Junction(junction_id),
            contact_point: ContactPoint::Start,
        }
    }

    pub fn road_contact(&self) -> Option<RoadContact> {
        match self.element {
            LinkElement::Road(road_id) => Some(RoadContact {
                road_id,
                contact_point: self.contact_point,
            }),
            LinkElement::Junction(_) => None,
        }
    }

    pub fn is_junction(&self) -> bool {
        matches!(self.element, LinkElement::Junction(_))
    }
}

/// A road end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoadContact {
    pub road_id: RoadId,
    pub contact_point: ContactPoint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    pub id: RoadId,
    pub name: String,
    /// Length of the reference line
    pub length: f64,
    /// Set for connecting roads owned by a junction
    pub junction: Option<JunctionId>,
    pub predecessor: Option<RoadLink>,
    pub successor: Option<RoadLink>,
    /// Lane sections ordered by `s`
    pub lane_sections: Vec<LaneSection>,
}

impl Road {
    pub fn new(id: RoadId, length: f64) -> Self {
        Self {
            id,
            name: String::new(),
            length,
            junction: None,
            predecessor: None,
            successor: None,
            lane_sections: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_lane_section(mut self, section: LaneSection) -> Self {
        self.lane_sections.push(section);
        self.lane_sections.sort_by(|a, b| a.s.total_cmp(&b.s));
        self
    }

    pub fn is_connecting_road(&self) -> bool {
        self.junction.is_some()
    }

    pub fn link_at(&self, contact: ContactPoint) -> Option<&RoadLink> {
        match contact {
            ContactPoint::Start => self.predecessor.as_ref(),
            ContactPoint::End => self.successor.as_ref(),
        }
    }

    pub fn s_at(&self, contact: ContactPoint) -> f64 {
        match contact {
            ContactPoint::Start => 0.0,
            ContactPoint::End => self.length,
        }
    }

    /// Contact point of `s` if it sits on one of the road ends
    pub fn contact_at(&self, s: f64, tolerance: f64) -> Option<ContactPoint> {
        if s.abs() <= tolerance {
            Some(ContactPoint::Start)
        } else if (s - self.length).abs() <= tolerance {
            Some(ContactPoint::End)
        } else {
            None
        }
    }

    pub fn section_index_at(&self, contact: ContactPoint) -> Option<usize> {
        match contact {
            ContactPoint::Start if !self.lane_sections.is_empty() => Some(0),
            ContactPoint::End => self.lane_sections.len().checked_sub(1),
            ContactPoint::Start => None,
        }
    }

    pub fn lane_section_at(&self, contact: ContactPoint) -> Option<&LaneSection> {
        self.section_index_at(contact)
            .and_then(|index| self.lane_sections.get(index))
    }

    /// Section covering `s`
    pub fn lane_section_at_s(&self, s: f64) -> Option<&LaneSection> {
        self.lane_sections
            .iter()
            .rev()
            .find(|section| section.s <= s)
            .or_else(|| self.lane_sections.first())
    }
}

/// A point on a road's reference line
#[derive(Debug, Clone, Copy)]
pub struct RoadCoord<'a> {
    pub road: &'a Road,
    pub s: f64,
    pub t: f64,
}

impl<'a> RoadCoord<'a> {
    /// Coordinate at `s`, clamped to the road length
    pub fn new(road: &'a Road, s: f64, t: f64) -> Self {
        Self {
            road,
            s: s.clamp(0.0, road.length.max(0.0)),
            t,
        }
    }

    pub fn at_contact(road: &'a Road, contact: ContactPoint) -> Self {
        Self::new(road, road.s_at(contact), 0.0)
    }

    pub fn contact(&self, tolerance: f64) -> Option<ContactPoint> {
        self.road.contact_at(self.s, tolerance)
    }
}
