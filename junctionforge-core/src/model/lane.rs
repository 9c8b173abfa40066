//! Lanes and lane sections

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{LaneId, RoadId};

use super::road::Road;

/// Lane usage type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LaneType {
    #[default]
    None,
    Driving,
    Sidewalk,
    Shoulder,
    Border,
    Biking,
    Parking,
    Median,
    Curb,
    Restricted,
    Stop,
    Entry,
    Exit,
    OnRamp,
    OffRamp,
}

impl LaneType {
    pub fn is_driving_lane(self) -> bool {
        matches!(
            self,
            LaneType::Driving
                | LaneType::Entry
                | LaneType::Exit
                | LaneType::OnRamp
                | LaneType::OffRamp
        )
    }

    pub fn is_carriageway(self) -> bool {
        !matches!(self, LaneType::Sidewalk | LaneType::Curb)
    }

    pub fn is_sidewalk(self) -> bool {
        self == LaneType::Sidewalk
    }

    /// OpenDRIVE attribute value
    pub fn as_str(self) -> &'static str {
        match self {
            LaneType::None => "none",
            LaneType::Driving => "driving",
            LaneType::Sidewalk => "sidewalk",
            LaneType::Shoulder => "shoulder",
            LaneType::Border => "border",
            LaneType::Biking => "biking",
            LaneType::Parking => "parking",
            LaneType::Median => "median",
            LaneType::Curb => "curb",
            LaneType::Restricted => "restricted",
            LaneType::Stop => "stop",
            LaneType::Entry => "entry",
            LaneType::Exit => "exit",
            LaneType::OnRamp => "onRamp",
            LaneType::OffRamp => "offRamp",
        }
    }
}

/// Side of the reference line a lane lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneSide {
    Left,
    Center,
    Right,
}

impl LaneSide {
    pub fn of(id: LaneId) -> Self {
        match id.signum() {
            1 => LaneSide::Left,
            -1 => LaneSide::Right,
            _ => LaneSide::Center,
        }
    }
}

/// Travel direction relative to the road's reference line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelDirection {
    Forward,
    Backward,
    Undirected,
}

/// Cubic lane width record, valid from `s_offset` inside its lane section
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LaneWidth {
    pub s_offset: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl LaneWidth {
    pub fn constant(width: f64) -> Self {
        Self {
            a: width,
            ..Self::default()
        }
    }

    /// Width growing linearly from `start` to `end` over `length`
    pub fn linear(start: f64, end: f64, length: f64) -> Self {
        let b = if length > 0.0 {
            (end - start) / length
        } else {
            0.0
        };
        Self {
            a: start,
            b,
            ..Self::default()
        }
    }

    pub fn value_at(&self, ds: f64) -> f64 {
        let ds = ds - self.s_offset;
        self.a + self.b * ds + self.c * ds * ds + self.d * ds * ds * ds
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub id: LaneId,
    pub lane_type: LaneType,
    /// Width records ordered by `s_offset`
    pub widths: Vec<LaneWidth>,
    pub predecessor: Option<LaneId>,
    pub successor: Option<LaneId>,
    /// Overrides the side-derived travel direction
    pub direction: Option<TravelDirection>,
}

impl Lane {
    pub fn new(id: LaneId, lane_type: LaneType, width: f64) -> Self {
        let widths = if id == 0 {
            Vec::new()
        } else {
            vec![LaneWidth::constant(width)]
        };
        Self {
            id,
            lane_type,
            widths,
            predecessor: None,
            successor: None,
            direction: None,
        }
    }

    pub fn center() -> Self {
        Self::new(0, LaneType::None, 0.0)
    }

    pub fn with_width(mut self, width: LaneWidth) -> Self {
        self.widths = vec![width];
        self
    }

    pub fn side(&self) -> LaneSide {
        LaneSide::of(self.id)
    }

    /// Right-hand traffic: right lanes follow the reference line, left lanes oppose it
    pub fn direction(&self) -> TravelDirection {
        self.direction.unwrap_or(match self.side() {
            LaneSide::Right => TravelDirection::Forward,
            LaneSide::Left => TravelDirection::Backward,
            LaneSide::Center => TravelDirection::Undirected,
        })
    }

    /// Width at `ds`, measured from the start of the lane section
    pub fn width_at(&self, ds: f64) -> f64 {
        if self.id == 0 {
            return 0.0;
        }
        self.widths
            .iter()
            .rev()
            .find(|width| width.s_offset <= ds)
            .or_else(|| self.widths.first())
            .map_or(0.0, |width| width.value_at(ds).max(0.0))
    }

    pub fn is_driving_lane(&self) -> bool {
        self.lane_type.is_driving_lane()
    }

    pub fn is_carriageway(&self) -> bool {
        self.lane_type.is_carriageway()
    }

    pub fn is_sidewalk(&self) -> bool {
        self.lane_type.is_sidewalk()
    }
}

/// Which lateral edge of a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneEdge {
    /// Edge away from the reference line
    Outer,
    /// Edge towards the reference line
    Inner,
}

/// Longitudinal span of a road with a constant lane layout
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LaneSection {
    /// Start of the section along the road
    pub s: f64,
    lanes: BTreeMap<LaneId, Lane>,
}

impl LaneSection {
    /// Empty section holding only the centre lane
    pub fn new(s: f64) -> Self {
        let mut lanes = BTreeMap::new();
        lanes.insert(0, Lane::center());
        Self { s, lanes }
    }

    pub fn with_lane(mut self, lane: Lane) -> Self {
        self.add_lane(lane);
        self
    }

    /// Inserts a lane, replacing any lane with the same id
    pub fn add_lane(&mut self, lane: Lane) {
        self.lanes.insert(lane.id, lane);
    }

    pub fn lane(&self, id: LaneId) -> Option<&Lane> {
        self.lanes.get(&id)
    }

    pub fn lane_mut(&mut self, id: LaneId) -> Option<&mut Lane> {
        self.lanes.get_mut(&id)
    }

    pub fn contains_lane(&self, id: LaneId) -> bool {
        self.lanes.contains_key(&id)
    }

    /// All lanes ordered by ascending id, centre lane included
    pub fn lanes(&self) -> impl DoubleEndedIterator<Item = &Lane> {
        self.lanes.values()
    }

    /// Lanes other than the centre lane, ascending by id
    pub fn side_lanes(&self) -> impl DoubleEndedIterator<Item = &Lane> {
        self.lanes.values().filter(|lane| lane.id != 0)
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Left lanes ordered from the reference line outward
    pub fn left_lanes(&self) -> impl Iterator<Item = &Lane> {
        self.lanes.range(1..).map(|(_, lane)| lane)
    }

    /// Right lanes ordered from the reference line outward
    pub fn right_lanes(&self) -> impl Iterator<Item = &Lane> {
        self.lanes.range(..0).rev().map(|(_, lane)| lane)
    }

    pub fn lowest_lane(&self) -> Option<&Lane> {
        self.lanes.values().next()
    }

    pub fn highest_lane(&self) -> Option<&Lane> {
        self.lanes.values().next_back()
    }

    /// Outermost left lane, falling back to the centre lane
    pub fn left_most_lane(&self) -> Option<&Lane> {
        self.highest_lane()
    }

    /// Outermost right lane, falling back to the centre lane
    pub fn right_most_lane(&self) -> Option<&Lane> {
        self.lowest_lane()
    }

    pub fn lowest_carriageway_lane(&self) -> Option<&Lane> {
        self.side_lanes().find(|lane| lane.is_carriageway())
    }

    pub fn highest_carriageway_lane(&self) -> Option<&Lane> {
        self.side_lanes().rev().find(|lane| lane.is_carriageway())
    }

    pub fn left_width(&self, ds: f64) -> f64 {
        self.left_lanes().map(|lane| lane.width_at(ds)).sum()
    }

    pub fn right_width(&self, ds: f64) -> f64 {
        self.right_lanes().map(|lane| lane.width_at(ds)).sum()
    }

    /// Signed lateral offset of a lane edge from the reference line
    pub fn edge_offset(&self, id: LaneId, edge: LaneEdge, ds: f64) -> Option<f64> {
        let lane = self.lane(id)?;
        let inner: f64 = match lane.side() {
            LaneSide::Center => return Some(0.0),
            LaneSide::Left => self
                .left_lanes()
                .take_while(|other| other.id < id)
                .map(|other| other.width_at(ds))
                .sum(),
            LaneSide::Right => self
                .right_lanes()
                .take_while(|other| other.id > id)
                .map(|other| other.width_at(ds))
                .sum(),
        };
        let magnitude = match edge {
            LaneEdge::Inner => inner,
            LaneEdge::Outer => inner + lane.width_at(ds),
        };
        Some(match lane.side() {
            LaneSide::Right => -magnitude,
            _ => magnitude,
        })
    }
}

/// A point on a specific lane of a lane section
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneCoord {
    pub road_id: RoadId,
    pub section_index: usize,
    pub lane_id: LaneId,
    pub lane_type: LaneType,
    /// Distance along the road
    pub s: f64,
    /// Lateral offset relative to the lane
    pub offset: f64,
}

impl LaneCoord {
    /// Returns `None` when the lane does not belong to the referenced section
    pub fn on(road: &Road, section_index: usize, lane_id: LaneId, s: f64) -> Option<Self> {
        let lane = road.lane_sections.get(section_index)?.lane(lane_id)?;
        Some(Self {
            road_id: road.id,
            section_index,
            lane_id,
            lane_type: lane.lane_type,
            s,
            offset: 0.0,
        })
    }

    pub fn is_driving_lane(&self) -> bool {
        self.lane_type.is_driving_lane()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section() -> LaneSection {
        LaneSection::new(0.0)
            .with_lane(Lane::new(3, LaneType::Sidewalk, 2.0))
            .with_lane(Lane::new(2, LaneType::Driving, 3.5))
            .with_lane(Lane::new(1, LaneType::Driving, 3.0))
            .with_lane(Lane::new(-1, LaneType::Driving, 3.0))
            .with_lane(Lane::new(-2, LaneType::Driving, 3.5))
            .with_lane(Lane::new(-3, LaneType::Sidewalk, 2.0))
    }

    #[test]
    fn extreme_lanes_by_id() {
        let section = section();

        assert_eq!(section.left_most_lane().map(|l| l.id), Some(3));
        assert_eq!(section.right_most_lane().map(|l| l.id), Some(-3));
        assert_eq!(section.lowest_carriageway_lane().map(|l| l.id), Some(-2));
        assert_eq!(section.highest_carriageway_lane().map(|l| l.id), Some(2));
    }

    #[test]
    fn side_lanes_ordered_outward() {
        let section = section();

        let left: Vec<_> = section.left_lanes().map(|l| l.id).collect();
        let right: Vec<_> = section.right_lanes().map(|l| l.id).collect();
        assert_eq!(left, vec![1, 2, 3]);
        assert_eq!(right, vec![-1, -2, -3]);
    }

    #[test]
    fn edge_offsets_accumulate_widths() {
        let section = section();

        assert_eq!(section.edge_offset(-1, LaneEdge::Inner, 0.0), Some(0.0));
        assert_eq!(section.edge_offset(-2, LaneEdge::Outer, 0.0), Some(-6.5));
        assert_eq!(section.edge_offset(3, LaneEdge::Outer, 0.0), Some(8.5));
        assert_eq!(section.edge_offset(3, LaneEdge::Inner, 0.0), Some(6.5));
        assert_eq!(section.edge_offset(0, LaneEdge::Outer, 0.0), Some(0.0));
        assert_eq!(section.edge_offset(7, LaneEdge::Outer, 0.0), None);
        assert!((section.left_width(0.0) - 8.5).abs() < 1e-12);
        assert!((section.right_width(0.0) - 8.5).abs() < 1e-12);
    }

    #[test]
    fn direction_follows_side_unless_overridden() {
        let mut lane = Lane::new(2, LaneType::Driving, 3.0);
        assert_eq!(lane.direction(), TravelDirection::Backward);
        assert_eq!(
            Lane::new(-1, LaneType::Driving, 3.0).direction(),
            TravelDirection::Forward
        );

        lane.direction = Some(TravelDirection::Undirected);
        assert_eq!(lane.direction(), TravelDirection::Undirected);
    }

    #[test]
    fn linear_width_interpolates() {
        let lane = Lane::new(-1, LaneType::Driving, 0.0).with_width(LaneWidth::linear(3.0, 4.0, 10.0));

        assert!((lane.width_at(0.0) - 3.0).abs() < 1e-12);
        assert!((lane.width_at(5.0) - 3.5).abs() < 1e-12);
        assert!((lane.width_at(10.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn lane_type_predicates() {
        assert!(LaneType::Driving.is_driving_lane());
        assert!(!LaneType::Sidewalk.is_driving_lane());
        assert!(LaneType::Shoulder.is_carriageway());
        assert!(!LaneType::Curb.is_carriageway());
        assert!(LaneType::Sidewalk.is_sidewalk());
    }
}
