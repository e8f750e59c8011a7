//! Start/end point selection state.

use std::fmt;

use crate::models::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointRole {
    Start,
    End,
}

impl fmt::Display for PointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointRole::Start => f.write_str("start"),
            PointRole::End => f.write_str("end"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    /// Placed on the map (click or drag)
    marker: Option<GeoPoint>,
    /// Chosen from an address search
    place: Option<GeoPoint>,
}

impl Slot {
    fn position(&self) -> Option<GeoPoint> {
        self.marker.or(self.place)
    }
}

/// Holds the current start and end points of a session.
///
/// A map-placed marker wins over a searched place for the same role.
#[derive(Debug, Clone, Default)]
pub struct PointSelector {
    start: Slot,
    end: Slot,
    picking: Option<PointRole>,
}

impl PointSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the next map click to set `role`. Returns the prompt to show.
    pub fn pick(&mut self, role: PointRole) -> String {
        self.picking = Some(role);
        format!("Click on the map to set the {} point.", role)
    }

    pub fn picking(&self) -> Option<PointRole> {
        self.picking
    }

    /// Handle a map click. Ignored unless a role is being picked.
    pub fn click(&mut self, point: GeoPoint) -> Option<PointRole> {
        let role = self.picking.take()?;
        self.place_marker(role, point);
        Some(role)
    }

    pub fn place_marker(&mut self, role: PointRole, point: GeoPoint) {
        let slot = self.slot_mut(role);
        slot.marker = Some(point);
        slot.place = None;
    }

    pub fn set_place(&mut self, role: PointRole, point: GeoPoint) {
        self.slot_mut(role).place = Some(point);
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        self.start.position()
    }

    pub fn destination(&self) -> Option<GeoPoint> {
        self.end.position()
    }

    /// `"Start: 1.00000, 2.00000"` / `"End: not set"`.
    pub fn display_lines(&self) -> [String; 2] {
        [
            format!("Start: {}", format_position(self.origin())),
            format!("End: {}", format_position(self.destination())),
        ]
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn slot_mut(&mut self, role: PointRole) -> &mut Slot {
        match role {
            PointRole::Start => &mut self.start,
            PointRole::End => &mut self.end,
        }
    }
}

fn format_position(point: Option<GeoPoint>) -> String {
    match point {
        Some(p) => p.to_string(),
        None => "not set".to_string(),
    }
}
