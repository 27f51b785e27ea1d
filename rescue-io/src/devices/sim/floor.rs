//! Floor colour layout for the simulated arena.

use crate::types::FloorColor;

/// Axis-aligned coloured rectangle in world millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorRegion {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
    pub color: FloorColor,
}

impl FloorRegion {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32, color: FloorColor) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
            color,
        }
    }

    #[inline]
    fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Ordered list of regions; the first region containing a point wins,
/// everything else is white background.
#[derive(Debug, Clone, Default)]
pub struct FloorMap {
    regions: Vec<FloorRegion>,
}

impl FloorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region with lower priority than every region already added
    pub fn push(&mut self, region: FloorRegion) {
        self.regions.push(region);
    }

    /// Colour under a world point
    pub fn color_at(&self, x: f32, y: f32) -> FloorColor {
        self.regions
            .iter()
            .find(|r| r.contains(x, y))
            .map(|r| r.color)
            .unwrap_or(FloorColor::White)
    }
}
