//! Delivery destinations and their lookup tables.

use crate::config::MissionConfig;
use crate::position::{Position, Side};
use rescue_io::ZoneColor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Delivery target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Destination {
    Bakery,
    School,
    Drugstore,
    CityHall,
    Museum,
    Library,
    Park,
}

impl Destination {
    pub const ALL: [Destination; 7] = [
        Destination::Bakery,
        Destination::School,
        Destination::Drugstore,
        Destination::CityHall,
        Destination::Museum,
        Destination::Library,
        Destination::Park,
    ];

    /// Entrance poses in the order they are tried.
    ///
    /// The park has three entrances along the back row; each delivery there
    /// starts from the next one so people are spread out.
    pub fn entrances(self, park_deliveries: u32) -> Vec<Position> {
        use Side::*;
        match self {
            Destination::Park => {
                let mut park = vec![
                    Position::new(0, 4, Front),
                    Position::new(2, 4, Front),
                    Position::new(4, 4, Front),
                ];
                park.rotate_left((park_deliveries % 3) as usize);
                park
            }
            Destination::Bakery => vec![Position::new(1, 3, Right), Position::new(0, 4, Back)],
            Destination::School => vec![Position::new(1, 1, Right), Position::new(0, 2, Back)],
            Destination::Library => vec![Position::new(4, 0, Front), Position::new(3, 1, Left)],
            Destination::CityHall => vec![Position::new(1, 1, Left), Position::new(3, 1, Right)],
            Destination::Drugstore => vec![Position::new(2, 2, Front), Position::new(2, 4, Back)],
            Destination::Museum => vec![Position::new(3, 3, Left), Position::new(4, 2, Front)],
        }
    }

    /// How far to back off the entrance marker before releasing, given how
    /// many people were already delivered here
    pub fn unload_clearance(self, delivered_here: u32, config: &MissionConfig) -> f32 {
        if self == Destination::Park {
            return config.unload_park_mm;
        }
        match delivered_here {
            0 => config.unload_first_mm,
            1 => config.unload_second_mm,
            _ => config.unload_later_mm,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Destination::Bakery => "bakery",
            Destination::School => "school",
            Destination::Drugstore => "drugstore",
            Destination::CityHall => "city hall",
            Destination::Museum => "museum",
            Destination::Library => "library",
            Destination::Park => "park",
        };
        f.write_str(name)
    }
}

/// Destination for a person, or `None` for combinations with no destination
/// (a red child, or no recognisable colour at all)
pub fn classify(is_adult: bool, color: ZoneColor) -> Option<Destination> {
    match (is_adult, color) {
        (true, ZoneColor::Blue) => Some(Destination::Museum),
        (true, ZoneColor::Red) => Some(Destination::Drugstore),
        (true, ZoneColor::Brown) => Some(Destination::Bakery),
        (true, ZoneColor::Green) => Some(Destination::CityHall),
        (false, ZoneColor::Blue) => Some(Destination::School),
        (false, ZoneColor::Brown) => Some(Destination::Library),
        (false, ZoneColor::Green) => Some(Destination::Park),
        (false, ZoneColor::Red) | (_, ZoneColor::None) => None,
    }
}

/// People delivered so far, per destination
#[derive(Debug, Clone, Default)]
pub struct DeliveryCounter {
    counts: HashMap<Destination, u32>,
}

impl DeliveryCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, place: Destination) -> u32 {
        self.counts.get(&place).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Record one completed delivery. Returns the new count for `place`.
    pub fn record(&mut self, place: Destination) -> u32 {
        let count = self.counts.entry(place).or_insert(0);
        *count += 1;
        *count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_park_rotation() {
        let first = |n| Destination::Park.entrances(n)[0].cell;
        assert_eq!(first(0), crate::position::Cell::new(0, 4));
        assert_eq!(first(1), crate::position::Cell::new(2, 4));
        assert_eq!(first(2), crate::position::Cell::new(4, 4));
        assert_eq!(first(3), crate::position::Cell::new(0, 4));
        assert_eq!(Destination::Park.entrances(1).len(), 3);
    }

    #[test]
    fn test_entrances_avoid_static_obstacles() {
        let config = crate::config::NavConfig::default();
        for place in Destination::ALL {
            let entrances = place.entrances(0);
            assert!((2..=3).contains(&entrances.len()), "{}", place);
            for entrance in entrances {
                assert!(entrance.cell.in_bounds(config.arena.size));
                assert!(!config.arena.static_obstacles.contains(&entrance.cell));
            }
        }
    }

    #[test]
    fn test_unload_clearance() {
        let config = MissionConfig::default();
        assert_eq!(Destination::School.unload_clearance(0, &config), 300.0);
        assert_eq!(Destination::School.unload_clearance(1, &config), 250.0);
        assert_eq!(Destination::School.unload_clearance(5, &config), 175.0);
        assert_eq!(Destination::Park.unload_clearance(0, &config), 175.0);
    }

    #[test]
    fn test_counter() {
        let mut counter = DeliveryCounter::new();
        assert_eq!(counter.count(Destination::Museum), 0);
        assert_eq!(counter.record(Destination::Museum), 1);
        assert_eq!(counter.record(Destination::Museum), 2);
        counter.record(Destination::Park);
        assert_eq!(counter.total(), 3);
    }
}
