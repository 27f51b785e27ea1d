//! Colour types shared by the primary robot and the relay robot.
//!
//! Both robots read raw RGB triples and reduce them to a small discrete
//! palette with fixed threshold tables:
//! - [`FloorColor`]: floor markers seen by the two drive colour sensors
//! - [`ZoneColor`]: the person's colour seen in the gripper zone, sent over
//!   the relay as an integer code

use serde::{Deserialize, Serialize};

/// Raw reflected-light reading, one percentage per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Floor colour seen by a drive colour sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloorColor {
    White,
    Black,
    Yellow,
    Red,
    Blue,
}

impl FloorColor {
    /// Classify a raw reading.
    ///
    /// Rules are evaluated in order; anything unmatched reads as background.
    ///
    /// | Colour | Rule |
    /// |--------|------|
    /// | White  | all channels > 50 |
    /// | Black  | all channels < 30 |
    /// | Yellow | R > 45, G > 45, B < 35 |
    /// | Red    | R > 40, G < 25, B < 25 |
    /// | Blue   | R < 30, G < 30, B > 35 |
    pub fn classify(rgb: Rgb) -> Self {
        let Rgb { r, g, b } = rgb;

        if r > 50 && g > 50 && b > 50 {
            return FloorColor::White;
        }
        if r < 30 && g < 30 && b < 30 {
            return FloorColor::Black;
        }
        if r > 45 && g > 45 && b < 35 {
            return FloorColor::Yellow;
        }
        if r > 40 && g < 25 && b < 25 {
            return FloorColor::Red;
        }
        if r < 30 && g < 30 && b > 35 {
            return FloorColor::Blue;
        }

        FloorColor::White
    }

    /// Canonical reading that classifies back to this colour
    pub fn reference_rgb(self) -> Rgb {
        match self {
            FloorColor::White => Rgb::new(80, 80, 80),
            FloorColor::Black => Rgb::new(10, 10, 10),
            FloorColor::Yellow => Rgb::new(60, 60, 20),
            FloorColor::Red => Rgb::new(60, 15, 15),
            FloorColor::Blue => Rgb::new(15, 15, 60),
        }
    }

    /// Anything other than the white background
    #[inline]
    pub fn is_marker(self) -> bool {
        self != FloorColor::White
    }
}

/// Colour of the person in the gripper zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneColor {
    /// Nothing recognisable (or no reading yet)
    None,
    Red,
    Blue,
    Brown,
    Green,
}

impl ZoneColor {
    /// Classify a raw gripper-zone reading.
    ///
    /// Dark readings (all channels < 20) are brown; otherwise the strictly
    /// dominant channel wins. Ties read as [`ZoneColor::None`].
    pub fn classify(rgb: Rgb) -> Self {
        let Rgb { r, g, b } = rgb;

        if r < 20 && g < 20 && b < 20 {
            ZoneColor::Brown
        } else if r > g && r > b {
            ZoneColor::Red
        } else if g > r && g > b {
            ZoneColor::Green
        } else if b > r && b > g {
            ZoneColor::Blue
        } else {
            ZoneColor::None
        }
    }

    /// Integer code carried by the relay channel
    pub fn code(self) -> u8 {
        match self {
            ZoneColor::None => 0,
            ZoneColor::Red => 1,
            ZoneColor::Blue => 2,
            ZoneColor::Brown => 3,
            ZoneColor::Green => 4,
        }
    }

    /// Decode a relay value. Unknown codes decode to [`ZoneColor::None`].
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => ZoneColor::Red,
            2 => ZoneColor::Blue,
            3 => ZoneColor::Brown,
            4 => ZoneColor::Green,
            _ => ZoneColor::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_reference_readings_round_trip() {
        for color in [
            FloorColor::White,
            FloorColor::Black,
            FloorColor::Yellow,
            FloorColor::Red,
            FloorColor::Blue,
        ] {
            assert_eq!(FloorColor::classify(color.reference_rgb()), color);
        }
    }

    #[test]
    fn test_floor_rule_order() {
        // Bright but bluish is still white: the white rule runs first
        assert_eq!(FloorColor::classify(Rgb::new(55, 55, 90)), FloorColor::White);
        // Dark with a faint blue tint is black
        assert_eq!(FloorColor::classify(Rgb::new(10, 10, 29)), FloorColor::Black);
        // Unmatched mid-grey falls back to background
        assert_eq!(FloorColor::classify(Rgb::new(40, 40, 40)), FloorColor::White);
    }

    #[test]
    fn test_zone_classification() {
        assert_eq!(ZoneColor::classify(Rgb::new(5, 10, 15)), ZoneColor::Brown);
        assert_eq!(ZoneColor::classify(Rgb::new(60, 20, 20)), ZoneColor::Red);
        assert_eq!(ZoneColor::classify(Rgb::new(20, 60, 20)), ZoneColor::Green);
        assert_eq!(ZoneColor::classify(Rgb::new(20, 20, 60)), ZoneColor::Blue);
        assert_eq!(ZoneColor::classify(Rgb::new(40, 40, 30)), ZoneColor::None);
    }

    #[test]
    fn test_zone_codes() {
        for color in [
            ZoneColor::None,
            ZoneColor::Red,
            ZoneColor::Blue,
            ZoneColor::Brown,
            ZoneColor::Green,
        ] {
            assert_eq!(ZoneColor::from_code(color.code()), color);
        }
        assert_eq!(ZoneColor::from_code(9), ZoneColor::None);
    }
}
