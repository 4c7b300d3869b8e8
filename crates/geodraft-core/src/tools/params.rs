//! Parameters the user enters outside of clicking (numeric fields).

use crate::shapes::{DEFAULT_CIRCLE_SEGMENTS, DEFAULT_ELLIPSE_SEGMENTS, DEFAULT_POINT_SIZE, Rgb};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Color given to new shapes until the user picks another.
pub const DEFAULT_PAINT: Rgb = Rgb::new(0.0, 0.4, 1.0);

/// Numeric inputs consumed by the tools when they commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolParams {
    pub paint_color: Rgb,
    pub point_size: f64,
    pub circle_segments: u32,
    /// Radius used by the center-then-radius circle mode.
    pub circle_radius: f64,
    pub ellipse_a: f64,
    pub ellipse_b: f64,
    /// Ellipse rotation in radians.
    pub ellipse_rotation: f64,
    pub ellipse_segments: u32,
    pub parabola_a: f64,
    pub parabola_vertical: bool,
    pub hyperbola_a: f64,
    pub hyperbola_b: f64,
    pub hyperbola_vertical: bool,
    /// Counter-clockwise angle for the rotate construction, in degrees.
    pub rotation_degrees: f64,
    /// Coordinates for the point-input tool.
    pub input_position: Point,
    /// Optional label for the point-input tool.
    pub input_name: Option<String>,
}

impl Default for ToolParams {
    fn default() -> Self {
        Self {
            paint_color: DEFAULT_PAINT,
            point_size: DEFAULT_POINT_SIZE,
            circle_segments: DEFAULT_CIRCLE_SEGMENTS,
            circle_radius: 0.5,
            ellipse_a: 0.8,
            ellipse_b: 0.4,
            ellipse_rotation: 0.0,
            ellipse_segments: DEFAULT_ELLIPSE_SEGMENTS,
            parabola_a: 0.3,
            parabola_vertical: true,
            hyperbola_a: 0.4,
            hyperbola_b: 0.25,
            hyperbola_vertical: false,
            rotation_degrees: 90.0,
            input_position: Point::ZERO,
            input_name: None,
        }
    }
}

/// Error from [`ToolParams::set`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("unknown parameter {0:?}")]
    Unknown(String),
    #[error("parameter {name:?} expects {expected}")]
    BadValue { name: String, expected: &'static str },
}

fn number(name: &str, values: &[&str]) -> Result<f64, ParamError> {
    match values {
        [v] => v
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| bad(name, "a number")),
        _ => Err(bad(name, "a number")),
    }
}

fn segments(name: &str, values: &[&str]) -> Result<u32, ParamError> {
    match values {
        [v] => v
            .parse::<u32>()
            .ok()
            .filter(|v| *v >= 3)
            .ok_or_else(|| bad(name, "an integer of at least 3")),
        _ => Err(bad(name, "an integer of at least 3")),
    }
}

fn orientation(name: &str, values: &[&str]) -> Result<bool, ParamError> {
    match values {
        ["vertical" | "v" | "1" | "true"] => Ok(true),
        ["horizontal" | "h" | "0" | "false"] => Ok(false),
        _ => Err(bad(name, "vertical or horizontal")),
    }
}

fn bad(name: &str, expected: &'static str) -> ParamError {
    ParamError::BadValue {
        name: name.to_string(),
        expected,
    }
}

impl ToolParams {
    /// Set a parameter by name from its textual value(s).
    pub fn set(&mut self, name: &str, values: &[&str]) -> Result<(), ParamError> {
        match name {
            "point-size" => self.point_size = number(name, values)?.max(0.0),
            "circle-segments" => self.circle_segments = segments(name, values)?,
            "radius" => self.circle_radius = number(name, values)?.abs(),
            "ellipse-a" => self.ellipse_a = number(name, values)?,
            "ellipse-b" => self.ellipse_b = number(name, values)?,
            "ellipse-rotation" => self.ellipse_rotation = number(name, values)?,
            "ellipse-segments" => self.ellipse_segments = segments(name, values)?,
            "parabola-a" => self.parabola_a = number(name, values)?,
            "parabola-orientation" => self.parabola_vertical = orientation(name, values)?,
            "hyperbola-a" => self.hyperbola_a = number(name, values)?,
            "hyperbola-b" => self.hyperbola_b = number(name, values)?,
            "hyperbola-orientation" => self.hyperbola_vertical = orientation(name, values)?,
            "angle" => self.rotation_degrees = number(name, values)?,
            "position" => match values {
                [x, y] => {
                    let x = number(name, &[x])?;
                    let y = number(name, &[y])?;
                    self.input_position = Point::new(x, y);
                }
                _ => return Err(bad(name, "two numbers")),
            },
            "name" => {
                let joined = values.join(" ");
                self.input_name = (!joined.is_empty()).then_some(joined);
            }
            _ => return Err(ParamError::Unknown(name.to_string())),
        }
        Ok(())
    }
}
