//! Player positions and the parsing of `/data get entity ... Pos` replies.

use rand::Rng;
use std::fmt;

/// A point in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

/// Extract the position from a reply such as
/// `tibretS has the following entity data: [-12.5d, 64.0d, 33.25d]`.
///
/// The last bracketed list in the reply is used. Returns `None` unless it
/// holds exactly three numbers.
pub fn parse_position(response: &str) -> Option<Vec3> {
    let start = response.rfind('[')?;
    let end = start + response[start..].find(']')?;

    let coords = response[start + 1..end]
        .split(',')
        .map(|part| part.trim().trim_end_matches(['d', 'D']).parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .ok()?;

    match coords.as_slice() {
        [x, y, z] => Some(Vec3::new(*x, *y, *z)),
        _ => None,
    }
}

/// Offset each axis of `origin` by a random amount in `(-max, max)`.
pub fn scatter<R: Rng + ?Sized>(origin: Vec3, max_offset: Vec3, rng: &mut R) -> Vec3 {
    let mut offset = |max: f64| {
        let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        rng.random::<f64>() * max * direction
    };

    Vec3::new(
        origin.x + offset(max_offset.x),
        origin.y + offset(max_offset.y),
        origin.z + offset(max_offset.z),
    )
}
