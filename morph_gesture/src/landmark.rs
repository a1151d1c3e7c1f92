//! Hand landmarks in the 21-point layout.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

/// Points per hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// Palm-centre proxy used for orientation.
pub const PALM_CENTRE: usize = MIDDLE_MCP;

/// One tracked point.  `x`, `y` are image-normalised (`y` grows downward),
/// `z` is relative depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    /// Distance in the image plane, ignoring depth.
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LandmarkError {
    /// A hand was built from a slice that did not hold exactly 21 points.
    WrongCount(usize),
}

impl fmt::Display for LandmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LandmarkError::WrongCount(n) => {
                write!(f, "a hand needs {} landmarks, got {}", LANDMARK_COUNT, n)
            }
        }
    }
}

impl std::error::Error for LandmarkError {}

/// Exactly 21 landmarks.  Serialises as a plain JSON array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct Hand {
    points: [Landmark; LANDMARK_COUNT],
}

impl Hand {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Hand { points }
    }

    pub fn from_slice(points: &[Landmark]) -> Result<Self, LandmarkError> {
        let points: [Landmark; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkError::WrongCount(points.len()))?;
        Ok(Hand { points })
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    pub fn wrist(&self) -> Landmark {
        self.points[WRIST]
    }

    pub fn palm_centre(&self) -> Landmark {
        self.points[PALM_CENTRE]
    }
}

impl Index<usize> for Hand {
    type Output = Landmark;

    fn index(&self, i: usize) -> &Landmark {
        &self.points[i]
    }
}

impl TryFrom<Vec<Landmark>> for Hand {
    type Error = LandmarkError;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        Hand::from_slice(&points)
    }
}

impl From<Hand> for Vec<Landmark> {
    fn from(hand: Hand) -> Self {
        hand.points.to_vec()
    }
}
