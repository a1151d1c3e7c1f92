//! The closed set of shape identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::library::ShapeError;

/// Identifies one procedural generator and its colour rule.
///
/// The kebab-case name (`"klein-bottle"`) is the stable external spelling
/// used in config files and on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeId {
    // Default
    Heart,
    Saturn,
    Flower,
    Fireworks,
    Sphere,
    // Advanced
    Helix,
    Spiral,
    Cube,
    Star,
    Torus,
    // Expert
    Pyramid,
    Hourglass,
    Atom,
    Tornado,
    Ribbon,
    // Knots & surfaces
    TrefoilKnot,
    KleinBottle,
    Spring,
    Seashell,
    Lissajous,
    // Crystal
    VoxelSphere,
    Crystal,
    Gear,
    Crown,
    Snowflake,
    // Nature
    Mushroom,
    Tree,
    Jellyfish,
    Butterfly,
    Cloud,
    // Lattice
    GyroidShell,
    LatticeCube,
    Lantern,
    Sponge,
    Cage,
    // Twins
    TwinFlames,
    MirrorPair,
    DoubleTorus,
    TripleHelix,
    BinaryGalaxy,
}

impl ShapeId {
    /// Every variant, in catalogue order.
    pub const ALL: [ShapeId; 40] = [
        ShapeId::Heart, ShapeId::Saturn, ShapeId::Flower, ShapeId::Fireworks, ShapeId::Sphere,
        ShapeId::Helix, ShapeId::Spiral, ShapeId::Cube, ShapeId::Star, ShapeId::Torus,
        ShapeId::Pyramid, ShapeId::Hourglass, ShapeId::Atom, ShapeId::Tornado, ShapeId::Ribbon,
        ShapeId::TrefoilKnot, ShapeId::KleinBottle, ShapeId::Spring, ShapeId::Seashell, ShapeId::Lissajous,
        ShapeId::VoxelSphere, ShapeId::Crystal, ShapeId::Gear, ShapeId::Crown, ShapeId::Snowflake,
        ShapeId::Mushroom, ShapeId::Tree, ShapeId::Jellyfish, ShapeId::Butterfly, ShapeId::Cloud,
        ShapeId::GyroidShell, ShapeId::LatticeCube, ShapeId::Lantern, ShapeId::Sponge, ShapeId::Cage,
        ShapeId::TwinFlames, ShapeId::MirrorPair, ShapeId::DoubleTorus, ShapeId::TripleHelix, ShapeId::BinaryGalaxy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeId::Heart        => "heart",
            ShapeId::Saturn       => "saturn",
            ShapeId::Flower       => "flower",
            ShapeId::Fireworks    => "fireworks",
            ShapeId::Sphere       => "sphere",
            ShapeId::Helix        => "helix",
            ShapeId::Spiral       => "spiral",
            ShapeId::Cube         => "cube",
            ShapeId::Star         => "star",
            ShapeId::Torus        => "torus",
            ShapeId::Pyramid      => "pyramid",
            ShapeId::Hourglass    => "hourglass",
            ShapeId::Atom         => "atom",
            ShapeId::Tornado      => "tornado",
            ShapeId::Ribbon       => "ribbon",
            ShapeId::TrefoilKnot  => "trefoil-knot",
            ShapeId::KleinBottle  => "klein-bottle",
            ShapeId::Spring       => "spring",
            ShapeId::Seashell     => "seashell",
            ShapeId::Lissajous    => "lissajous",
            ShapeId::VoxelSphere  => "voxel-sphere",
            ShapeId::Crystal      => "crystal",
            ShapeId::Gear         => "gear",
            ShapeId::Crown        => "crown",
            ShapeId::Snowflake    => "snowflake",
            ShapeId::Mushroom     => "mushroom",
            ShapeId::Tree         => "tree",
            ShapeId::Jellyfish    => "jellyfish",
            ShapeId::Butterfly    => "butterfly",
            ShapeId::Cloud        => "cloud",
            ShapeId::GyroidShell  => "gyroid-shell",
            ShapeId::LatticeCube  => "lattice-cube",
            ShapeId::Lantern      => "lantern",
            ShapeId::Sponge       => "sponge",
            ShapeId::Cage         => "cage",
            ShapeId::TwinFlames   => "twin-flames",
            ShapeId::MirrorPair   => "mirror-pair",
            ShapeId::DoubleTorus  => "double-torus",
            ShapeId::TripleHelix  => "triple-helix",
            ShapeId::BinaryGalaxy => "binary-galaxy",
        }
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeId {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        ShapeId::ALL
            .iter()
            .copied()
            .find(|id| id.name() == wanted)
            .ok_or_else(|| ShapeError::UnknownName(s.to_string()))
    }
}
