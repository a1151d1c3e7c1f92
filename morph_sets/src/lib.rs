//! # morph_sets
//!
//! Shapes are grouped into **sets** of exactly five, one per raised-finger
//! count.  A [`SetRegistry`] keeps the sets in insertion order, tracks the
//! active set and shape, and navigates cyclically:
//!
//! * `next()` / `prev()` wrap at both ends,
//! * `activate(key)` jumps straight to a set,
//!
//! and every set change forces the active shape to the set's first entry.
//! The caller regenerates the target cloud whenever a shape is returned.
//!
//! ## Quick start
//!
//! ```rust
//! use morph_sets::SetRegistry;
//! use morph_shapes::ShapeId;
//!
//! let mut sets = SetRegistry::standard().unwrap();
//! assert_eq!(sets.active_key(), "A");
//! assert_eq!(sets.select_finger_count(3), Some(ShapeId::Flower));
//!
//! assert_eq!(sets.next(), ShapeId::Helix);
//! assert_eq!(sets.active().status_label(), "SET B (Advanced)");
//! ```

use std::fmt;

use log::debug;
use morph_shapes::ShapeId;

/// Shapes per set, one per finger count 1..=5.
pub const SHAPES_PER_SET: usize = 5;

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetError {
    /// A descriptor was given a shape list of the wrong length.
    WrongShapeCount { key: String, got: usize },
    UnknownKey(String),
    DuplicateKey(String),
    /// A registry needs at least one set.
    Empty,
}

impl fmt::Display for SetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetError::WrongShapeCount { key, got } => write!(
                f, "set '{}' has {} shapes, expected {}", key, got, SHAPES_PER_SET
            ),
            SetError::UnknownKey(k)   => write!(f, "no set with key '{}'", k),
            SetError::DuplicateKey(k) => write!(f, "set key '{}' appears more than once", k),
            SetError::Empty           => write!(f, "a set registry needs at least one set"),
        }
    }
}

impl std::error::Error for SetError {}

// ════════════════════════════════════════════════════════════════════════════
// SetDescriptor
// ════════════════════════════════════════════════════════════════════════════

/// One immutable set: key, display name, indicator colour and five shapes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetDescriptor {
    key:    String,
    name:   String,
    color:  u32,
    shapes: [ShapeId; SHAPES_PER_SET],
}

impl SetDescriptor {
    /// `color` is `0xRRGGBB`.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        color: u32,
        shapes: Vec<ShapeId>,
    ) -> Result<Self, SetError> {
        let key = key.into();
        let got = shapes.len();
        let shapes = <[ShapeId; SHAPES_PER_SET]>::try_from(shapes)
            .map_err(|_| SetError::WrongShapeCount { key: key.clone(), got })?;
        Ok(SetDescriptor { key, name: name.into(), color: color & 0x00FF_FFFF, shapes })
    }

    pub fn key(&self) -> &str   { &self.key }
    pub fn name(&self) -> &str  { &self.name }
    pub fn color(&self) -> u32  { self.color }
    pub fn shapes(&self) -> &[ShapeId; SHAPES_PER_SET] { &self.shapes }

    pub fn first_shape(&self) -> ShapeId {
        self.shapes[0]
    }

    /// Shape for a finger count in `1..=5`.
    pub fn shape_for(&self, count: u8) -> Option<ShapeId> {
        match count {
            1..=5 => Some(self.shapes[count as usize - 1]),
            _ => None,
        }
    }

    /// `"SET A (Default)"`.
    pub fn status_label(&self) -> String {
        format!("SET {} ({})", self.key, self.name)
    }

    /// `"#00ff00"`.
    pub fn color_hex(&self) -> String {
        format!("#{:06x}", self.color)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SetRegistry
// ════════════════════════════════════════════════════════════════════════════

/// Ordered, cyclic collection of sets with one active set and shape.
///
/// The active index always points at a real set: construction rejects an
/// empty list, and `activate` leaves state untouched on an unknown key.
#[derive(Clone, Debug)]
pub struct SetRegistry {
    sets:         Vec<SetDescriptor>,
    active:       usize,
    active_shape: ShapeId,
}

impl SetRegistry {
    /// The first set starts active, on its first shape.
    pub fn new(sets: Vec<SetDescriptor>) -> Result<Self, SetError> {
        let first = sets.first().ok_or(SetError::Empty)?.first_shape();
        for (i, set) in sets.iter().enumerate() {
            if sets[..i].iter().any(|s| s.key == set.key) {
                return Err(SetError::DuplicateKey(set.key.clone()));
            }
        }
        Ok(SetRegistry { sets, active: 0, active_shape: first })
    }

    /// Sets A–H: the three classic sets followed by five themed ones.
    pub fn standard() -> Result<Self, SetError> {
        use ShapeId::*;
        SetRegistry::new(vec![
            SetDescriptor::new("A", "Default",  0x00ff00, vec![Heart, Saturn, Flower, Fireworks, Sphere])?,
            SetDescriptor::new("B", "Advanced", 0xffaa00, vec![Helix, Spiral, Cube, Star, Torus])?,
            SetDescriptor::new("C", "Expert",   0xff00ff, vec![Pyramid, Hourglass, Atom, Tornado, Ribbon])?,
            SetDescriptor::new("D", "Knots",    0x33ccff, vec![TrefoilKnot, KleinBottle, Spring, Seashell, Lissajous])?,
            SetDescriptor::new("E", "Crystal",  0x99ffee, vec![VoxelSphere, Crystal, Gear, Crown, Snowflake])?,
            SetDescriptor::new("F", "Nature",   0x66dd44, vec![Mushroom, Tree, Jellyfish, Butterfly, Cloud])?,
            SetDescriptor::new("G", "Lattice",  0x4488ff, vec![GyroidShell, LatticeCube, Lantern, Sponge, Cage])?,
            SetDescriptor::new("H", "Twins",    0xff5566, vec![TwinFlames, MirrorPair, DoubleTorus, TripleHelix, BinaryGalaxy])?,
        ])
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn sets(&self) -> &[SetDescriptor] {
        &self.sets
    }

    pub fn get(&self, key: &str) -> Option<&SetDescriptor> {
        self.sets.iter().find(|s| s.key == key)
    }

    pub fn active(&self) -> &SetDescriptor {
        &self.sets[self.active]
    }

    pub fn active_key(&self) -> &str {
        &self.sets[self.active].key
    }

    /// Position of the active set in insertion order.
    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_shape(&self) -> ShapeId {
        self.active_shape
    }

    /// Make `key` active and force its first shape, which is returned.
    pub fn activate(&mut self, key: &str) -> Result<ShapeId, SetError> {
        let index = self
            .sets
            .iter()
            .position(|s| s.key == key)
            .ok_or_else(|| SetError::UnknownKey(key.to_string()))?;
        Ok(self.enter(index))
    }

    /// Advance cyclically to the following set.
    pub fn next(&mut self) -> ShapeId {
        let index = (self.active + 1) % self.sets.len();
        self.enter(index)
    }

    /// Step cyclically back to the preceding set.
    pub fn prev(&mut self) -> ShapeId {
        let n = self.sets.len();
        let index = (self.active + n - 1) % n;
        self.enter(index)
    }

    /// `None` for an unknown key or a count outside `1..=5`.
    pub fn shape_for_finger_count(&self, key: &str, count: u8) -> Option<ShapeId> {
        self.get(key)?.shape_for(count)
    }

    /// Apply a finger-count signal to the active set.  Returns the new shape
    /// only when it differs from the active one.
    pub fn select_finger_count(&mut self, count: u8) -> Option<ShapeId> {
        let shape = self.active().shape_for(count)?;
        if shape == self.active_shape {
            return None;
        }
        debug!("finger count {} selects '{}'", count, shape);
        self.active_shape = shape;
        Some(shape)
    }

    fn enter(&mut self, index: usize) -> ShapeId {
        self.active = index;
        self.active_shape = self.sets[index].first_shape();
        debug!("{} active, shape '{}'", self.sets[index].status_label(), self.active_shape);
        self.active_shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SetRegistry {
        SetRegistry::standard().unwrap()
    }

    #[test]
    fn standard_sets_cover_every_shape_once() {
        let reg = registry();
        let mut seen: Vec<ShapeId> = reg.sets().iter().flat_map(|s| s.shapes().iter().copied()).collect();
        seen.sort();
        assert_eq!(seen, ShapeId::ALL.to_vec());
    }

    #[test]
    fn descriptor_rejects_wrong_shape_count() {
        let err = SetDescriptor::new("X", "Short", 0, vec![ShapeId::Heart]).unwrap_err();
        assert_eq!(err, SetError::WrongShapeCount { key: "X".into(), got: 1 });
    }

    #[test]
    fn registry_rejects_empty_and_duplicates() {
        assert_eq!(SetRegistry::new(vec![]).unwrap_err(), SetError::Empty);
        let a = registry().get("A").unwrap().clone();
        assert_eq!(
            SetRegistry::new(vec![a.clone(), a]).unwrap_err(),
            SetError::DuplicateKey("A".into())
        );
    }

    #[test]
    fn finger_count_three_in_a_is_third_entry() {
        let mut reg = registry();
        assert_eq!(reg.shape_for_finger_count("A", 3), Some(ShapeId::Flower));
        assert_eq!(reg.select_finger_count(3), Some(ShapeId::Flower));
        assert_eq!(reg.active_shape(), ShapeId::Flower);
    }

    #[test]
    fn finger_count_outside_range_is_none() {
        let reg = registry();
        assert_eq!(reg.shape_for_finger_count("A", 0), None);
        assert_eq!(reg.shape_for_finger_count("A", 6), None);
        assert_eq!(reg.shape_for_finger_count("Z", 1), None);
    }

    #[test]
    fn repeated_signal_selects_nothing() {
        let mut reg = registry();
        assert_eq!(reg.select_finger_count(1), None); // already on heart
        assert_eq!(reg.select_finger_count(2), Some(ShapeId::Saturn));
        assert_eq!(reg.select_finger_count(2), None);
    }

    #[test]
    fn activate_a_then_next_is_b_first_shape() {
        let mut reg = registry();
        reg.select_finger_count(4);
        assert_eq!(reg.activate("A").unwrap(), ShapeId::Heart);
        assert_eq!(reg.next(), ShapeId::Helix);
        assert_eq!(reg.active_key(), "B");
        assert_eq!(reg.active_shape(), ShapeId::Helix);
    }

    #[test]
    fn next_len_times_returns_home() {
        let mut reg = registry();
        for start in ["A", "C", "H"] {
            reg.activate(start).unwrap();
            for _ in 0..reg.len() {
                reg.next();
            }
            assert_eq!(reg.active_key(), start);
        }
    }

    #[test]
    fn prev_wraps_to_last() {
        let mut reg = registry();
        assert_eq!(reg.prev(), ShapeId::TwinFlames);
        assert_eq!(reg.active_key(), "H");
        reg.next();
        assert_eq!(reg.active_key(), "A");
    }

    #[test]
    fn unknown_key_leaves_state_unchanged() {
        let mut reg = registry();
        reg.activate("C").unwrap();
        reg.select_finger_count(5);
        assert_eq!(reg.activate("Q"), Err(SetError::UnknownKey("Q".into())));
        assert_eq!(reg.active_key(), "C");
        assert_eq!(reg.active_shape(), ShapeId::Ribbon);
    }

    #[test]
    fn status_label_and_colour() {
        let reg = registry();
        let a = reg.get("A").unwrap();
        assert_eq!(a.status_label(), "SET A (Default)");
        assert_eq!(a.color_hex(), "#00ff00");
        assert_eq!(reg.get("C").unwrap().status_label(), "SET C (Expert)");
    }
}
