//! The live target buffer: N positions and colours for the active shape,
//! refilled in place on every shape change.

use glam::Vec3;
use log::debug;

use crate::catalog::ParticleDraw;
use crate::color::Rgb;
use crate::library::{ShapeError, ShapeLibrary};
use crate::random::RandomSource;
use crate::shape_id::ShapeId;

/// The N target positions and colours the animator eases toward.
///
/// The length is fixed at construction; [`regenerate`](Self::regenerate)
/// overwrites every slot in place.
#[derive(Clone, Debug)]
pub struct TargetCloud {
    positions:  Vec<Vec3>,
    colors:     Vec<Rgb>,
    shape:      Option<ShapeId>,
    generation: u64,
}

impl TargetCloud {
    /// All targets start at the origin, white, with no shape.
    pub fn new(count: usize) -> Result<Self, ShapeError> {
        if count == 0 {
            return Err(ShapeError::NoParticles);
        }
        Ok(TargetCloud {
            positions:  vec![Vec3::ZERO; count],
            colors:     vec![[1.0; 3]; count],
            shape:      None,
            generation: 0,
        })
    }

    /// Fill every slot with a fresh sample of `id`.
    ///
    /// The generator is resolved before any slot is touched, so on error the
    /// cloud is unchanged.
    pub fn regenerate(
        &mut self,
        library: &ShapeLibrary,
        id: ShapeId,
        rng: &mut dyn RandomSource,
    ) -> Result<(), ShapeError> {
        let generator = library.generator(id)?;
        let n = self.positions.len();
        for i in 0..n {
            let p = generator(&mut ParticleDraw::new(i, n, &mut *rng));
            self.positions[i] = p.position;
            self.colors[i] = p.color;
        }
        self.shape = Some(id);
        self.generation += 1;
        debug!("regenerated {} targets as '{}' (generation {})", n, id, self.generation);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// The shape most recently generated, if any.
    pub fn shape(&self) -> Option<ShapeId> {
        self.shape
    }

    /// Bumped by every successful regeneration.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Mean distance of the targets from the origin.
    pub fn mean_radius(&self) -> f32 {
        let total: f32 = self.positions.iter().map(|p| p.length()).sum();
        total / self.positions.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RngSource;

    #[test]
    fn zero_count_is_rejected() {
        assert_eq!(TargetCloud::new(0).err(), Some(ShapeError::NoParticles));
    }

    #[test]
    fn regenerate_fills_every_slot() {
        let library = ShapeLibrary::standard().unwrap();
        let mut rng = RngSource::seeded(11);
        let mut cloud = TargetCloud::new(500).unwrap();
        cloud.regenerate(&library, ShapeId::Sphere, &mut rng).unwrap();
        assert_eq!(cloud.len(), 500);
        assert!(cloud.positions().iter().all(|p| (p.length() - 12.0).abs() < 1e-3));
        assert_eq!(cloud.generation(), 1);
    }

    #[test]
    fn regenerating_same_shape_differs_but_matches_statistics() {
        let library = ShapeLibrary::standard().unwrap();
        let mut rng = RngSource::seeded(12);
        let mut cloud = TargetCloud::new(4_000).unwrap();

        cloud.regenerate(&library, ShapeId::Heart, &mut rng).unwrap();
        let first = cloud.positions().to_vec();
        let first_radius = cloud.mean_radius();

        cloud.regenerate(&library, ShapeId::Heart, &mut rng).unwrap();
        assert_eq!(cloud.len(), first.len());
        assert_ne!(cloud.positions(), &first[..]);
        let drift = (cloud.mean_radius() - first_radius).abs() / first_radius;
        assert!(drift < 0.05, "mean radius drifted by {:.3}", drift);
    }

    #[test]
    fn failed_regeneration_leaves_cloud_untouched() {
        let library = ShapeLibrary::empty();
        let mut rng = RngSource::seeded(13);
        let mut cloud = TargetCloud::new(10).unwrap();
        let err = cloud.regenerate(&library, ShapeId::Star, &mut rng).unwrap_err();
        assert_eq!(err, ShapeError::Unregistered(ShapeId::Star));
        assert_eq!(cloud.shape(), None);
        assert_eq!(cloud.generation(), 0);
    }

    #[test]
    fn every_shape_fills_a_cloud() {
        let library = ShapeLibrary::standard().unwrap();
        let mut rng = RngSource::seeded(14);
        let mut cloud = TargetCloud::new(300).unwrap();
        for id in ShapeId::ALL {
            cloud.regenerate(&library, id, &mut rng).unwrap();
            assert_eq!(cloud.shape(), Some(id));
            assert!(cloud.positions().iter().all(|p| p.is_finite()));
        }
    }
}
