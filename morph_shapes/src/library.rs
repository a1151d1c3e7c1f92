//! The dispatch table from [`ShapeId`] to generator.

use std::collections::HashMap;
use std::fmt;

use log::debug;

use crate::catalog::{self, Generator, Particle, ParticleDraw};
use crate::random::RandomSource;
use crate::shape_id::ShapeId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeError {
    /// The id is valid but no generator was registered for it.
    Unregistered(ShapeId),
    /// A name that matches no [`ShapeId`].
    UnknownName(String),
    /// A cloud must hold at least one particle.
    NoParticles,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::Unregistered(id) => write!(f, "no generator registered for shape '{}'", id),
            ShapeError::UnknownName(s)   => write!(f, "unknown shape name '{}'", s),
            ShapeError::NoParticles      => write!(f, "particle count must be at least 1"),
        }
    }
}

impl std::error::Error for ShapeError {}

/// Map from every shape id to its generator.
///
/// [`ShapeLibrary::standard`] validates completeness once at construction,
/// so later lookups on a standard library cannot fail.
#[derive(Clone, Default)]
pub struct ShapeLibrary {
    generators: HashMap<ShapeId, Generator>,
}

impl ShapeLibrary {
    pub fn empty() -> Self {
        ShapeLibrary { generators: HashMap::new() }
    }

    /// The full catalogue, checked for completeness.
    pub fn standard() -> Result<Self, ShapeError> {
        let mut library = ShapeLibrary::empty();
        catalog::register_standard(&mut library);
        library.validate()?;
        debug!("shape library ready with {} generators", library.len());
        Ok(library)
    }

    /// Install (or replace) the generator for `id`.
    pub fn register(&mut self, id: ShapeId, generator: Generator) -> &mut Self {
        self.generators.insert(id, generator);
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, id: ShapeId, generator: Generator) -> Self {
        self.register(id, generator);
        self
    }

    /// `Err` naming the first id (in catalogue order) with no generator.
    pub fn validate(&self) -> Result<(), ShapeError> {
        match ShapeId::ALL.iter().find(|id| !self.generators.contains_key(id)) {
            Some(&missing) => Err(ShapeError::Unregistered(missing)),
            None => Ok(()),
        }
    }

    pub fn generator(&self, id: ShapeId) -> Result<Generator, ShapeError> {
        self.generators.get(&id).copied().ok_or(ShapeError::Unregistered(id))
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.generators.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Generate a single particle; mostly useful for previews and tests.
    pub fn sample(
        &self,
        id: ShapeId,
        i: usize,
        n: usize,
        rng: &mut dyn RandomSource,
    ) -> Result<Particle, ShapeError> {
        let generator = self.generator(id)?;
        Ok(generator(&mut ParticleDraw::new(i, n, rng)))
    }
}

impl fmt::Debug for ShapeLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.generators.keys().copied().collect();
        ids.sort();
        f.debug_struct("ShapeLibrary").field("shapes", &ids).finish()
    }
}
