//! # morph_shapes
//!
//! Target point clouds for the morphing particle display.  Every named
//! [`ShapeId`] maps to one generator function that places a single particle
//! and picks its colour; a [`ShapeLibrary`] is the dispatch table from ids to
//! generators, and a [`TargetCloud`] holds the N target positions and colours
//! the animator eases toward.
//!
//! Generation is **stochastic**: each particle draws fresh uniforms from an
//! injected [`RandomSource`].  Regenerating a shape yields a cloud with the
//! same statistics but different coordinates.  Tests swap in
//! [`RngSource::seeded`] or [`SequenceSource`] for reproducibility.
//!
//! ## Quick start
//!
//! ```rust
//! use morph_shapes::{RngSource, ShapeId, ShapeLibrary, TargetCloud};
//!
//! let library   = ShapeLibrary::standard().unwrap();
//! let mut rng   = RngSource::seeded(7);
//! let mut cloud = TargetCloud::new(2_000).unwrap();
//!
//! cloud.regenerate(&library, ShapeId::Saturn, &mut rng).unwrap();
//! assert_eq!(cloud.len(), 2_000);
//! assert_eq!(cloud.shape(), Some(ShapeId::Saturn));
//! ```
//!
//! ## Techniques
//!
//! The catalogue is built almost entirely from the primitives in
//! [`technique`]:
//!
//! | Technique | Example shapes |
//! |---|---|
//! | Uniform sphere sampling | sphere, star, atom nucleus |
//! | Multi-region composition | saturn, atom, mushroom, jellyfish |
//! | Parametric surfaces and curves | torus, ribbon, trefoil knot, Klein bottle |
//! | Radial / angular modulation | flower, gear, crown |
//! | Volume vs surface fill | cube, pyramid, hourglass vs sphere |
//! | Lattice quantization | voxel sphere, crystal, lattice cube |
//! | Subtractive masking | gyroid shell, sponge, lantern |
//! | Index parity / modulo strands | helix, triple helix, twin flames |
//! | Symmetry folding | snowflake |
//! | Noise perturbation | cloud, tree canopy, mushroom spots |

pub mod shape_id;
pub mod random;
pub mod color;
pub mod technique;
pub mod catalog;
pub mod library;
pub mod cloud;

pub use shape_id::ShapeId;
pub use random::{RandomSource, RngSource, SequenceSource};
pub use color::{Hsl, Rgb, pack_argb};
pub use catalog::{Generator, Particle, ParticleDraw};
pub use library::{ShapeError, ShapeLibrary};
pub use cloud::TargetCloud;
