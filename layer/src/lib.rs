//! Per-instance attribute pipeline for rendering sign labels over a
//! geospatial map.
//!
//! Features carry four independently georeferenced corners; each corner's
//! double-precision coordinate is split into an f32 high part plus a
//! low-order correction before it enters the single-precision GPU stage.
//! The atlas from [`placard_atlas`] supplies one texture frame per label,
//! and an accessor-keyed attribute registry recomputes only the buffers
//! whose inputs changed.

mod atlas_texture;
mod attributes;
mod features;
mod fp64;
mod instances;
mod mapping;
mod pipeline;
mod pods;
mod sign_layer;

pub use atlas_texture::*;
pub use attributes::*;
pub use features::*;
pub use fp64::*;
pub use instances::*;
pub use mapping::*;
pub use pipeline::*;
pub use pods::*;
pub use sign_layer::*;
