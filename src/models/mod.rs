//! Domain models for dropforge.
//!
//! # Core Concepts
//!
//! - [`Project`]: Top-level tenant container; everything below is scoped
//!   by project id.
//! - [`Collection`]: One NFT drop within a project, owning a trait catalog
//!   and uploaded artwork.
//! - [`ImageLayer`]: One uploaded artwork asset, optionally tagged with a
//!   (trait, trait value) pair.
//! - [`Trait`] / [`TraitValue`]: Read-only catalog entries describing the
//!   classification axes for a collection's artwork.

mod collection;
mod image_layer;
mod project;
mod trait_def;

pub use collection::*;
pub use image_layer::*;
pub use project::*;
pub use trait_def::*;
