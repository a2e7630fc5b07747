//! dropforge: a multi-tenant NFT-collection authoring server.
//!
//! Projects contain collections; collections own a trait catalog and a set
//! of uploaded image layers. The [`artwork`] module is the heart of the
//! artwork page: tagging image layers with (trait, trait value) pairs via a
//! cascading selector and deleting them behind a confirmation step. [`db`]
//! is the SQLite-backed store, [`api`] the HTTP surface.

pub mod api;
pub mod artwork;
pub mod db;
pub mod models;
