use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named classification axis for artwork within a collection,
/// e.g. "Background".
///
/// Traits are catalog entries: the artwork page reads them but never
/// mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trait {
    pub id: Uuid,
    pub project_id: Uuid,
    pub collection_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A named value under exactly one trait, e.g. "Blue" under "Background".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitValue {
    pub id: Uuid,
    pub trait_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new trait.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTraitInput {
    pub name: String,
}

/// Input for creating a new trait value under a trait.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTraitValueInput {
    pub name: String,
}
