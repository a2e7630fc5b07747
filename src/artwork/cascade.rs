//! Cascading trait selection.
//!
//! Choosing a trait and choosing a trait value are two independent user
//! actions backed by two field-level persistence calls, not one atomic
//! write. The value selector shown for an image layer is rebuilt purely
//! from a trait→values map materialized once at page load, so changing the
//! trait costs no catalog round trip.

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AssociationStore, TraitCatalog};
use crate::models::{ImageLayer, TraitValue, UpdateImageLayerInput};

/// One entry in a selector. `id: None` is the unassigned option, rendered
/// with an empty label and always offered first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorOption {
    pub id: Option<Uuid>,
    pub name: String,
}

impl SelectorOption {
    pub fn unassigned() -> Self {
        Self {
            id: None,
            name: String::new(),
        }
    }
}

/// Trait-value options for a layer whose selected trait is `trait_id`.
///
/// Pure lookup against the precomputed map: no trait selected or a trait
/// absent from the map both degrade to the unassigned option alone. The
/// values keep catalog order.
pub fn value_options(
    values_by_trait: &HashMap<Uuid, Vec<TraitValue>>,
    trait_id: Option<Uuid>,
) -> Vec<SelectorOption> {
    let mut options = vec![SelectorOption::unassigned()];

    if let Some(values) = trait_id.and_then(|id| values_by_trait.get(&id)) {
        options.extend(values.iter().map(|value| SelectorOption {
            id: Some(value.id),
            name: value.name.clone(),
        }));
    }

    options
}

/// Mediates between the page's transient trait selections and the
/// association store for one collection.
///
/// The controller owns no persistent state. It persists each selection as
/// it is made and owns the rendering of the trait-value option set; it
/// never re-validates that the persisted value still belongs to the
/// persisted trait, because the rebuilt selector only ever offers legal
/// values. A caller bypassing the selector can write a foreign value pair
/// and the store accepts it unchecked.
pub struct CascadeController {
    project_id: Uuid,
    collection_id: Uuid,
    values_by_trait: HashMap<Uuid, Vec<TraitValue>>,
}

impl CascadeController {
    pub fn new(
        project_id: Uuid,
        collection_id: Uuid,
        values_by_trait: HashMap<Uuid, Vec<TraitValue>>,
    ) -> Self {
        Self {
            project_id,
            collection_id,
            values_by_trait,
        }
    }

    /// Eagerly materializes the trait→values map from the catalog, one
    /// lookup per trait.
    pub fn from_catalog<C: TraitCatalog>(
        catalog: &C,
        project_id: Uuid,
        collection_id: Uuid,
    ) -> Result<Self> {
        let traits = catalog.list_traits(project_id, collection_id)?;

        let mut values_by_trait = HashMap::new();
        for trait_def in &traits {
            let values = catalog.list_trait_values(project_id, collection_id, trait_def.id)?;
            values_by_trait.insert(trait_def.id, values);
        }

        Ok(Self::new(project_id, collection_id, values_by_trait))
    }

    /// Options for a layer's value selector at initial render, derived from
    /// its persisted `trait_id`.
    pub fn initial_options(&self, layer: &ImageLayer) -> Vec<SelectorOption> {
        value_options(&self.values_by_trait, layer.trait_id)
    }

    /// Persists a trait choice for an image layer and rebuilds its value
    /// selector.
    ///
    /// Only `trait_id` is written; whatever `trait_value_id` the store holds
    /// is left untouched. The returned options replace the layer's previous
    /// option set entirely. A persistence failure is logged and otherwise
    /// swallowed; the rebuilt options come back regardless so the selector
    /// never shows values foreign to the chosen trait.
    pub fn select_trait<S: AssociationStore>(
        &self,
        store: &S,
        image_layer_id: Uuid,
        trait_id: Uuid,
    ) -> Vec<SelectorOption> {
        let update = UpdateImageLayerInput {
            trait_id: Some(trait_id),
            trait_value_id: None,
        };

        if let Err(e) = store.update_image_layer(
            self.project_id,
            self.collection_id,
            image_layer_id,
            update,
        ) {
            tracing::error!("Failed to persist trait for image layer {image_layer_id}: {e}");
        }

        if !self.values_by_trait.contains_key(&trait_id) {
            tracing::warn!("Trait {trait_id} missing from trait-value map");
        }

        value_options(&self.values_by_trait, Some(trait_id))
    }

    /// Persists a trait-value choice for an image layer. No selector
    /// rebuild; failures are logged only.
    pub fn select_trait_value<S: AssociationStore>(
        &self,
        store: &S,
        image_layer_id: Uuid,
        trait_value_id: Uuid,
    ) {
        let update = UpdateImageLayerInput {
            trait_id: None,
            trait_value_id: Some(trait_value_id),
        };

        if let Err(e) = store.update_image_layer(
            self.project_id,
            self.collection_id,
            image_layer_id,
            update,
        ) {
            tracing::error!("Failed to persist trait value for image layer {image_layer_id}: {e}");
        }
    }
}
