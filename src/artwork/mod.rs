//! The artwork page core: tagging uploaded image layers with traits and
//! deleting them.
//!
//! Three pieces cooperate here:
//!
//! - [`cascade`]: keeps an image layer's trait-value choices consistent with
//!   its selected trait, rebuilding the value selector from a map computed
//!   once at page load.
//! - [`confirm`]: the two-step confirm/cancel state machine guarding image
//!   layer deletion.
//! - [`page`]: assembles the per-request data snapshot the page renders from
//!   and classifies it as not-found, empty, or a populated grid.
//!
//! The page talks to persistence through the [`AssociationStore`] and
//! [`TraitCatalog`] seams, both implemented by [`Database`].

pub mod cascade;
pub mod confirm;
pub mod page;

pub use cascade::{value_options, CascadeController, SelectorOption};
pub use confirm::{DeleteState, DeleteWorkflow};
pub use page::{load_page_props, ArtworkPageProps, ArtworkPageResponse, PageState};

use anyhow::Result;
use uuid::Uuid;

use crate::db::Database;
use crate::models::{ImageLayer, Trait, TraitValue, UpdateImageLayerInput};

/// The durable record per image layer, addressed by
/// (project, collection, image layer).
///
/// Updates are field-level: input fields left unset are unchanged in the
/// store. `update` and `remove` report whether a record was touched; the
/// page core treats both outcomes the same and only logs misses.
pub trait AssociationStore {
    fn list_image_layers(&self, project_id: Uuid, collection_id: Uuid) -> Result<Vec<ImageLayer>>;

    fn update_image_layer(
        &self,
        project_id: Uuid,
        collection_id: Uuid,
        image_layer_id: Uuid,
        input: UpdateImageLayerInput,
    ) -> Result<bool>;

    fn remove_image_layer(
        &self,
        project_id: Uuid,
        collection_id: Uuid,
        image_layer_id: Uuid,
    ) -> Result<bool>;
}

/// Read-only catalog of traits and their values for a collection,
/// name-ordered.
pub trait TraitCatalog {
    fn list_traits(&self, project_id: Uuid, collection_id: Uuid) -> Result<Vec<Trait>>;

    fn list_trait_values(
        &self,
        project_id: Uuid,
        collection_id: Uuid,
        trait_id: Uuid,
    ) -> Result<Vec<TraitValue>>;
}

impl AssociationStore for Database {
    fn list_image_layers(&self, project_id: Uuid, collection_id: Uuid) -> Result<Vec<ImageLayer>> {
        self.get_image_layers(project_id, collection_id)
    }

    fn update_image_layer(
        &self,
        project_id: Uuid,
        collection_id: Uuid,
        image_layer_id: Uuid,
        input: UpdateImageLayerInput,
    ) -> Result<bool> {
        Database::update_image_layer(self, project_id, collection_id, image_layer_id, input)
    }

    fn remove_image_layer(
        &self,
        project_id: Uuid,
        collection_id: Uuid,
        image_layer_id: Uuid,
    ) -> Result<bool> {
        self.delete_image_layer(project_id, collection_id, image_layer_id)
    }
}

impl TraitCatalog for Database {
    fn list_traits(&self, project_id: Uuid, collection_id: Uuid) -> Result<Vec<Trait>> {
        self.get_traits(project_id, collection_id)
    }

    fn list_trait_values(
        &self,
        project_id: Uuid,
        collection_id: Uuid,
        trait_id: Uuid,
    ) -> Result<Vec<TraitValue>> {
        self.get_trait_values(project_id, collection_id, trait_id)
    }
}
