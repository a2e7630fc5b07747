//! Per-request data snapshot for the artwork page.
//!
//! Everything the page renders is fetched once up front: the project list
//! for the chrome, the collection, its image layers, the name-ordered trait
//! catalog, and the trait→values map the cascade rebuilds selectors from.
//! Later interactions go back to the store; the snapshot itself is never
//! patched in place, a mutation that must show up in the list is followed
//! by a full reload.

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cascade::{value_options, SelectorOption};
use crate::db::Database;
use crate::models::{Collection, ImageLayer, Project, Trait, TraitValue};

/// How the page renders for a given snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    /// The collection did not resolve. Nothing else is shown.
    NotFound,
    /// The collection exists but holds no artwork; show the upload
    /// call-to-action.
    Empty,
    /// One card per image layer.
    Grid,
}

/// The full data snapshot handed to the page renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtworkPageProps {
    pub project: Option<Project>,
    pub projects: Vec<Project>,
    pub collection: Option<Collection>,
    pub image_layers: Vec<ImageLayer>,
    pub traits: Vec<Trait>,
    /// Trait id → its values in catalog order, materialized eagerly so
    /// trait changes never re-query the catalog.
    pub trait_values: HashMap<Uuid, Vec<TraitValue>>,
    /// Image layer id → the trait-value options its selector offers at
    /// initial render.
    pub selectors: HashMap<Uuid, Vec<SelectorOption>>,
}

impl ArtworkPageProps {
    /// The render-nothing snapshot: used when the route ids are unusable or
    /// the initial fetch fails.
    pub fn empty() -> Self {
        Self {
            project: None,
            projects: Vec::new(),
            collection: None,
            image_layers: Vec::new(),
            traits: Vec::new(),
            trait_values: HashMap::new(),
            selectors: HashMap::new(),
        }
    }

    pub fn state(&self) -> PageState {
        if self.collection.is_none() {
            PageState::NotFound
        } else if self.image_layers.is_empty() {
            PageState::Empty
        } else {
            PageState::Grid
        }
    }
}

/// Props plus their classification, as served to the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtworkPageResponse {
    pub state: PageState,
    #[serde(flatten)]
    pub props: ArtworkPageProps,
}

impl From<ArtworkPageProps> for ArtworkPageResponse {
    fn from(props: ArtworkPageProps) -> Self {
        Self {
            state: props.state(),
            props,
        }
    }
}

/// Fetches the page snapshot. Any failure during the load is contained
/// here: it is logged and the page falls back to the empty snapshot rather
/// than propagating a fault.
pub fn load_page_props(db: &Database, project_id: Uuid, collection_id: Uuid) -> ArtworkPageProps {
    match try_load(db, project_id, collection_id) {
        Ok(props) => props,
        Err(e) => {
            tracing::error!("Failed to load artwork page data: {e}");
            ArtworkPageProps::empty()
        }
    }
}

fn try_load(db: &Database, project_id: Uuid, collection_id: Uuid) -> Result<ArtworkPageProps> {
    let projects = db.get_all_projects()?;
    let project = projects.iter().find(|p| p.id == project_id).cloned();

    let Some(collection) = db.get_collection(project_id, collection_id)? else {
        // Not found: render state only, skip the remaining fetches.
        return Ok(ArtworkPageProps {
            project,
            projects,
            ..ArtworkPageProps::empty()
        });
    };

    let image_layers = db.get_image_layers(project_id, collection_id)?;
    let traits = db.get_traits(project_id, collection_id)?;

    let mut trait_values = HashMap::new();
    for trait_def in &traits {
        let values = db.get_trait_values(project_id, collection_id, trait_def.id)?;
        trait_values.insert(trait_def.id, values);
    }

    let selectors = image_layers
        .iter()
        .map(|layer| (layer.id, value_options(&trait_values, layer.trait_id)))
        .collect();

    Ok(ArtworkPageProps {
        project,
        projects,
        collection: Some(collection),
        image_layers,
        traits,
        trait_values,
        selectors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateCollectionInput, CreateImageLayerInput, CreateProjectInput};

    fn seeded_db() -> (Database, Project, Collection) {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        let project = db
            .create_project(CreateProjectInput {
                name: "Drop".to_string(),
            })
            .unwrap();
        let collection = db
            .create_collection(
                project.id,
                CreateCollectionInput {
                    name: "Genesis".to_string(),
                },
            )
            .unwrap();
        (db, project, collection)
    }

    #[test]
    fn test_unknown_collection_renders_not_found() {
        let (db, project, _) = seeded_db();

        let props = load_page_props(&db, project.id, Uuid::new_v4());

        assert_eq!(props.state(), PageState::NotFound);
        assert!(props.image_layers.is_empty());
        // Chrome data still present
        assert_eq!(props.projects.len(), 1);
    }

    #[test]
    fn test_collection_without_artwork_renders_empty_state() {
        let (db, project, collection) = seeded_db();

        let props = load_page_props(&db, project.id, collection.id);

        assert_eq!(props.state(), PageState::Empty);
        assert!(props.collection.is_some());
    }

    #[test]
    fn test_layers_render_as_grid_with_initial_selectors() {
        let (db, project, collection) = seeded_db();
        let layer = db
            .create_image_layer(
                project.id,
                collection.id,
                CreateImageLayerInput {
                    name: "background.png".to_string(),
                    url: "https://cdn.example/background.png".to_string(),
                    bytes: 1024,
                },
            )
            .unwrap();

        let props = load_page_props(&db, project.id, collection.id);

        assert_eq!(props.state(), PageState::Grid);
        // Untagged layer: the selector offers the unassigned option alone
        assert_eq!(props.selectors[&layer.id].len(), 1);
        assert!(props.selectors[&layer.id][0].id.is_none());
    }

    #[test]
    fn test_fetch_failure_falls_back_to_empty_props() {
        // No migrations: every query fails, the page still renders
        let db = Database::open_memory().unwrap();

        let props = load_page_props(&db, Uuid::new_v4(), Uuid::new_v4());

        assert_eq!(props.state(), PageState::NotFound);
        assert!(props.projects.is_empty());
    }
}
