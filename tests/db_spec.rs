use dropforge::db::Database;
use dropforge::models::*;
use speculate2::speculate;
use uuid::Uuid;

fn create_test_project(db: &Database) -> Project {
    db.create_project(CreateProjectInput {
        name: "Test Project".to_string(),
    })
    .expect("Failed to create project")
}

fn create_test_collection(db: &Database, project_id: Uuid) -> Collection {
    db.create_collection(
        project_id,
        CreateCollectionInput {
            name: "Test Collection".to_string(),
        },
    )
    .expect("Failed to create collection")
}

fn create_test_layer(db: &Database, project_id: Uuid, collection_id: Uuid, name: &str) -> ImageLayer {
    db.create_image_layer(
        project_id,
        collection_id,
        CreateImageLayerInput {
            name: name.to_string(),
            url: format!("https://cdn.example/{name}"),
            bytes: 1024,
        },
    )
    .expect("Failed to create image layer")
}

#[test]
fn persists_across_reopen_of_the_same_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("dropforge.db");

    let first = Database::open(path.clone()).expect("Failed to open database");
    first.migrate().expect("Failed to migrate");
    let project = create_test_project(&first);
    drop(first);

    let second = Database::open(path).expect("Failed to reopen database");
    second.migrate().expect("Failed to migrate");
    let found = second.get_project(project.id).expect("Query failed");
    assert_eq!(found.unwrap().name, "Test Project");
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "projects" {
        it "creates a project and finds it by id" {
            let project = db.create_project(CreateProjectInput {
                name: "My Drop".to_string(),
            }).expect("Failed to create project");

            let found = db.get_project(project.id).expect("Query failed");
            assert_eq!(found.unwrap().name, "My Drop");
        }

        it "returns None for a non-existent project" {
            let result = db.get_project(Uuid::new_v4()).expect("Query failed");
            assert!(result.is_none());
        }

        it "returns all projects ordered by name" {
            db.create_project(CreateProjectInput { name: "Zebra".to_string() })
                .expect("Failed to create");
            db.create_project(CreateProjectInput { name: "Alpha".to_string() })
                .expect("Failed to create");

            let projects = db.get_all_projects().expect("Query failed");
            assert_eq!(projects.len(), 2);
            assert_eq!(projects[0].name, "Alpha");
            assert_eq!(projects[1].name, "Zebra");
        }
    }

    describe "collections" {
        it "scopes the lookup by project id" {
            let project = create_test_project(&db);
            let other = db.create_project(CreateProjectInput {
                name: "Other".to_string(),
            }).expect("Failed to create");
            let collection = create_test_collection(&db, project.id);

            assert!(db.get_collection(project.id, collection.id).expect("Query failed").is_some());
            assert!(db.get_collection(other.id, collection.id).expect("Query failed").is_none());
        }

        it "rejects a collection for an unknown project" {
            let result = db.create_collection(Uuid::new_v4(), CreateCollectionInput {
                name: "Orphan".to_string(),
            });
            assert!(result.is_err());
        }
    }

    describe "trait_catalog" {
        it "returns traits ordered by name" {
            let project = create_test_project(&db);
            let collection = create_test_collection(&db, project.id);

            db.create_trait(project.id, collection.id, CreateTraitInput {
                name: "Eyes".to_string(),
            }).expect("Failed to create trait");
            db.create_trait(project.id, collection.id, CreateTraitInput {
                name: "Background".to_string(),
            }).expect("Failed to create trait");

            let traits = db.get_traits(project.id, collection.id).expect("Query failed");
            assert_eq!(traits.len(), 2);
            assert_eq!(traits[0].name, "Background");
            assert_eq!(traits[1].name, "Eyes");
        }

        it "returns trait values ordered by name" {
            let project = create_test_project(&db);
            let collection = create_test_collection(&db, project.id);
            let background = db.create_trait(project.id, collection.id, CreateTraitInput {
                name: "Background".to_string(),
            }).expect("Failed to create trait");

            db.create_trait_value(project.id, collection.id, background.id, CreateTraitValueInput {
                name: "Red".to_string(),
            }).expect("Failed to create value");
            db.create_trait_value(project.id, collection.id, background.id, CreateTraitValueInput {
                name: "Blue".to_string(),
            }).expect("Failed to create value");

            let values = db.get_trait_values(project.id, collection.id, background.id)
                .expect("Query failed");
            assert_eq!(values.len(), 2);
            assert_eq!(values[0].name, "Blue");
            assert_eq!(values[1].name, "Red");
        }

        it "returns no values for a trait outside the collection" {
            let project = create_test_project(&db);
            let collection = create_test_collection(&db, project.id);
            let other_collection = create_test_collection(&db, project.id);
            let background = db.create_trait(project.id, collection.id, CreateTraitInput {
                name: "Background".to_string(),
            }).expect("Failed to create trait");
            db.create_trait_value(project.id, collection.id, background.id, CreateTraitValueInput {
                name: "Blue".to_string(),
            }).expect("Failed to create value");

            let values = db.get_trait_values(project.id, other_collection.id, background.id)
                .expect("Query failed");
            assert!(values.is_empty());
        }

        it "rejects a trait value for an unknown trait" {
            let project = create_test_project(&db);
            let collection = create_test_collection(&db, project.id);

            let result = db.create_trait_value(project.id, collection.id, Uuid::new_v4(),
                CreateTraitValueInput { name: "Blue".to_string() });
            assert!(result.is_err());
        }
    }

    describe "image_layers" {
        it "creates a layer untagged" {
            let project = create_test_project(&db);
            let collection = create_test_collection(&db, project.id);

            let layer = create_test_layer(&db, project.id, collection.id, "background.png");

            assert!(layer.trait_id.is_none());
            assert!(layer.trait_value_id.is_none());
            assert_eq!(layer.bytes, 1024);
        }

        it "lists layers ordered by name" {
            let project = create_test_project(&db);
            let collection = create_test_collection(&db, project.id);
            create_test_layer(&db, project.id, collection.id, "zebra.png");
            create_test_layer(&db, project.id, collection.id, "alpha.png");

            let layers = db.get_image_layers(project.id, collection.id).expect("Query failed");
            assert_eq!(layers.len(), 2);
            assert_eq!(layers[0].name, "alpha.png");
            assert_eq!(layers[1].name, "zebra.png");
        }

        describe "update_image_layer" {
            it "updates the trait without touching the trait value" {
                let project = create_test_project(&db);
                let collection = create_test_collection(&db, project.id);
                let layer = create_test_layer(&db, project.id, collection.id, "a.png");
                let trait_id = Uuid::new_v4();
                let value_id = Uuid::new_v4();

                db.update_image_layer(project.id, collection.id, layer.id, UpdateImageLayerInput {
                    trait_id: None,
                    trait_value_id: Some(value_id),
                }).expect("Update failed");
                db.update_image_layer(project.id, collection.id, layer.id, UpdateImageLayerInput {
                    trait_id: Some(trait_id),
                    trait_value_id: None,
                }).expect("Update failed");

                let stored = db.get_image_layer(project.id, collection.id, layer.id)
                    .expect("Query failed").unwrap();
                assert_eq!(stored.trait_id, Some(trait_id));
                // Field-level update: the previously stored value survives
                assert_eq!(stored.trait_value_id, Some(value_id));
            }

            it "returns false when no fields are given" {
                let project = create_test_project(&db);
                let collection = create_test_collection(&db, project.id);
                let layer = create_test_layer(&db, project.id, collection.id, "a.png");

                let updated = db.update_image_layer(
                    project.id, collection.id, layer.id, UpdateImageLayerInput::default(),
                ).expect("Update failed");
                assert!(!updated);
            }

            it "does not touch a layer in another collection" {
                let project = create_test_project(&db);
                let collection = create_test_collection(&db, project.id);
                let other_collection = create_test_collection(&db, project.id);
                let layer = create_test_layer(&db, project.id, collection.id, "a.png");

                let updated = db.update_image_layer(
                    project.id, other_collection.id, layer.id,
                    UpdateImageLayerInput { trait_id: Some(Uuid::new_v4()), trait_value_id: None },
                ).expect("Update failed");
                assert!(!updated);

                let stored = db.get_image_layer(project.id, collection.id, layer.id)
                    .expect("Query failed").unwrap();
                assert!(stored.trait_id.is_none());
            }
        }

        describe "delete_image_layer" {
            it "removes only the addressed layer" {
                let project = create_test_project(&db);
                let collection = create_test_collection(&db, project.id);
                let doomed = create_test_layer(&db, project.id, collection.id, "doomed.png");
                let kept = create_test_layer(&db, project.id, collection.id, "kept.png");

                let removed = db.delete_image_layer(project.id, collection.id, doomed.id)
                    .expect("Delete failed");
                assert!(removed);

                let layers = db.get_image_layers(project.id, collection.id).expect("Query failed");
                assert_eq!(layers.len(), 1);
                assert_eq!(layers[0].id, kept.id);
            }

            it "returns false for a layer outside the composite key" {
                let project = create_test_project(&db);
                let collection = create_test_collection(&db, project.id);
                let other_collection = create_test_collection(&db, project.id);
                let layer = create_test_layer(&db, project.id, collection.id, "a.png");

                let removed = db.delete_image_layer(project.id, other_collection.id, layer.id)
                    .expect("Delete failed");
                assert!(!removed);
                assert!(db.get_image_layer(project.id, collection.id, layer.id)
                    .expect("Query failed").is_some());
            }
        }
    }
}
