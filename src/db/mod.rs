mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use crate::models::*;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "dropforge")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("dropforge.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Project operations
    // ============================================================

    pub fn get_all_projects(&self) -> Result<Vec<Project>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, name, created_at, updated_at
             FROM projects ORDER BY name",
        )?;

        let projects = stmt
            .query_map([], |row| {
                Ok(Project {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    name: row.get(1)?,
                    created_at: parse_datetime(row.get::<_, String>(2)?),
                    updated_at: parse_datetime(row.get::<_, String>(3)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(projects)
    }

    pub fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, name, created_at, updated_at
             FROM projects WHERE id = ?",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Project {
                id: parse_uuid(row.get::<_, String>(0)?),
                name: row.get(1)?,
                created_at: parse_datetime(row.get::<_, String>(2)?),
                updated_at: parse_datetime(row.get::<_, String>(3)?),
            }))
        } else {
            Ok(None)
        }
    }

    pub fn create_project(&self, input: CreateProjectInput) -> Result<Project> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO projects (id, name, created_at, updated_at)
             VALUES (?, ?, ?, ?)",
            (id.to_string(), &input.name, now.to_rfc3339(), now.to_rfc3339()),
        )?;

        Ok(Project {
            id,
            name: input.name,
            created_at: now,
            updated_at: now,
        })
    }

    // ============================================================
    // Collection operations
    // ============================================================

    pub fn get_collection(&self, project_id: Uuid, id: Uuid) -> Result<Option<Collection>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, project_id, name, created_at, updated_at
             FROM collections WHERE project_id = ? AND id = ?",
        )?;

        let mut rows = stmt.query([project_id.to_string(), id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Collection {
                id: parse_uuid(row.get::<_, String>(0)?),
                project_id: parse_uuid(row.get::<_, String>(1)?),
                name: row.get(2)?,
                created_at: parse_datetime(row.get::<_, String>(3)?),
                updated_at: parse_datetime(row.get::<_, String>(4)?),
            }))
        } else {
            Ok(None)
        }
    }

    pub fn get_collections_by_project(&self, project_id: Uuid) -> Result<Vec<Collection>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, project_id, name, created_at, updated_at
             FROM collections WHERE project_id = ? ORDER BY name",
        )?;

        let collections = stmt
            .query_map([project_id.to_string()], |row| {
                Ok(Collection {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    project_id: parse_uuid(row.get::<_, String>(1)?),
                    name: row.get(2)?,
                    created_at: parse_datetime(row.get::<_, String>(3)?),
                    updated_at: parse_datetime(row.get::<_, String>(4)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(collections)
    }

    pub fn create_collection(
        &self,
        project_id: Uuid,
        input: CreateCollectionInput,
    ) -> Result<Collection> {
        // Verify project exists
        self.get_project(project_id)?
            .ok_or_else(|| anyhow::anyhow!("Project not found"))?;

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO collections (id, project_id, name, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            (
                id.to_string(),
                project_id.to_string(),
                &input.name,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ),
        )?;

        Ok(Collection {
            id,
            project_id,
            name: input.name,
            created_at: now,
            updated_at: now,
        })
    }

    // ============================================================
    // Trait catalog operations
    // ============================================================

    pub fn get_traits(&self, project_id: Uuid, collection_id: Uuid) -> Result<Vec<Trait>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, project_id, collection_id, name, created_at
             FROM traits WHERE project_id = ? AND collection_id = ? ORDER BY name",
        )?;

        let traits = stmt
            .query_map([project_id.to_string(), collection_id.to_string()], |row| {
                Ok(Trait {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    project_id: parse_uuid(row.get::<_, String>(1)?),
                    collection_id: parse_uuid(row.get::<_, String>(2)?),
                    name: row.get(3)?,
                    created_at: parse_datetime(row.get::<_, String>(4)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(traits)
    }

    pub fn get_trait(
        &self,
        project_id: Uuid,
        collection_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Trait>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, project_id, collection_id, name, created_at
             FROM traits WHERE project_id = ? AND collection_id = ? AND id = ?",
        )?;

        let mut rows = stmt.query([
            project_id.to_string(),
            collection_id.to_string(),
            id.to_string(),
        ])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Trait {
                id: parse_uuid(row.get::<_, String>(0)?),
                project_id: parse_uuid(row.get::<_, String>(1)?),
                collection_id: parse_uuid(row.get::<_, String>(2)?),
                name: row.get(3)?,
                created_at: parse_datetime(row.get::<_, String>(4)?),
            }))
        } else {
            Ok(None)
        }
    }

    pub fn create_trait(
        &self,
        project_id: Uuid,
        collection_id: Uuid,
        input: CreateTraitInput,
    ) -> Result<Trait> {
        // Verify collection exists
        self.get_collection(project_id, collection_id)?
            .ok_or_else(|| anyhow::anyhow!("Collection not found"))?;

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO traits (id, project_id, collection_id, name, created_at)
             VALUES (?, ?, ?, ?, ?)",
            (
                id.to_string(),
                project_id.to_string(),
                collection_id.to_string(),
                &input.name,
                now.to_rfc3339(),
            ),
        )?;

        Ok(Trait {
            id,
            project_id,
            collection_id,
            name: input.name,
            created_at: now,
        })
    }

    pub fn get_trait_values(
        &self,
        project_id: Uuid,
        collection_id: Uuid,
        trait_id: Uuid,
    ) -> Result<Vec<TraitValue>> {
        // The trait lookup scopes the query to the collection; values hang
        // off the trait alone.
        if self.get_trait(project_id, collection_id, trait_id)?.is_none() {
            return Ok(Vec::new());
        }

        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, trait_id, name, created_at
             FROM trait_values WHERE trait_id = ? ORDER BY name",
        )?;

        let values = stmt
            .query_map([trait_id.to_string()], |row| {
                Ok(TraitValue {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    trait_id: parse_uuid(row.get::<_, String>(1)?),
                    name: row.get(2)?,
                    created_at: parse_datetime(row.get::<_, String>(3)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(values)
    }

    pub fn create_trait_value(
        &self,
        project_id: Uuid,
        collection_id: Uuid,
        trait_id: Uuid,
        input: CreateTraitValueInput,
    ) -> Result<TraitValue> {
        self.get_trait(project_id, collection_id, trait_id)?
            .ok_or_else(|| anyhow::anyhow!("Trait not found"))?;

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO trait_values (id, trait_id, name, created_at)
             VALUES (?, ?, ?, ?)",
            (
                id.to_string(),
                trait_id.to_string(),
                &input.name,
                now.to_rfc3339(),
            ),
        )?;

        Ok(TraitValue {
            id,
            trait_id,
            name: input.name,
            created_at: now,
        })
    }

    // ============================================================
    // Image layer operations
    // ============================================================

    pub fn get_image_layers(
        &self,
        project_id: Uuid,
        collection_id: Uuid,
    ) -> Result<Vec<ImageLayer>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, project_id, collection_id, name, url, bytes, trait_id, trait_value_id, created_at, updated_at
             FROM image_layers WHERE project_id = ? AND collection_id = ? ORDER BY name",
        )?;

        let layers = stmt
            .query_map(
                [project_id.to_string(), collection_id.to_string()],
                image_layer_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(layers)
    }

    pub fn get_image_layer(
        &self,
        project_id: Uuid,
        collection_id: Uuid,
        id: Uuid,
    ) -> Result<Option<ImageLayer>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, project_id, collection_id, name, url, bytes, trait_id, trait_value_id, created_at, updated_at
             FROM image_layers WHERE project_id = ? AND collection_id = ? AND id = ?",
        )?;

        let mut rows = stmt.query([
            project_id.to_string(),
            collection_id.to_string(),
            id.to_string(),
        ])?;
        if let Some(row) = rows.next()? {
            Ok(Some(image_layer_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn create_image_layer(
        &self,
        project_id: Uuid,
        collection_id: Uuid,
        input: CreateImageLayerInput,
    ) -> Result<ImageLayer> {
        // Verify collection exists
        self.get_collection(project_id, collection_id)?
            .ok_or_else(|| anyhow::anyhow!("Collection not found"))?;

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO image_layers (id, project_id, collection_id, name, url, bytes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            (
                id.to_string(),
                project_id.to_string(),
                collection_id.to_string(),
                &input.name,
                &input.url,
                input.bytes,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ),
        )?;

        Ok(ImageLayer {
            id,
            project_id,
            collection_id,
            name: input.name,
            url: input.url,
            bytes: input.bytes,
            trait_id: None,
            trait_value_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Field-level update of an image layer's tag. Fields left as `None` in
    /// the input are not touched in the store, so updating `trait_id` alone
    /// leaves whatever `trait_value_id` was persisted before.
    pub fn update_image_layer(
        &self,
        project_id: Uuid,
        collection_id: Uuid,
        id: Uuid,
        input: UpdateImageLayerInput,
    ) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");

        let mut updates = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(trait_id) = input.trait_id {
            updates.push("trait_id = ?");
            params.push(Box::new(trait_id.to_string()));
        }
        if let Some(trait_value_id) = input.trait_value_id {
            updates.push("trait_value_id = ?");
            params.push(Box::new(trait_value_id.to_string()));
        }

        if updates.is_empty() {
            return Ok(false);
        }

        updates.push("updated_at = ?");
        params.push(Box::new(Utc::now().to_rfc3339()));

        params.push(Box::new(project_id.to_string()));
        params.push(Box::new(collection_id.to_string()));
        params.push(Box::new(id.to_string()));

        let sql = format!(
            "UPDATE image_layers SET {} WHERE project_id = ? AND collection_id = ? AND id = ?",
            updates.join(", ")
        );
        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let rows = conn.execute(&sql, params_ref.as_slice())?;

        Ok(rows > 0)
    }

    pub fn delete_image_layer(
        &self,
        project_id: Uuid,
        collection_id: Uuid,
        id: Uuid,
    ) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute(
            "DELETE FROM image_layers WHERE project_id = ? AND collection_id = ? AND id = ?",
            [project_id.to_string(), collection_id.to_string(), id.to_string()],
        )?;
        Ok(rows > 0)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn image_layer_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ImageLayer> {
    Ok(ImageLayer {
        id: parse_uuid(row.get::<_, String>(0)?),
        project_id: parse_uuid(row.get::<_, String>(1)?),
        collection_id: parse_uuid(row.get::<_, String>(2)?),
        name: row.get(3)?,
        url: row.get(4)?,
        bytes: row.get(5)?,
        trait_id: row.get::<_, Option<String>>(6)?.map(parse_uuid),
        trait_value_id: row.get::<_, Option<String>>(7)?.map(parse_uuid),
        created_at: parse_datetime(row.get::<_, String>(8)?),
        updated_at: parse_datetime(row.get::<_, String>(9)?),
    })
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
