use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One uploaded artwork asset belonging to a collection.
///
/// The upload flow creates the record and the stored bytes; this crate only
/// tags the record with an optional (trait, trait value) pair and deletes it.
///
/// If `trait_value_id` is set it is expected to belong to `trait_id`'s value
/// set. The cascade path on the artwork page is the only writer that keeps
/// this true; the store itself does not re-check it (see
/// [`crate::artwork::cascade`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageLayer {
    pub id: Uuid,
    pub project_id: Uuid,
    pub collection_id: Uuid,
    pub name: String,
    /// Location of the rendered asset. Opaque here; the storage service
    /// owns the bytes behind it.
    pub url: String,
    /// Size of the stored asset in bytes.
    pub bytes: i64,
    /// `None` means unassigned.
    pub trait_id: Option<Uuid>,
    /// `None` means unassigned.
    pub trait_value_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering an uploaded asset record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateImageLayerInput {
    pub name: String,
    pub url: String,
    pub bytes: i64,
}

/// Input for a field-level update of an image layer's tag.
/// Fields left as `None` are unchanged in the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateImageLayerInput {
    pub trait_id: Option<Uuid>,
    pub trait_value_id: Option<Uuid>,
}

/// Human-readable size label for an asset, e.g. `"24.5 KB"`.
pub fn format_bytes(bytes: i64) -> String {
    const UNITS: &[&str] = &["Bytes", "KB", "MB", "GB", "TB"];

    if bytes <= 0 {
        return "0 Bytes".to_string();
    }

    let exp = (((bytes as f64).ln() / 1024f64.ln()) as usize).min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);

    if exp == 0 {
        format!("{} {}", bytes, UNITS[exp])
    } else {
        format!("{:.1} {}", value, UNITS[exp])
    }
}
