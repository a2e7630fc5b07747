//! Delete confirmation workflow.
//!
//! One deletion may be pending per page instance, not per image layer. The
//! workflow remembers which layer a destructive action targets across the
//! two user gestures (request, then confirm or cancel) and is the only
//! code path that removes artwork records.

use uuid::Uuid;

use super::AssociationStore;
use crate::models::ImageLayer;

/// Whether a deletion is pending. `Confirming` means the confirmation
/// dialog is visible for `pending_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteState {
    #[default]
    Idle,
    Confirming {
        pending_id: Uuid,
    },
}

/// The confirm/cancel state machine guarding image layer deletion.
///
/// Requesting and cancelling never touch the store. Confirming issues the
/// removal, returns to [`DeleteState::Idle`] unconditionally, and leaves
/// the caller to reload the page snapshot; a removal failure is logged but
/// not distinguished from success.
#[derive(Debug, Default)]
pub struct DeleteWorkflow {
    state: DeleteState,
}

impl DeleteWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DeleteState {
        self.state
    }

    pub fn pending_id(&self) -> Option<Uuid> {
        match self.state {
            DeleteState::Idle => None,
            DeleteState::Confirming { pending_id } => Some(pending_id),
        }
    }

    pub fn is_confirming(&self) -> bool {
        matches!(self.state, DeleteState::Confirming { .. })
    }

    /// A user asked to delete an image layer: show the dialog. No store
    /// mutation.
    pub fn request(&mut self, image_layer_id: Uuid) {
        self.state = DeleteState::Confirming {
            pending_id: image_layer_id,
        };
    }

    /// Dismiss the dialog without deleting. No store mutation.
    pub fn cancel(&mut self) {
        self.state = DeleteState::Idle;
    }

    /// Confirmation dialog copy naming the pending layer, or `None` when no
    /// deletion is pending. Falls back to a placeholder when the pending id
    /// no longer resolves to a known layer.
    pub fn prompt(&self, image_layers: &[ImageLayer]) -> Option<String> {
        let pending_id = self.pending_id()?;
        let name = image_layers
            .iter()
            .find(|layer| layer.id == pending_id)
            .map(|layer| layer.name.as_str())
            .unwrap_or("Unknown");

        Some(format!(
            "Are you sure you want to delete '{name}'? This action cannot be undone."
        ))
    }

    /// The user confirmed: remove the pending layer's record and return to
    /// idle.
    ///
    /// Returns whether a removal call was issued. With no pending id the
    /// removal is skipped but the machine still ends up idle. Removal
    /// failure (or a stale id that removes nothing) is logged only; the
    /// caller reloads the snapshot either way.
    pub fn confirm<S: AssociationStore>(
        &mut self,
        store: &S,
        project_id: Uuid,
        collection_id: Uuid,
    ) -> bool {
        let pending = self.pending_id();
        self.state = DeleteState::Idle;

        let Some(image_layer_id) = pending else {
            return false;
        };

        match store.remove_image_layer(project_id, collection_id, image_layer_id) {
            Ok(removed) => {
                if !removed {
                    tracing::warn!("Image layer {image_layer_id} was already gone at delete");
                }
            }
            Err(e) => {
                tracing::error!("Failed to remove image layer {image_layer_id}: {e}");
            }
        }

        true
    }
}
