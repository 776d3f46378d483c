use tonic::{Response, Status};
use tracing::{info, warn};

use crate::server::convert::items_to_proto;
use crate::server::error_mapping::store_error_status;
use crate::server::proto::{UpdateSortRequest, UpdateSortResponse};
use crate::store::SharedItemStore;

/// Ids are handed to the store untouched; duplicates must reach it so they
/// are reported rather than silently collapsed.
pub async fn update_sort(
    store: &SharedItemStore,
    req: UpdateSortRequest,
) -> Result<Response<UpdateSortResponse>, Status> {
    info!(count = req.item_ids.len(), "Updating sort order");

    match store.reorder(&req.item_ids).await {
        Ok(sorted) => Ok(Response::new(UpdateSortResponse {
            success: true,
            sorted_items: items_to_proto(&sorted),
        })),
        Err(e) => {
            warn!("Error updating sort order: {e}");
            Err(store_error_status(&e))
        }
    }
}
