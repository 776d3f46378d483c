use tonic::{Response, Status};
use tracing::{info, warn};

use crate::server::convert::items_to_proto;
use crate::server::error_mapping::store_error_status;
use crate::server::proto::{UpdateSelectionRequest, UpdateSelectionResponse};
use crate::store::SharedItemStore;

pub async fn update_selection(
    store: &SharedItemStore,
    req: UpdateSelectionRequest,
) -> Result<Response<UpdateSelectionResponse>, Status> {
    info!(count = req.selected_ids.len(), "Updating selection");

    match store.replace_selection(&req.selected_ids).await {
        Ok(selected) => Ok(Response::new(UpdateSelectionResponse {
            success: true,
            selected_items: items_to_proto(&selected),
        })),
        Err(e) => {
            warn!("Error updating selection: {e}");
            Err(store_error_status(&e))
        }
    }
}
