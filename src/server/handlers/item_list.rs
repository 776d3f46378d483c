use tonic::{Response, Status};
use tracing::info;

use crate::server::convert::page_to_proto;
use crate::server::error_mapping::request_error_status;
use crate::server::proto::{ListItemsRequest, ListItemsResponse};
use crate::server::request_validation::{validate_list_request, ListDefaults};
use crate::store::SharedItemStore;

pub async fn list_items(
    store: &SharedItemStore,
    defaults: ListDefaults,
    req: ListItemsRequest,
) -> Result<Response<ListItemsResponse>, Status> {
    info!(page = req.page, limit = req.limit, search = %req.search, "Getting items");

    let request = validate_list_request(&req, defaults).map_err(|e| request_error_status(&e))?;
    let page = store.query(&request).await;

    Ok(Response::new(page_to_proto(&page)))
}
