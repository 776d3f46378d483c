use crate::metrics::{generate_request_id, OperationTimer};
use tonic::{Request, Response, Status};
use tracing::instrument;

use super::handlers;
use super::proto::item_deck_server::ItemDeck;
use super::proto::{
    ListItemsRequest, ListItemsResponse, UpdateSelectionRequest, UpdateSelectionResponse,
    UpdateSortRequest, UpdateSortResponse,
};
use super::ItemDeckService;

#[tonic::async_trait]
impl ItemDeck for ItemDeckService {
    #[instrument(
        name = "grpc.list_items",
        skip(self, request),
        fields(request_id = %generate_request_id())
    )]
    async fn list_items(
        &self,
        request: Request<ListItemsRequest>,
    ) -> Result<Response<ListItemsResponse>, Status> {
        let mut timer = OperationTimer::new("list_items");
        let result =
            handlers::item_list::list_items(&self.store, self.defaults, request.into_inner()).await;
        timer.observe(&result);
        result
    }

    #[instrument(
        name = "grpc.update_selection",
        skip(self, request),
        fields(request_id = %generate_request_id())
    )]
    async fn update_selection(
        &self,
        request: Request<UpdateSelectionRequest>,
    ) -> Result<Response<UpdateSelectionResponse>, Status> {
        let mut timer = OperationTimer::new("update_selection");
        let result =
            handlers::item_selection::update_selection(&self.store, request.into_inner()).await;
        timer.observe(&result);
        result
    }

    #[instrument(
        name = "grpc.update_sort",
        skip(self, request),
        fields(request_id = %generate_request_id())
    )]
    async fn update_sort(
        &self,
        request: Request<UpdateSortRequest>,
    ) -> Result<Response<UpdateSortResponse>, Status> {
        let mut timer = OperationTimer::new("update_sort");
        let result = handlers::item_sort::update_sort(&self.store, request.into_inner()).await;
        timer.observe(&result);
        result
    }
}
