use crate::server::proto::{Item as ProtoItem, ListItemsResponse};
use crate::store::{Item, ItemPage};

/// Convert a store item to its wire form.
///
/// `value` and metadata values are arbitrary JSON, so they travel JSON-encoded.
pub fn item_to_proto(item: &Item) -> ProtoItem {
    ProtoItem {
        id: item.id.clone(),
        label: item.label.clone(),
        value_json: item.value.to_string(),
        order: item.order,
        selected: item.selected,
        metadata_json: item
            .metadata
            .iter()
            .flatten()
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect(),
    }
}

pub fn items_to_proto(items: &[Item]) -> Vec<ProtoItem> {
    items.iter().map(item_to_proto).collect()
}

pub fn page_to_proto(page: &ItemPage) -> ListItemsResponse {
    ListItemsResponse {
        items: items_to_proto(&page.items),
        total: u64::try_from(page.total).unwrap_or(u64::MAX),
        has_more: page.has_more,
        page: u32::try_from(page.page).unwrap_or(u32::MAX),
    }
}
