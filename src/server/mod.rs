mod convert;
pub mod error_mapping;
mod handlers;
pub mod request_validation;
pub mod structured_error;
mod trait_impl;

use crate::store::SharedItemStore;
use request_validation::ListDefaults;
use tracing::warn;

// Import generated protobuf types
pub mod proto {
    #![allow(clippy::pedantic)]
    #![allow(clippy::all)]
    tonic::include_proto!("itemdeck");
}

/// Encoded descriptor set for gRPC reflection.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("itemdeck_descriptor");

/// gRPC façade over the shared item store.
pub struct ItemDeckService {
    store: SharedItemStore,
    defaults: ListDefaults,
}

impl ItemDeckService {
    /// `defaults.default_limit` outside `[1, MAX_LIMIT]` is clamped.
    #[must_use]
    pub fn new(store: SharedItemStore, defaults: ListDefaults) -> Self {
        let clamped = defaults.clamped();
        if clamped != defaults {
            warn!(
                requested = defaults.default_limit,
                applied = clamped.default_limit,
                "Default page size out of range; clamped"
            );
        }
        Self {
            store,
            defaults: clamped,
        }
    }
}
