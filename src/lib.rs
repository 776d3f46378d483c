// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

pub mod cors;
pub mod grpc_logging;
pub mod logging;
pub mod metrics;
pub mod rate_limit;
pub mod server;
pub mod store;
pub mod user_config;

// Re-export commonly used types
pub use server::request_validation::ListDefaults;
pub use server::ItemDeckService;
pub use store::{
    ErrorKind, Item, ItemPage, ItemStore, PageRequest, SharedItemStore, StoreError,
    DEFAULT_LIMIT, DEFAULT_SEED_COUNT, MAX_LIMIT, MAX_SEED_COUNT,
};
pub use user_config::{load_user_config, RateLimitConfig, UserConfig, UserConfigError};
