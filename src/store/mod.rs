//! In-memory item store: ordering, selection and word search.
mod error;
mod item;
mod item_store;
mod query;
mod shared;
mod word_index;

pub use error::{ErrorKind, StoreError};
pub use item::{rank_at, Item};
pub use item_store::{ItemStore, DEFAULT_SEED_COUNT, MAX_SEED_COUNT};
pub use query::{paginate, ItemPage, PageRequest, DEFAULT_LIMIT, MAX_LIMIT};
pub use shared::SharedItemStore;
pub use word_index::{tokenize, WordIndex};
