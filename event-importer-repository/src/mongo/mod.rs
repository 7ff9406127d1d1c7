//! MongoDB implementation of the source store.

mod convert;
mod store;

pub use convert::{bson_to_json, document_to_record, render_store_id};
pub use store::MongoSourceStore;
