mod activity_feed;
mod embedding_store;

pub use activity_feed::IActivityFeed;
pub use embedding_store::IEmbeddingStore;
