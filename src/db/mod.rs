pub mod memory;
pub mod postgres;
pub mod redis;
mod store;

pub use memory::MemoryStore;
pub use postgres::create_pool;
pub use postgres::PostgresStore;
pub use redis::create_redis_client;
pub use redis::Cache;
pub use redis::CacheKey;
pub use store::RecipeStore;

#[cfg(test)]
pub use store::MockRecipeStore;
