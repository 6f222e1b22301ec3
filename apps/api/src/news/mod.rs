// News aggregation: multi-source fetching, content enrichment, and a
// TTL cache. The fetcher and the cache are constructor-injected — nothing
// in this subsystem is module-global.

pub mod enrich;
pub mod fetcher;
pub mod handlers;
pub mod models;
pub mod service;
pub mod sources;
