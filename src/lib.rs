//! Turns pages observed by a host proxy into embedded, semantically
//! searchable documents.
//!
//! The interception side ([`intercept::Interceptor`]) filters observed
//! responses and feeds eligible URLs to a bounded worker pool
//! ([`pipeline::EmbedPipeline`]) that normalizes each page
//! ([`normalize::ContentNormalizer`]) and hands it to the external embedding
//! engine ([`engine::IndexBackend`]). The query side serves a small HTTP
//! UI ([`server::router`]) backed by [`search::SearchService`] and
//! [`cache::ResultCache`].

pub mod cache;
pub mod config;
pub mod engine;
pub mod errors;
pub mod frontmatter;
pub mod intercept;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod search;
pub mod server;
pub mod state;
