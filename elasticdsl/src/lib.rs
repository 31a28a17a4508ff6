//! Query DSL builders and HTTP client for Elasticsearch-style search engines
//!
//! The builders assemble the JSON documents the engine understands; the
//! client sends them over a shared HTTP transport.
//!
//! # Builders
//!
//! - [`Query`] - scored clauses (`term`, `match`, `bool`, `range`, `fuzzy`, ...)
//! - [`Filter`] - unscored clauses (`and`/`or`/`not`, `exists`, geo filters, ...)
//! - [`Facet`] - named `terms` and `range` facets
//! - [`Sort`] - ordered sort directives
//! - [`FieldMapping`] / [`TypeMapping`] - property declarations
//! - [`SearchRequest`] - the full search body
//!
//! Builders with a mandatory input return [`Result`] and reject empty input
//! with [`Error::MissingField`]. Every builder is a pure function of its
//! arguments.
//!
//! # Client
//!
//! [`SearchClient`] maps search and index administration onto REST calls.
//! Connection failures are reported in the response, never as an `Err`:
//! the body becomes `{"error": "..."}` and the status
//! [`ResponseStatus::NoStatus`].

pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod facet;
pub mod filter;
pub mod geo;
pub mod mapping;
pub mod query;
pub mod request;
pub mod sort;
pub mod transport;

pub use client::{CouchDbRiver, IndexSettings, SearchClient};
pub use config::{ClientConfig, LoggingConfig};
pub use document::Clause;
pub use error::Error;
pub use facet::{Facet, FacetRange, Facets, TermsFacetOptions, TermsOrder};
pub use filter::{BoolFilter, Filter};
pub use geo::{DistanceType, GeoPoint};
pub use mapping::{FieldMapping, FieldType, TermVector, TypeMapping};
pub use query::{BoolQuery, Operator, Query, RangeBounds};
pub use request::SearchRequest;
pub use sort::{Missing, Sort, SortOrder};
pub use transport::{Method, ResponseStatus, Transport, TransportOptions, TransportResponse};

/// Result type for builder and client operations
pub type Result<T> = std::result::Result<T, Error>;
