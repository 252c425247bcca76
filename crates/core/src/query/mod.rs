//! Read-only query facade consumed by the API layer.

mod query_model;
mod query_service;

#[cfg(test)]
mod query_service_tests;

pub use query_model::*;
pub use query_service::*;
