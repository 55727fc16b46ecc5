//! Integration tests for Arc Benefits
//!
//! These tests drive the HTTP API, the benefit service and the Azure clients
//! against mock data sources and mock HTTP servers.

mod resource_graph_tests;
mod service_tests;
