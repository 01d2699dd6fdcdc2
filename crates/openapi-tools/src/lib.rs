//! OpenAPI-driven tool registry and dispatch for the Mailgun MCP server.
//!
//! The flow is: load the API description once (`document`), translate schema
//! fragments into runtime validators (`schema`), map call arguments onto an HTTP
//! request (`params`), and tie it all together per allow-listed endpoint
//! (`runtime`).
//!
//! This crate knows nothing about transports; the server binary owns those.

pub mod document;
pub mod error;
pub mod params;
pub mod runtime;
pub mod schema;
