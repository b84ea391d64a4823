// Infrastructure layer - External dependencies and adapters
pub mod chunked_ndjson;
pub mod config;
pub mod file_store;
pub mod http_response;
pub mod svg_canvas;
