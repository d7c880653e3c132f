//! Domain core of the data-upload workflow: records, column discovery,
//! the mapping wizard and the upload sequence that ties them together.
//!
//! Nothing here touches the browser. The `frontend` crate supplies the
//! session storage backend, the blob reads and the timers.

pub mod config;
pub mod model;
pub mod reader;
pub mod store;
pub mod upload;
pub mod wizard;
