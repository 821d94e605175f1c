//! Client for the car-reliability backend.
//!
//! The crate owns the boundary between a dashboard and its backend: the bearer
//! token session, the HTTP adapter that attaches and invalidates it, the request
//! and response contracts, and the display logic that turns possibly partial
//! responses into views. The `reliability` binary is a terminal front end over it.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod flows;
pub mod history;
pub mod http;
pub mod lenient;
pub mod models;
pub mod page;
pub mod quota;
pub mod reliability_api;
pub mod render;
pub mod report;
pub mod session;

pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use reliability_api::ReliabilityApi;
pub use session::{FileTokenStore, MemoryTokenStore, TokenStore};
