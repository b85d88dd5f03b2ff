//! # volunteerflow-server
//!
//! Protected resource handlers for leads, positions, applications, medical
//! screenings, placements, reports and the dashboard, served over an
//! in-memory store.
//!
//! Transport is out of scope: a host maps its HTTP layer onto
//! [`routes::ApiRequest`] / [`routes::ApiResponse`] and calls
//! [`service::VolunteerFlowService::handle`]. Every resource route is
//! declared in [`routes::protected_routes`] with its requirement and runs
//! behind the enforcement gate.
//!
//! ```rust,ignore
//! use volunteerflow_server::{AppConfig, ServiceBuilder, ApiRequest};
//!
//! let service = ServiceBuilder::new(AppConfig::from_file(path)?)
//!     .external_identity(provider)
//!     .build()?;
//! let response = service.handle(&ApiRequest::get("/api/leads").with_credentials(&token));
//! ```

pub mod activity;
pub mod config;
pub mod dev_auth;
mod handlers;
pub mod reports;
pub mod routes;
pub mod schemas;
pub mod seed;
pub mod service;
pub mod store;

pub use config::{AppConfig, Environment, IdentityMode};
pub use dev_auth::{DevIdentityProvider, DevLogin};
pub use handlers::DEFAULT_POSITION_MONTHS;
pub use routes::{ApiRequest, ApiResponse, Method};
pub use service::{ServiceBuilder, VolunteerFlowService};
pub use store::InMemoryStore;
