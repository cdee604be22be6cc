//! # IONOS Connect Core
//!
//! Request-translation engine for IONOS Cloud workflow connector nodes.
//!
//! A connector node is pure data: a parameter schema plus a catalog of
//! (resource, operation) entries, each declaring an HTTP method, a path
//! template, and table-driven field mappings. This crate turns one node
//! invocation (a batch of input items with resolved parameter bags) into
//! HTTP calls and shaped output records:
//!
//! ```text
//! item loop → plan (validate, interpolate, map fields) → transport → shape
//! ```
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::Method;
//! use ionos_connect_core::{
//!     Authentication, CredentialStore, FieldMapping, HttpTransport, NodeDef,
//!     NodeInvocation, Operation, ParamBag, Property, PropertyKind, ShapeRule, execute,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let node = NodeDef {
//!     name: "ionosDns",
//!     display_name: "IONOS DNS",
//!     description: "Manage DNS zones",
//!     base_url: "https://dns.de-fra.ionos.com",
//!     default_credential: "ionosCloudApi",
//!     properties: vec![Property::required(
//!         "zoneName",
//!         "Zone Name",
//!         PropertyKind::String,
//!         &[("zone", "create")],
//!     )],
//!     operations: vec![
//!         Operation::new("zone", "create", Method::POST, "/zones")
//!             .field(FieldMapping::required("zoneName", "properties.zoneName"))
//!             .shape(ShapeRule::Whole),
//!     ],
//! };
//!
//! let credentials = CredentialStore::new()
//!     .with_credential("ionosCloudApi", Authentication::Token("token".into()));
//! let transport = HttpTransport::new(credentials);
//!
//! let invocation = NodeInvocation::new("zone", "create")
//!     .item(ParamBag::new().with("zoneName", "example.com"));
//! let records = execute(&node, &transport, &invocation).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure isolation
//!
//! With [`NodeInvocation::continue_on_fail`], a failing item becomes a single
//! `{"error": ...}` record and the batch continues; otherwise the first
//! failure aborts the batch with the item index attached.
//!
//! ## What this crate does not do
//!
//! No retries, no caching, no concurrency inside one invocation, and no
//! compensation for calls already issued when a later item fails. Credential
//! storage belongs to the host; nodes only name a credential.

mod auth;
mod catalog;
mod error;
mod params;
mod request;
mod run;
mod schema;
mod shape;
mod transport;

pub use self::auth::{Authentication, CredentialStore, SecureString};
pub use self::catalog::{BodyKind, FieldMapping, NodeDef, Operation, Policy};
pub use self::error::NodeError;
pub use self::params::{ParamBag, Transform, split_comma_list};
pub use self::request::{Payload, QueryMap, RequestPlan, build_plan, merge_for_update, resolve_path};
pub use self::run::{NodeInvocation, execute};
pub use self::schema::{Property, PropertyKind};
pub use self::shape::{OutputRecord, ShapeRule, shape_response};
pub use self::transport::{HttpTransport, Transport};
