//! # IONOS Connect Nodes
//!
//! Connector node catalogs for the IONOS Cloud product APIs.
//!
//! Each module declares one node as pure data over
//! [`ionos_connect_core`]: a parameter schema (fields with conditional
//! visibility per resource/operation pair) and a catalog of operations
//! (method, path template, field mappings, response shape). The core engine
//! does the rest: validation, URL interpolation, body assembly, dispatch,
//! and output shaping.
//!
//! ```rust
//! use ionos_connect_nodes::compute;
//!
//! let node = compute::node();
//! assert!(node.find("server", "create").is_ok());
//! ```
//!
//! The full set is available through [`all_nodes`] for hosts that register
//! nodes by name.

pub mod ai_model_hub;
pub mod application_load_balancer;
pub mod compute;
pub mod container_registry;
pub mod dbaas;
pub mod dns;
pub mod domains;
pub mod kubernetes;
pub mod network;
pub mod reseller;
pub mod vm_autoscaling;
pub mod vpn_gateway;

use ionos_connect_core::NodeDef;

/// Builds every node definition this crate ships.
pub fn all_nodes() -> Vec<NodeDef> {
    vec![
        ai_model_hub::node(),
        application_load_balancer::node(),
        compute::node(),
        container_registry::node(),
        dbaas::node(),
        dns::node(),
        domains::node(),
        kubernetes::node(),
        network::node(),
        reseller::node(),
        vm_autoscaling::node(),
        vpn_gateway::node(),
    ]
}
