#![forbid(unsafe_code)]
#![warn(clippy::must_use_candidate, clippy::clone_on_copy)]

//! Static checks and control-flow analysis over a [`Program`](ownir_core::Program).
//!
//! Everything here runs before execution, and every inconsistency is fatal: there is no
//! partial-graph mode.

pub mod cfg;
mod error;
mod verify;


pub use cfg::{
    Analysis, CfgNode, Edge, Interval, Reachability, TableOfContents, adjacency_list, analyze,
    control_flow_graph, node_list, reachability, table_of_contents,
};
pub use error::{AnalysisError, VerifyError};
pub use verify::verify;
