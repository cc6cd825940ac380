//! Gantry Core
//!
//! Reconciliation core for declaratively managed CI pipeline configs.
//!
//! This crate contains:
//! - Domain types: the desired pipeline document users write
//! - DTOs: the server's pipeline config document and its tagged unions
//! - Mapping, structural equality and drift hashing between the two
//! - The single-pass reconciler and the seams it calls through

pub mod codec;
pub mod compare;
pub mod decision;
pub mod domain;
pub mod dto;
pub mod equality;
pub mod error;
pub mod hashing;
pub mod mapping;
pub mod reconcile;
pub mod resolver;

pub use decision::{Verdict, decide};
pub use equality::Equivalent;
pub use error::{CodecError, Error, Result, ValidationError};
pub use hashing::{EnvironmentHashes, ResolvedEnvironment, compute_hashes, resolve_environment};
pub use mapping::{create_request, to_external};
pub use reconcile::{
    ApplyOutcome, Observation, PipelineConfigService, Reconciler, ResourceStatus, ServiceError,
    Versioned,
};
pub use resolver::{InMemoryResolver, ResolveError, SourceKind, ValueResolver};
