//! External pipeline config document
//!
//! These types mirror the server's snake_case JSON. Tagged unions (tasks
//! and materials) are closed enums; see [`crate::codec`] for how they are
//! read and written.

mod wire;

pub mod common;
pub mod job;
pub mod material;
pub mod pipeline;
pub mod stage;
pub mod task;

pub use common::{ConfigProperty, EnvironmentVariable, HalLink, HalLinks, IntOrString, Parameter};
pub use job::{Artifact, ArtifactType, Job, Tab};
pub use material::{
    DependencyAttributes, Filter, GitAttributes, HgAttributes, Material, MaterialType,
    P4Attributes, PackageAttributes, PluginAttributes, SvnAttributes, TfsAttributes,
};
pub use pipeline::{
    CreatePipelineRequest, LockBehavior, Origin, OriginType, PipelineConfig, Timer, TrackingTool,
    TrackingToolAttributes,
};
pub use stage::{Approval, ApprovalType, Authorization, Stage};
pub use task::{
    BuildFileAttributes, CancelTask, ExecAttributes, FetchArtifactOrigin, FetchAttributes,
    NantAttributes, PluggableAttributes, PluginConfiguration, RunIf, Task, TaskAttributes,
    TaskType,
};
