//! Structural equality engine
//!
//! Decides whether a desired document, mapped to the external shape, and
//! the document the server holds are equivalent for reconciliation.
//!
//! Field classes:
//! - optional scalars: absent equals absent only
//! - keyed collections (parameters, variables, materials, stages, jobs,
//!   tabs, artifacts, configuration): multiset by identity key, order free
//! - tasks, exec arguments and job resources: positional
//! - filters, approval users/roles, run-if lists: sorted copies
//!
//! Environment variables match by name only; their values are tracked by
//! [`crate::hashing`]. Material passwords and server-side links are never
//! compared. The engine never fails, it only answers yes or no.

use crate::compare::{normalize_int_or_string, optional_eq, ordered_eq, sorted_eq, unordered_eq};
use crate::dto::{
    Approval, Artifact, BuildFileAttributes, CancelTask, ConfigProperty, DependencyAttributes,
    EnvironmentVariable, ExecAttributes, FetchAttributes, Filter, GitAttributes, HgAttributes,
    Job, Material, NantAttributes, Origin, P4Attributes, PackageAttributes, Parameter,
    PipelineConfig, PluggableAttributes, PluginAttributes, RunIf, Stage, SvnAttributes, Tab,
    Task, TaskAttributes, TfsAttributes, Timer, TrackingTool,
};

/// Equivalence for reconciliation purposes
///
/// Implementations are reflexive and symmetric.
pub trait Equivalent {
    fn equivalent(&self, other: &Self) -> bool;
}

impl<T: Equivalent> Equivalent for Option<T> {
    fn equivalent(&self, other: &Self) -> bool {
        optional_eq(self.as_ref(), other.as_ref(), T::equivalent)
    }
}

/// All checks must hold; the first failing one is logged
fn all_hold(scope: &str, checks: &[(&str, bool)]) -> bool {
    match checks.iter().find(|(_, holds)| !holds) {
        Some((field, _)) => {
            tracing::debug!("{} differs at '{}'", scope, field);
            false
        }
        None => true,
    }
}

fn variables_equivalent(a: &[EnvironmentVariable], b: &[EnvironmentVariable]) -> bool {
    unordered_eq(a, b, |v| v.name.clone(), |x, y| x.name == y.name)
}

fn properties_equivalent(a: &[ConfigProperty], b: &[ConfigProperty]) -> bool {
    unordered_eq(a, b, |p| p.key.clone(), ConfigProperty::equivalent)
}

/// Absent and empty filters are the same filter
fn filters_equivalent(a: Option<&Filter>, b: Option<&Filter>) -> bool {
    let empty = Filter::default();
    let a = a.unwrap_or(&empty);
    let b = b.unwrap_or(&empty);
    sorted_eq(&a.ignore, &b.ignore) && sorted_eq(&a.includes, &b.includes)
}

/// An empty run-if list is what the server stores as `[passed]`
fn run_if_equivalent(a: &[RunIf], b: &[RunIf]) -> bool {
    let default = [RunIf::Passed];
    let a = if a.is_empty() { &default[..] } else { a };
    let b = if b.is_empty() { &default[..] } else { b };
    sorted_eq(a, b)
}

// ============================================================================
// Pipeline
// ============================================================================

impl Equivalent for PipelineConfig {
    fn equivalent(&self, other: &Self) -> bool {
        all_hold(
            "pipeline",
            &[
                ("group", self.group == other.group),
                ("label_template", self.label_template == other.label_template),
                ("lock_behavior", self.lock_behavior == other.lock_behavior),
                ("name", self.name == other.name),
                ("template", self.template == other.template),
                ("origin", self.origin.equivalent(&other.origin)),
                (
                    "parameters",
                    unordered_eq(
                        &self.parameters,
                        &other.parameters,
                        |p| p.name.clone(),
                        Parameter::equivalent,
                    ),
                ),
                (
                    "environment_variables",
                    variables_equivalent(&self.environment_variables, &other.environment_variables),
                ),
                (
                    "materials",
                    unordered_eq(
                        &self.materials,
                        &other.materials,
                        Material::identity,
                        Material::equivalent,
                    ),
                ),
                (
                    "stages",
                    unordered_eq(
                        &self.stages,
                        &other.stages,
                        |s| s.name.clone(),
                        Stage::equivalent,
                    ),
                ),
                ("tracking_tool", self.tracking_tool.equivalent(&other.tracking_tool)),
                ("timer", self.timer.equivalent(&other.timer)),
            ],
        )
    }
}

impl Equivalent for Origin {
    fn equivalent(&self, other: &Self) -> bool {
        self.kind == other.kind && self.id == other.id
    }
}

impl Equivalent for Parameter {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}

impl Equivalent for TrackingTool {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}

impl Equivalent for Timer {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}

impl Equivalent for ConfigProperty {
    /// Secure values come back encrypted, so only plain values are compared
    fn equivalent(&self, other: &Self) -> bool {
        if self.key != other.key || self.secure != other.secure {
            return false;
        }
        self.secure || self.value == other.value
    }
}

// ============================================================================
// Stages and jobs
// ============================================================================

impl Equivalent for Stage {
    fn equivalent(&self, other: &Self) -> bool {
        all_hold(
            &format!("stage '{}'", self.name),
            &[
                ("name", self.name == other.name),
                ("fetch_materials", self.fetch_materials == other.fetch_materials),
                (
                    "clean_working_directory",
                    self.clean_working_directory == other.clean_working_directory,
                ),
                (
                    "never_cleanup_artifacts",
                    self.never_cleanup_artifacts == other.never_cleanup_artifacts,
                ),
                ("approval", self.approval.equivalent(&other.approval)),
                (
                    "environment_variables",
                    variables_equivalent(&self.environment_variables, &other.environment_variables),
                ),
                (
                    "jobs",
                    unordered_eq(&self.jobs, &other.jobs, |j| j.name.clone(), Job::equivalent),
                ),
            ],
        )
    }
}

impl Equivalent for Approval {
    fn equivalent(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.allow_only_on_success == other.allow_only_on_success
            && sorted_eq(&self.authorization.users, &other.authorization.users)
            && sorted_eq(&self.authorization.roles, &other.authorization.roles)
    }
}

impl Equivalent for Job {
    fn equivalent(&self, other: &Self) -> bool {
        all_hold(
            &format!("job '{}'", self.name),
            &[
                ("name", self.name == other.name),
                (
                    "run_instance_count",
                    normalize_int_or_string(self.run_instance_count.as_ref())
                        == normalize_int_or_string(other.run_instance_count.as_ref()),
                ),
                ("timeout", self.timeout == other.timeout),
                (
                    "environment_variables",
                    variables_equivalent(&self.environment_variables, &other.environment_variables),
                ),
                ("resources", self.resources == other.resources),
                (
                    "tasks",
                    ordered_eq(&self.tasks, &other.tasks, Task::equivalent),
                ),
                (
                    "tabs",
                    unordered_eq(&self.tabs, &other.tabs, |t| t.name.clone(), Tab::equivalent),
                ),
                (
                    "artifacts",
                    unordered_eq(
                        &self.artifacts,
                        &other.artifacts,
                        Artifact::identity,
                        Artifact::equivalent,
                    ),
                ),
                ("elastic_profile_id", self.elastic_profile_id == other.elastic_profile_id),
            ],
        )
    }
}

impl Equivalent for Tab {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}

impl Equivalent for Artifact {
    fn equivalent(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.source == other.source
            && self.destination == other.destination
            && self.artifact_id == other.artifact_id
            && self.store_id == other.store_id
            && properties_equivalent(&self.configuration, &other.configuration)
    }
}

// ============================================================================
// Tasks
// ============================================================================

impl Equivalent for Task {
    fn equivalent(&self, other: &Self) -> bool {
        self.attributes.equivalent(&other.attributes) && self.on_cancel.equivalent(&other.on_cancel)
    }
}

impl Equivalent for CancelTask {
    fn equivalent(&self, other: &Self) -> bool {
        self.attributes.equivalent(&other.attributes)
    }
}

impl Equivalent for TaskAttributes {
    fn equivalent(&self, other: &Self) -> bool {
        use TaskAttributes::*;

        match (self, other) {
            (Exec(a), Exec(b)) => a.equivalent(b),
            (Ant(a), Ant(b)) | (Rake(a), Rake(b)) => a.equivalent(b),
            (Nant(a), Nant(b)) => a.equivalent(b),
            (Fetch(a), Fetch(b)) => a.equivalent(b),
            (Pluggable(a), Pluggable(b)) => a.equivalent(b),
            _ => false,
        }
    }
}

impl Equivalent for ExecAttributes {
    fn equivalent(&self, other: &Self) -> bool {
        run_if_equivalent(&self.run_if, &other.run_if)
            && self.command == other.command
            && self.arguments == other.arguments
            && self.working_directory == other.working_directory
    }
}

impl Equivalent for BuildFileAttributes {
    fn equivalent(&self, other: &Self) -> bool {
        run_if_equivalent(&self.run_if, &other.run_if)
            && self.build_file == other.build_file
            && self.target == other.target
            && self.working_directory == other.working_directory
    }
}

impl Equivalent for NantAttributes {
    fn equivalent(&self, other: &Self) -> bool {
        run_if_equivalent(&self.run_if, &other.run_if)
            && self.build_file == other.build_file
            && self.target == other.target
            && self.nant_path == other.nant_path
            && self.working_directory == other.working_directory
    }
}

impl Equivalent for FetchAttributes {
    fn equivalent(&self, other: &Self) -> bool {
        self.artifact_origin == other.artifact_origin
            && run_if_equivalent(&self.run_if, &other.run_if)
            && self.pipeline == other.pipeline
            && self.stage == other.stage
            && self.job == other.job
            && self.source == other.source
            && self.is_source_a_file == other.is_source_a_file
            && self.destination == other.destination
            && self.artifact_id == other.artifact_id
            && properties_equivalent(&self.configuration, &other.configuration)
    }
}

impl Equivalent for PluggableAttributes {
    fn equivalent(&self, other: &Self) -> bool {
        run_if_equivalent(&self.run_if, &other.run_if)
            && self.plugin_configuration == other.plugin_configuration
            && properties_equivalent(&self.configuration, &other.configuration)
    }
}

// ============================================================================
// Materials
// ============================================================================

impl Equivalent for Material {
    fn equivalent(&self, other: &Self) -> bool {
        use Material::*;

        match (self, other) {
            (Git(a), Git(b)) => a.equivalent(b),
            (Svn(a), Svn(b)) => a.equivalent(b),
            (Hg(a), Hg(b)) => a.equivalent(b),
            (P4(a), P4(b)) => a.equivalent(b),
            (Tfs(a), Tfs(b)) => a.equivalent(b),
            (Dependency(a), Dependency(b)) => a.equivalent(b),
            (Package(a), Package(b)) => a.equivalent(b),
            (Plugin(a), Plugin(b)) => a.equivalent(b),
            _ => false,
        }
    }
}

impl Equivalent for GitAttributes {
    fn equivalent(&self, other: &Self) -> bool {
        self.name == other.name
            && self.url == other.url
            && self.username == other.username
            && self.branch == other.branch
            && self.destination == other.destination
            && self.auto_update == other.auto_update
            && filters_equivalent(self.filter.as_ref(), other.filter.as_ref())
            && self.invert_filter == other.invert_filter
            && self.submodule_folder == other.submodule_folder
            && self.shallow_clone == other.shallow_clone
    }
}

impl Equivalent for SvnAttributes {
    fn equivalent(&self, other: &Self) -> bool {
        self.name == other.name
            && self.url == other.url
            && self.username == other.username
            && self.destination == other.destination
            && filters_equivalent(self.filter.as_ref(), other.filter.as_ref())
            && self.invert_filter == other.invert_filter
            && self.auto_update == other.auto_update
            && self.check_externals == other.check_externals
    }
}

impl Equivalent for HgAttributes {
    fn equivalent(&self, other: &Self) -> bool {
        self.name == other.name
            && self.url == other.url
            && self.username == other.username
            && self.branch == other.branch
            && self.destination == other.destination
            && filters_equivalent(self.filter.as_ref(), other.filter.as_ref())
            && self.invert_filter == other.invert_filter
            && self.auto_update == other.auto_update
    }
}

impl Equivalent for P4Attributes {
    fn equivalent(&self, other: &Self) -> bool {
        self.name == other.name
            && self.port == other.port
            && self.use_tickets == other.use_tickets
            && self.view == other.view
            && self.username == other.username
            && self.destination == other.destination
            && filters_equivalent(self.filter.as_ref(), other.filter.as_ref())
            && self.invert_filter == other.invert_filter
            && self.auto_update == other.auto_update
    }
}

impl Equivalent for TfsAttributes {
    fn equivalent(&self, other: &Self) -> bool {
        self.name == other.name
            && self.url == other.url
            && self.project_path == other.project_path
            && self.domain == other.domain
            && self.username == other.username
            && self.destination == other.destination
            && self.auto_update == other.auto_update
            && filters_equivalent(self.filter.as_ref(), other.filter.as_ref())
            && self.invert_filter == other.invert_filter
    }
}

impl Equivalent for DependencyAttributes {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}

impl Equivalent for PackageAttributes {
    fn equivalent(&self, other: &Self) -> bool {
        self.reference == other.reference
    }
}

impl Equivalent for PluginAttributes {
    fn equivalent(&self, other: &Self) -> bool {
        self.reference == other.reference
            && self.destination == other.destination
            && filters_equivalent(self.filter.as_ref(), other.filter.as_ref())
            && self.invert_filter == other.invert_filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DependencyMaterialSpec, ExecTaskSpec, GitMaterialSpec, JobSpec, MaterialSpec, PipelineSpec,
        StageSpec, TaskSpec,
    };
    use crate::mapping::to_external;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> PipelineConfig {
        serde_json::from_value(value).unwrap()
    }

    fn external() -> PipelineConfig {
        decode(json!({
            "_links": {"self": {"href": "https://ci/go/api/admin/pipelines/app"}},
            "group": "default",
            "label_template": "${COUNT}",
            "lock_behavior": "none",
            "name": "app",
            "template": null,
            "origin": {"_links": {"self": {"href": "https://ci"}}, "type": "gocd"},
            "parameters": [{"name": "P1", "value": "1"}, {"name": "P2", "value": "2"}],
            "environment_variables": [
                {"name": "A", "value": "1", "secure": false},
                {"name": "B", "encrypted_value": "AES:x", "secure": true}
            ],
            "materials": [
                {"type": "git", "attributes": {"url": "https://x/repo.git", "branch": "main", "filter": null, "auto_update": true}},
                {"type": "dependency", "attributes": {"pipeline": "upstream", "stage": "build", "auto_update": true}}
            ],
            "stages": [
                {
                    "name": "s1",
                    "fetch_materials": true,
                    "approval": {"type": "success", "authorization": {"users": ["bob", "alice"], "roles": []}},
                    "environment_variables": [],
                    "jobs": [
                        {
                            "name": "j1",
                            "run_instance_count": null,
                            "timeout": "never",
                            "environment_variables": [],
                            "resources": ["linux", "docker"],
                            "tasks": [
                                {"type": "exec", "attributes": {"run_if": ["passed"], "command": "make", "arguments": ["build"]}},
                                {"type": "fetch", "attributes": {"artifact_origin": "gocd", "run_if": ["passed"], "pipeline": "up", "stage": "s", "job": "j", "source": "bin"}}
                            ],
                            "tabs": [{"name": "report", "path": "out/index.html"}, {"name": "cov", "path": "cov/index.html"}],
                            "artifacts": [
                                {"type": "build", "source": "target", "destination": "out"},
                                {"type": "test", "source": "reports", "destination": "tests"}
                            ]
                        },
                        {"name": "j2", "timeout": "never", "tasks": [], "artifacts": []}
                    ]
                },
                {"name": "s2", "approval": {"type": "manual", "authorization": {}}, "jobs": []}
            ]
        }))
    }

    #[test]
    fn test_reflexive() {
        let config = external();
        assert!(config.equivalent(&config));
        assert!(config.equivalent(&config.clone()));
    }

    #[test]
    fn test_symmetric_on_difference() {
        let a = external();
        let mut b = external();
        b.stages[0].jobs[0].resources.push("arm64".into());

        assert!(!a.equivalent(&b));
        assert!(!b.equivalent(&a));
    }

    #[test]
    fn test_links_are_ignored() {
        let a = external();
        let mut b = external();
        b.links = None;
        b.origin.as_mut().unwrap().links = None;
        assert!(a.equivalent(&b));
    }

    #[test]
    fn test_keyed_collections_ignore_order() {
        let a = external();
        let mut b = external();
        b.parameters.reverse();
        b.environment_variables.reverse();
        b.materials.reverse();
        b.stages.reverse();
        b.stages[1].jobs.reverse();
        b.stages[1].jobs[1].tabs.reverse();
        b.stages[1].jobs[1].artifacts.reverse();
        b.stages[1].approval.authorization.users.reverse();

        assert!(a.equivalent(&b));
        assert!(b.equivalent(&a));
    }

    #[test]
    fn test_task_order_matters() {
        let a = external();
        let mut b = external();
        b.stages[0].jobs[0].tasks.reverse();

        assert!(!a.equivalent(&b));
        assert!(!b.equivalent(&a));
    }

    #[test]
    fn test_environment_values_are_not_compared() {
        let a = external();
        let mut b = external();
        b.environment_variables[0].value = Some("changed".into());
        assert!(a.equivalent(&b));

        b.environment_variables[0].name = "C".into();
        assert!(!a.equivalent(&b));
    }

    #[test]
    fn test_parameter_value_is_compared() {
        let a = external();
        let mut b = external();
        b.parameters[0].value = "changed".into();
        assert!(!a.equivalent(&b));
    }

    #[test]
    fn test_duplicate_stage_names_do_not_merge() {
        let mut a = external();
        let mut b = external();
        a.stages[1] = a.stages[0].clone();
        b.stages[0] = b.stages[1].clone();
        b.stages[0].name = "s1".into();
        assert!(!a.equivalent(&b));
        assert!(!b.equivalent(&a));
    }

    #[test]
    fn test_duplicate_keys_need_their_own_partner() {
        let a = external();
        let mut b = external();
        b.parameters[1] = Parameter {
            name: "P1".into(),
            value: "1".into(),
        };
        assert_eq!(a.parameters.len(), b.parameters.len());
        assert!(!a.equivalent(&b));
        assert!(!b.equivalent(&a));

        let mut c = external();
        c.environment_variables[1] = EnvironmentVariable::plain("A", "1");
        assert_eq!(a.environment_variables.len(), c.environment_variables.len());
        assert!(!a.equivalent(&c));
        assert!(!c.equivalent(&a));
    }

    #[test]
    fn test_missing_element_is_a_difference() {
        let a = external();
        let mut b = external();
        b.materials.pop();
        assert!(!a.equivalent(&b));
        assert!(!b.equivalent(&a));
    }

    #[test]
    fn test_filter_absent_equals_empty() {
        let a = Some(Filter::default());
        let ordered = Filter {
            ignore: vec!["a".into(), "b".into()],
            includes: vec![],
        };
        let reversed = Filter {
            ignore: vec!["b".into(), "a".into()],
            includes: vec![],
        };

        assert!(filters_equivalent(None, a.as_ref()));
        assert!(filters_equivalent(a.as_ref(), None));
        assert!(filters_equivalent(Some(&ordered), Some(&reversed)));
        assert!(!filters_equivalent(None, Some(&ordered)));
    }

    #[test]
    fn test_material_passwords_ignored() {
        let a = Material::Git(GitAttributes {
            url: Some("https://x/repo.git".into()),
            password: Some("plain".into()),
            ..Default::default()
        });
        let b = Material::Git(GitAttributes {
            url: Some("https://x/repo.git".into()),
            encrypted_password: Some("AES:x".into()),
            ..Default::default()
        });
        assert!(a.equivalent(&b));
    }

    #[test]
    fn test_material_kind_mismatch() {
        let git = Material::Git(GitAttributes::default());
        let hg = Material::Hg(HgAttributes::default());
        assert!(!git.equivalent(&hg));
        assert!(!hg.equivalent(&git));
    }

    #[test]
    fn test_on_cancel_presence_matters() {
        let plain = Task::new(TaskAttributes::Exec(ExecAttributes::default()));
        let with_cancel = plain
            .clone()
            .with_on_cancel(TaskAttributes::Exec(ExecAttributes::default()));

        assert!(plain.equivalent(&plain.clone()));
        assert!(!plain.equivalent(&with_cancel));
        assert!(!with_cancel.equivalent(&plain));
        assert!(with_cancel.equivalent(&with_cancel.clone()));
    }

    #[test]
    fn test_empty_run_if_means_passed() {
        let a = ExecAttributes {
            command: "ls".into(),
            ..Default::default()
        };
        let b = ExecAttributes {
            run_if: vec![RunIf::Passed],
            command: "ls".into(),
            ..Default::default()
        };
        let c = ExecAttributes {
            run_if: vec![RunIf::Any],
            command: "ls".into(),
            ..Default::default()
        };
        assert!(a.equivalent(&b));
        assert!(!a.equivalent(&c));
    }

    #[test]
    fn test_run_instance_count_zero_equals_absent() {
        let mut a = external();
        let b = external();
        a.stages[0].jobs[0].run_instance_count = Some(crate::dto::IntOrString::Int(0));
        assert!(a.equivalent(&b));

        a.stages[0].jobs[0].run_instance_count = Some(crate::dto::IntOrString::string("all"));
        assert!(!a.equivalent(&b));
    }

    #[test]
    fn test_secure_configuration_values_not_compared() {
        let a = ConfigProperty {
            key: "token".into(),
            value: Some("plain".into()),
            encrypted_value: None,
            secure: true,
        };
        let b = ConfigProperty {
            key: "token".into(),
            value: None,
            encrypted_value: Some("AES:x".into()),
            secure: true,
        };
        assert!(a.equivalent(&b));
        assert!(!ConfigProperty::new("k", "1").equivalent(&ConfigProperty::new("k", "2")));
    }

    fn desired_with_git() -> PipelineSpec {
        let mut job = JobSpec::new("j1");
        job.tasks.push(TaskSpec::exec(ExecTaskSpec {
            command: "make".into(),
            ..Default::default()
        }));
        let mut stage = StageSpec::new("s1");
        stage.jobs.push(job);

        let mut spec = PipelineSpec::new("app", "default");
        spec.materials.push(MaterialSpec::git(GitMaterialSpec {
            url: "https://x/repo.git".into(),
            branch: "main".into(),
            ..Default::default()
        }));
        spec.stages.push(stage);
        spec
    }

    #[test]
    fn test_desired_git_material_equals_external_with_null_filter() {
        let desired = to_external(&desired_with_git(), None).unwrap();
        let actual = decode(json!({
            "group": "default",
            "lock_behavior": "none",
            "name": "app",
            "template": null,
            "origin": {"type": "gocd"},
            "parameters": [],
            "environment_variables": [],
            "materials": [
                {"type": "git", "attributes": {
                    "url": "https://x/repo.git", "branch": "main", "filter": null,
                    "name": null, "destination": null, "submodule_folder": null,
                    "auto_update": false, "invert_filter": false, "shallow_clone": false
                }}
            ],
            "stages": [{
                "name": "s1",
                "fetch_materials": true,
                "clean_working_directory": false,
                "never_cleanup_artifacts": false,
                "approval": {"type": "success", "allow_only_on_success": false,
                             "authorization": {"roles": [], "users": []}},
                "environment_variables": [],
                "jobs": [{
                    "name": "j1",
                    "run_instance_count": null,
                    "timeout": "never",
                    "environment_variables": [],
                    "resources": [],
                    "tasks": [{"type": "exec", "attributes": {
                        "run_if": ["passed"], "command": "make", "working_directory": null
                    }}],
                    "tabs": [],
                    "artifacts": []
                }]
            }]
        }));

        assert!(desired.equivalent(&actual));
        assert!(actual.equivalent(&desired));
    }

    #[test]
    fn test_desired_materials_of_mixed_kinds_ignore_order() {
        let mut spec = desired_with_git();
        spec.materials.push(MaterialSpec::dependency(DependencyMaterialSpec {
            pipeline: "upstream".into(),
            stage: "build".into(),
            ..Default::default()
        }));
        let desired = to_external(&spec, None).unwrap();
        assert_eq!(desired.materials.len(), 2);

        let mut actual = desired.clone();
        actual.materials.reverse();
        assert!(desired.equivalent(&actual));
        assert!(actual.equivalent(&desired));

        actual.materials.remove(0);
        actual.materials.push(desired.materials[0].clone());
        assert!(!desired.equivalent(&actual));
    }

    #[test]
    fn test_material_identity_is_kind_prefixed() {
        let svn = Material::Svn(SvnAttributes {
            url: Some("upstream/build".into()),
            ..Default::default()
        });
        let dependency = Material::Dependency(DependencyAttributes {
            pipeline: Some("upstream".into()),
            stage: Some("build".into()),
            ..Default::default()
        });

        assert_ne!(svn.identity(), dependency.identity());
        assert!(!svn.equivalent(&dependency));
    }

    #[test]
    fn test_reordered_desired_tasks_are_not_equivalent() {
        let mut spec = desired_with_git();
        spec.stages[0].jobs[0].tasks.push(TaskSpec::fetch(crate::domain::FetchTaskSpec {
            pipeline: "up".into(),
            stage: "s".into(),
            job: "j".into(),
            ..Default::default()
        }));
        let desired = to_external(&spec, None).unwrap();

        let mut actual = desired.clone();
        actual.stages[0].jobs[0].tasks.reverse();

        assert!(desired.equivalent(&desired.clone()));
        assert!(!desired.equivalent(&actual));
    }
}
