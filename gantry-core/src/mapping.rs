//! Desired → external mapping
//!
//! Converts a validated [`PipelineSpec`] into the server's [`PipelineConfig`]
//! shape. Empty desired strings become absent fields, an empty filter is
//! dropped, and `runInstanceCount` collapses `0`/`""` to absent.
//!
//! Referenced environment values are only filled in when a
//! [`ResolvedEnvironment`] is supplied. Comparison does not need them since
//! variables are matched by name.

use crate::compare::{non_empty, normalize_int_or_string};
use crate::domain::{
    ApprovalSpec, ArtifactSpec, EnvironmentVariableSpec, FilterSpec, JobSpec, KeyValue,
    MaterialSpec, PipelineSpec, StageSpec, TaskSpec,
};
use crate::dto::{
    Approval, Artifact, Authorization, BuildFileAttributes, CancelTask, ConfigProperty,
    CreatePipelineRequest, DependencyAttributes, EnvironmentVariable, ExecAttributes,
    FetchAttributes, Filter, GitAttributes, HgAttributes, IntOrString, Job, Material,
    MaterialType, NantAttributes, Origin, P4Attributes, PackageAttributes, Parameter,
    PipelineConfig, PluggableAttributes, PluginAttributes, PluginConfiguration, Stage,
    SvnAttributes, Tab, Task, TaskAttributes, TaskType, TfsAttributes, Timer, TrackingTool,
    TrackingToolAttributes,
};
use crate::error::ValidationError;
use crate::hashing::{ResolvedEnvironment, job_key, pipeline_key, stage_key};

/// Job timeout used when the desired document does not set one
pub const DEFAULT_JOB_TIMEOUT: &str = "never";

/// Map a desired pipeline to the external document shape
///
/// # Arguments
/// * `spec` - Desired pipeline; validated before mapping
/// * `resolved` - Plaintext of referenced variables, when submitting
///
/// # Returns
/// The external document, or the first validation failure
pub fn to_external(
    spec: &PipelineSpec,
    resolved: Option<&ResolvedEnvironment>,
) -> Result<PipelineConfig, ValidationError> {
    spec.validate()?;

    let origin = spec.origin.clone().unwrap_or_default();

    Ok(PipelineConfig {
        group: non_empty(&spec.group),
        label_template: non_empty(&spec.label_template),
        lock_behavior: Some(spec.lock_behavior.unwrap_or_default()),
        name: non_empty(&spec.name),
        template: non_empty(&spec.template),
        origin: Some(Origin {
            kind: origin.kind,
            id: non_empty(&origin.id),
            links: None,
        }),
        parameters: spec
            .parameters
            .iter()
            .map(|p| Parameter {
                name: p.name.clone(),
                value: p.value.clone(),
            })
            .collect(),
        environment_variables: map_variables(&spec.environment_variables, resolved, |name| {
            pipeline_key(name)
        }),
        materials: spec.materials.iter().map(map_material).collect(),
        stages: spec
            .stages
            .iter()
            .map(|stage| map_stage(stage, resolved))
            .collect(),
        tracking_tool: spec
            .tracking_tool
            .as_ref()
            .filter(|t| !t.kind.is_empty())
            .map(|t| TrackingTool {
                kind: t.kind.clone(),
                attributes: TrackingToolAttributes {
                    url_pattern: t.url_pattern.clone(),
                    regex: t.regex.clone(),
                },
            }),
        timer: spec
            .timer
            .as_ref()
            .filter(|t| !t.spec.is_empty())
            .map(|t| Timer {
                spec: t.spec.clone(),
                only_on_changes: t.only_on_changes,
            }),
        links: None,
    })
}

/// Build the body of a create call
pub fn create_request(
    spec: &PipelineSpec,
    resolved: Option<&ResolvedEnvironment>,
) -> Result<CreatePipelineRequest, ValidationError> {
    Ok(CreatePipelineRequest::new(to_external(spec, resolved)?))
}

fn map_variables<F>(
    vars: &[EnvironmentVariableSpec],
    resolved: Option<&ResolvedEnvironment>,
    key: F,
) -> Vec<EnvironmentVariable>
where
    F: Fn(&str) -> String,
{
    vars.iter()
        .map(|var| {
            if let Some(literal) = var.literal_value() {
                return EnvironmentVariable::plain(&var.name, literal);
            }

            let value = resolved
                .and_then(|env| env.get(&key(&var.name)))
                .map(str::to_string);

            if var.is_secret() {
                EnvironmentVariable::secure(&var.name, value)
            } else {
                EnvironmentVariable::plain(&var.name, value.unwrap_or_default())
            }
        })
        .collect()
}

fn map_filter(filter: &FilterSpec) -> Option<Filter> {
    if filter.ignore.is_empty() && filter.includes.is_empty() {
        return None;
    }
    Some(Filter {
        ignore: filter.ignore.clone(),
        includes: filter.includes.clone(),
    })
}

fn map_material(spec: &MaterialSpec) -> Material {
    match spec.kind {
        MaterialType::Git => {
            let a = spec.git_attributes.clone().unwrap_or_default();
            Material::Git(GitAttributes {
                name: non_empty(&a.name),
                url: non_empty(&a.url),
                username: non_empty(&a.username),
                password: non_empty(&a.password),
                encrypted_password: None,
                branch: non_empty(&a.branch),
                destination: non_empty(&a.destination),
                auto_update: a.auto_update,
                filter: map_filter(&a.filter),
                invert_filter: a.invert_filter,
                submodule_folder: non_empty(&a.submodule_folder),
                shallow_clone: a.shallow_clone,
            })
        }
        MaterialType::Svn => {
            let a = spec.svn_attributes.clone().unwrap_or_default();
            Material::Svn(SvnAttributes {
                name: non_empty(&a.name),
                url: non_empty(&a.url),
                username: non_empty(&a.username),
                password: non_empty(&a.password),
                encrypted_password: non_empty(&a.encrypted_password),
                destination: non_empty(&a.destination),
                filter: map_filter(&a.filter),
                invert_filter: a.invert_filter,
                auto_update: a.auto_update,
                check_externals: a.check_externals,
            })
        }
        MaterialType::Hg => {
            let a = spec.hg_attributes.clone().unwrap_or_default();
            Material::Hg(HgAttributes {
                name: non_empty(&a.name),
                url: non_empty(&a.url),
                username: non_empty(&a.username),
                password: non_empty(&a.password),
                encrypted_password: non_empty(&a.encrypted_password),
                branch: non_empty(&a.branch),
                destination: non_empty(&a.destination),
                filter: map_filter(&a.filter),
                invert_filter: a.invert_filter,
                auto_update: a.auto_update,
            })
        }
        MaterialType::P4 => {
            let a = spec.p4_attributes.clone().unwrap_or_default();
            Material::P4(P4Attributes {
                name: non_empty(&a.name),
                port: non_empty(&a.port),
                use_tickets: a.use_tickets,
                view: non_empty(&a.view),
                username: non_empty(&a.username),
                password: non_empty(&a.password),
                encrypted_password: non_empty(&a.encrypted_password),
                destination: non_empty(&a.destination),
                filter: map_filter(&a.filter),
                invert_filter: a.invert_filter,
                auto_update: a.auto_update,
            })
        }
        MaterialType::Tfs => {
            let a = spec.tfs_attributes.clone().unwrap_or_default();
            Material::Tfs(TfsAttributes {
                name: non_empty(&a.name),
                url: non_empty(&a.url),
                project_path: non_empty(&a.project_path),
                domain: non_empty(&a.domain),
                username: non_empty(&a.username),
                password: non_empty(&a.password),
                encrypted_password: non_empty(&a.encrypted_password),
                destination: non_empty(&a.destination),
                auto_update: a.auto_update,
                filter: map_filter(&a.filter),
                invert_filter: a.invert_filter,
            })
        }
        MaterialType::Dependency => {
            let a = spec.dependency_attributes.clone().unwrap_or_default();
            Material::Dependency(DependencyAttributes {
                name: non_empty(&a.name),
                pipeline: non_empty(&a.pipeline),
                stage: non_empty(&a.stage),
                auto_update: a.auto_update,
                ignore_for_scheduling: a.ignore_for_scheduling,
            })
        }
        MaterialType::Package => {
            let a = spec.package_attributes.clone().unwrap_or_default();
            Material::Package(PackageAttributes {
                reference: non_empty(&a.reference),
            })
        }
        MaterialType::Plugin => {
            let a = spec.plugin_attributes.clone().unwrap_or_default();
            Material::Plugin(PluginAttributes {
                reference: non_empty(&a.reference),
                destination: non_empty(&a.destination),
                filter: map_filter(&a.filter),
                invert_filter: a.invert_filter,
            })
        }
    }
}

fn map_stage(spec: &StageSpec, resolved: Option<&ResolvedEnvironment>) -> Stage {
    let approval = spec.approval.clone().unwrap_or_default();

    Stage {
        name: spec.name.clone(),
        fetch_materials: spec.fetch_materials,
        clean_working_directory: spec.clean_working_dir,
        never_cleanup_artifacts: spec.never_cleanup_artifacts,
        approval: map_approval(&approval),
        environment_variables: map_variables(&spec.environment_variables, resolved, |name| {
            stage_key(&spec.name, name)
        }),
        jobs: spec
            .jobs
            .iter()
            .map(|job| map_job(&spec.name, job, resolved))
            .collect(),
    }
}

fn map_approval(spec: &ApprovalSpec) -> Approval {
    Approval {
        kind: spec.kind,
        allow_only_on_success: spec.allow_only_on_success,
        authorization: Authorization {
            users: spec.authorization.users.clone(),
            roles: spec.authorization.roles.clone(),
        },
    }
}

fn map_job(stage: &str, spec: &JobSpec, resolved: Option<&ResolvedEnvironment>) -> Job {
    Job {
        name: spec.name.clone(),
        run_instance_count: normalize_int_or_string(spec.run_instance_count.as_ref()),
        timeout: Some(
            spec.timeout
                .clone()
                .unwrap_or_else(|| IntOrString::string(DEFAULT_JOB_TIMEOUT)),
        ),
        environment_variables: map_variables(&spec.environment_variables, resolved, |name| {
            job_key(stage, &spec.name, name)
        }),
        resources: spec.resources.clone(),
        tasks: spec.tasks.iter().map(map_task).collect(),
        tabs: spec
            .tabs
            .iter()
            .map(|t| Tab {
                name: t.name.clone(),
                path: t.path.clone(),
            })
            .collect(),
        artifacts: spec.artifacts.iter().map(map_artifact).collect(),
        elastic_profile_id: non_empty(&spec.elastic_profile_id),
    }
}

fn map_properties(values: &[KeyValue]) -> Vec<ConfigProperty> {
    values
        .iter()
        .map(|kv| ConfigProperty::new(&kv.key, &kv.value))
        .collect()
}

fn map_artifact(spec: &ArtifactSpec) -> Artifact {
    Artifact {
        kind: spec.kind,
        source: non_empty(&spec.source),
        destination: spec.destination.as_deref().and_then(non_empty),
        artifact_id: non_empty(&spec.id),
        store_id: spec.store_id.as_deref().and_then(non_empty),
        configuration: map_properties(&spec.configuration),
    }
}

fn map_task(spec: &TaskSpec) -> Task {
    Task {
        attributes: map_task_attributes(spec),
        on_cancel: spec.on_cancel.as_deref().map(|cancel| CancelTask {
            attributes: map_task_attributes(cancel),
        }),
    }
}

fn map_task_attributes(spec: &TaskSpec) -> TaskAttributes {
    match spec.kind {
        TaskType::Exec => {
            let a = spec.exec_attributes.clone().unwrap_or_default();
            TaskAttributes::Exec(ExecAttributes {
                run_if: a.run_if,
                command: a.command,
                arguments: a.arguments,
                working_directory: a.working_directory.as_deref().and_then(non_empty),
            })
        }
        TaskType::Ant | TaskType::Rake => {
            let source = if spec.kind == TaskType::Ant {
                &spec.ant_attributes
            } else {
                &spec.rake_attributes
            };
            let a = source.clone().unwrap_or_default();
            let attributes = BuildFileAttributes {
                run_if: a.run_if,
                build_file: a.build_file,
                target: a.target,
                working_directory: a.working_directory,
            };
            if spec.kind == TaskType::Ant {
                TaskAttributes::Ant(attributes)
            } else {
                TaskAttributes::Rake(attributes)
            }
        }
        TaskType::Nant => {
            let a = spec.nant_attributes.clone().unwrap_or_default();
            TaskAttributes::Nant(NantAttributes {
                run_if: a.run_if,
                build_file: a.build_file,
                target: a.target,
                nant_path: a.nant_path,
                working_directory: a.working_directory,
            })
        }
        TaskType::Fetch => {
            let a = spec.fetch_attributes.clone().unwrap_or_default();
            TaskAttributes::Fetch(FetchAttributes {
                artifact_origin: a.artifact_origin,
                run_if: a.run_if,
                pipeline: a.pipeline,
                stage: a.stage,
                job: a.job,
                source: a.source,
                is_source_a_file: a.is_source_a_file,
                destination: a.destination,
                artifact_id: a.artifact_id,
                configuration: map_properties(&a.configuration),
            })
        }
        TaskType::Pluggable => {
            let a = spec.pluggable_attributes.clone().unwrap_or_default();
            TaskAttributes::Pluggable(PluggableAttributes {
                run_if: a.run_if,
                plugin_configuration: PluginConfiguration {
                    id: a.plugin_configuration.id,
                    version: a.plugin_configuration.version,
                },
                configuration: map_properties(&a.configuration),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ExecTaskSpec, GitMaterialSpec, KeySelector, TimerSpec, TrackingToolSpec,
    };
    use crate::dto::{LockBehavior, OriginType};
    use crate::hashing::resolve_environment;
    use crate::resolver::InMemoryResolver;

    fn spec() -> PipelineSpec {
        let mut job = JobSpec::new("j1");
        job.run_instance_count = Some(IntOrString::Int(0));
        job.tasks.push(
            TaskSpec::exec(ExecTaskSpec {
                command: "make".into(),
                ..Default::default()
            })
            .with_on_cancel(
                TaskSpec::exec(ExecTaskSpec {
                    command: "stop".into(),
                    ..Default::default()
                })
                .with_on_cancel(TaskSpec::exec(ExecTaskSpec::default())),
            ),
        );
        job.environment_variables.push(EnvironmentVariableSpec::from_secret(
            "TOKEN",
            KeySelector::new("ci", "creds", "token"),
        ));

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
    fn test_defaults_applied() {
        let config = to_external(&spec(), None).unwrap();

        assert_eq!(config.lock_behavior, Some(LockBehavior::None));
        assert_eq!(config.origin.as_ref().unwrap().kind, OriginType::GoCd);
        assert_eq!(config.template, None);
        assert_eq!(config.label_template, None);
        assert!(config.tracking_tool.is_none());
        assert!(config.timer.is_none());

        let job = &config.stages[0].jobs[0];
        assert_eq!(job.run_instance_count, None);
        assert_eq!(job.timeout, Some(IntOrString::string("never")));
        assert_eq!(job.elastic_profile_id, None);
    }

    #[test]
    fn test_empty_filter_is_dropped() {
        let config = to_external(&spec(), None).unwrap();
        match &config.materials[0] {
            Material::Git(git) => {
                assert_eq!(git.filter, None);
                assert_eq!(git.username, None);
                assert_eq!(git.branch.as_deref(), Some("main"));
            }
            other => panic!("unexpected material: {other:?}"),
        }
    }

    #[test]
    fn test_on_cancel_mapped_one_level_only() {
        let config = to_external(&spec(), None).unwrap();
        let task = &config.stages[0].jobs[0].tasks[0];
        match &task.on_cancel.as_ref().unwrap().attributes {
            TaskAttributes::Exec(a) => assert_eq!(a.command, "stop"),
            other => panic!("unexpected attributes: {other:?}"),
        }
    }

    #[test]
    fn test_empty_tracking_tool_and_timer_are_dropped() {
        let mut spec = spec();
        spec.tracking_tool = Some(TrackingToolSpec::default());
        spec.timer = Some(TimerSpec::default());
        let config = to_external(&spec, None).unwrap();
        assert!(config.tracking_tool.is_none());
        assert!(config.timer.is_none());

        spec.timer = Some(TimerSpec {
            spec: "0 0 22 ? * MON-FRI".into(),
            only_on_changes: true,
        });
        let config = to_external(&spec, None).unwrap();
        assert!(config.timer.unwrap().only_on_changes);
    }

    #[test]
    fn test_invalid_spec_is_rejected() {
        let mut spec = spec();
        spec.stages[0].jobs[0].tasks[0].kind = TaskType::Fetch;
        assert!(to_external(&spec, None).is_err());
    }

    #[tokio::test]
    async fn test_secret_values_filled_only_when_resolved() {
        let spec = spec();
        let unresolved = to_external(&spec, None).unwrap();
        let var = &unresolved.stages[0].jobs[0].environment_variables[0];
        assert!(var.secure);
        assert_eq!(var.value, None);

        let resolver = InMemoryResolver::new().with_secret("ci/creds", "token", "abc");
        let env = resolve_environment(&spec, &resolver).await.unwrap();
        let resolved = to_external(&spec, Some(&env)).unwrap();
        let var = &resolved.stages[0].jobs[0].environment_variables[0];
        assert!(var.secure);
        assert_eq!(var.value.as_deref(), Some("abc"));
    }

    #[test]
    fn test_create_request_carries_group_outside() {
        let request = create_request(&spec(), None).unwrap();
        assert_eq!(request.group.as_deref(), Some("default"));
        assert_eq!(request.pipeline.group, None);
    }
}
