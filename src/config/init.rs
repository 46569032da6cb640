// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates bascule.yml template files.

use std::path::Path;

use crate::error::{Error, Result};

use super::{CONFIG_FILENAME, Config, EnvValue};

pub fn init_config(dir: &Path, application: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(name) = application {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidConfig(
                "application name cannot be empty".to_string(),
            ));
        }
        config.application = Some(name.to_string());
        config.deployment_group = Some(format!("{}-group", name));
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    let application = config.application.as_deref().unwrap_or("my-app");
    let group = config.deployment_group.as_deref().unwrap_or("my-app-group");
    let scaling_group = config
        .scaling_group
        .as_ref()
        .map(|g| g.as_str())
        .unwrap_or("my-app-asg");
    let (bucket, key_var, key_default) = match &config.revision {
        Some(revision) => (
            literal(&revision.bucket),
            env_var(&revision.key),
            env_default(&revision.key),
        ),
        None => ("my-artifacts", "BASCULE_REVISION_KEY", "my-app/latest.zip"),
    };

    format!(
        r#"application: {application}
deployment_group: {group}
deployment_type: {deployment_type}
scaling_group: {scaling_group}
revision:
  bucket: {bucket}
  key:
    env: {key_var}
    default: {key_default}
# Tag keys marking the new instance and the serving instance
# tags:
#   target: {target}
#   active: {active}
# Per-environment overrides, selected with --environment
# profiles:
#   staging:
#     deployment_group: {group}-staging
#     scaling_group: {scaling_group}-staging
"#,
        deployment_type = config.deployment_type,
        target = config.tags.target,
        active = config.tags.active,
    )
}

fn literal(value: &EnvValue) -> &str {
    match value {
        EnvValue::Literal(s) => s.as_str(),
        EnvValue::FromEnv { default, .. } => default.as_deref().unwrap_or_default(),
    }
}

fn env_var(value: &EnvValue) -> &str {
    match value {
        EnvValue::FromEnv { var, .. } => var.as_str(),
        EnvValue::Literal(_) => "BASCULE_REVISION_KEY",
    }
}

fn env_default(value: &EnvValue) -> &str {
    match value {
        EnvValue::FromEnv { default, .. } => default.as_deref().unwrap_or_default(),
        EnvValue::Literal(s) => s.as_str(),
    }
}
