use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;

use modelfaker_engine::{FakerSettings, RunOptions};

use super::{RegistryError, RegistryResult};

/// Metadata captured when a fake-db run starts.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub run_dir: PathBuf,
    pub manifest: PathBuf,
    pub data: PathBuf,
    pub out: PathBuf,
    /// `all`, an app name or an `app.Name` faker id.
    pub scope: String,
    pub options: RunOptions,
    pub settings: FakerSettings,
}

/// `config.json` of a run directory.
#[derive(Debug, Serialize)]
struct RunConfig<'a> {
    run_id: &'a str,
    started_at: String,
    manifest: &'a Path,
    data: &'a Path,
    out: &'a Path,
    scope: &'a str,
    options: &'a RunOptions,
    settings: &'a FakerSettings,
    git: GitInfo,
}

#[derive(Debug, Serialize)]
struct GitInfo {
    commit: Option<String>,
    dirty: Option<bool>,
}

/// Artifact locations inside `<run_dir>/<timestamp>__run_<id>/`.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub logs_path: PathBuf,
    pub report_path: PathBuf,
}

pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ");
    let root = ctx.run_dir.join(format!("{timestamp}__run_{}", ctx.run_id));
    create_dir_all(&root)?;

    let config = RunConfig {
        run_id: &ctx.run_id,
        started_at: ctx.started_at.to_rfc3339(),
        manifest: &ctx.manifest,
        data: &ctx.data,
        out: &ctx.out,
        scope: &ctx.scope,
        options: &ctx.options,
        settings: &ctx.settings,
        git: git_info(),
    };
    write_json(&root.join("config.json"), &config)?;

    let logs_path = root.join("logs.ndjson");
    OpenOptions::new().create(true).append(true).open(&logs_path)?;

    Ok(RunPaths {
        report_path: root.join("report.json"),
        logs_path,
        root,
    })
}

fn git_info() -> GitInfo {
    let git = |args: &[&str]| {
        Command::new("git")
            .args(args)
            .output()
            .ok()
            .filter(|output| output.status.success())
    };
    let commit = git(&["rev-parse", "HEAD"])
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|value| !value.is_empty());
    let dirty = git(&["status", "--porcelain"]).map(|output| !output.stdout.is_empty());
    GitInfo { commit, dirty }
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    serde_json::to_writer_pretty(file, value).map_err(RegistryError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_run_writes_config_and_log_file() {
        let run_dir = std::env::temp_dir().join(format!("modelfaker-runs-{}", uuid::Uuid::new_v4()));
        let ctx = RunContext {
            run_id: "abc".to_string(),
            started_at: Utc::now(),
            run_dir: run_dir.clone(),
            manifest: PathBuf::from("fakers.toml"),
            data: PathBuf::from("data.json"),
            out: PathBuf::from("data.json"),
            scope: "crm".to_string(),
            options: RunOptions::default(),
            settings: FakerSettings::default(),
        };

        let paths = start_run(&ctx).expect("start run");
        assert!(paths.root.starts_with(&run_dir));
        assert!(
            paths
                .root
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with("__run_abc"))
        );
        assert!(paths.logs_path.exists());

        let config: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(paths.root.join("config.json")).expect("read config"),
        )
        .expect("parse config");
        assert_eq!(config["scope"], "crm");
        assert_eq!(config["settings"]["max_tries"], 3);
        assert_eq!(config["options"]["skip_deletion"], false);

        std::fs::remove_dir_all(&run_dir).expect("cleanup");
    }
}
