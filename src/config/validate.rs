// src/config/validate.rs

use globset::Glob;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::dag::graph::{canonical_name, is_reserved, TaskGraph};
use crate::errors::{Result, StylewatchError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = StylewatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_paths(cfg)?;
    validate_task_names(cfg)?;
    validate_task_dependencies(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn validate_paths(cfg: &RawConfigFile) -> Result<()> {
    let paths = &cfg.paths;

    if paths.build.is_empty() {
        return Err(StylewatchError::ConfigError(
            "[paths].build must contain at least one pattern".to_string(),
        ));
    }
    if paths.watch.is_empty() {
        return Err(StylewatchError::ConfigError(
            "[paths].watch must contain at least one pattern".to_string(),
        ));
    }
    if paths.manifest_name.trim().is_empty() {
        return Err(StylewatchError::ConfigError(
            "[paths].manifest_name must not be empty".to_string(),
        ));
    }

    let all_patterns = paths
        .build
        .iter()
        .chain(paths.watch.iter())
        .chain(paths.exclude.iter());
    for pattern in all_patterns {
        Glob::new(pattern).map_err(|e| {
            StylewatchError::ConfigError(format!("invalid glob pattern '{pattern}': {e}"))
        })?;
    }

    Ok(())
}

fn validate_task_names(cfg: &RawConfigFile) -> Result<()> {
    for name in cfg.task.keys() {
        if is_reserved(name) {
            return Err(StylewatchError::ConfigError(format!(
                "task '{name}' is built in and cannot be redefined"
            )));
        }
        if name.trim().is_empty() {
            return Err(StylewatchError::ConfigError(
                "task names must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_task_dependencies(cfg: &RawConfigFile) -> Result<()> {
    let graph = TaskGraph::from_tasks(&cfg.task);

    for (name, task) in cfg.task.iter() {
        for dep in task.after.iter() {
            if !graph.contains(dep) {
                return Err(StylewatchError::ConfigError(format!(
                    "task '{}' has unknown dependency '{}' in `after`",
                    name, dep
                )));
            }
            if canonical_name(dep) == name.as_str() {
                return Err(StylewatchError::ConfigError(format!(
                    "task '{}' cannot depend on itself in `after`",
                    name
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawConfigFile) -> Result<()> {
    // Edge direction: prerequisite -> task.
    let tasks = TaskGraph::from_tasks(&cfg.task);
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in tasks.tasks() {
        graph.add_node(name);
    }

    for name in tasks.tasks() {
        for dep in tasks.dependencies_of(name) {
            graph.add_edge(dep.as_str(), name, ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(StylewatchError::TaskCycle(format!(
                "cycle detected in task graph involving task '{}'",
                node
            )))
        }
    }
}
