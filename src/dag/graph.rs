// src/dag/graph.rs

use std::collections::{BTreeMap, HashSet};

use crate::config::model::{ConfigFile, TaskConfig};
use crate::errors::{Result, StylewatchError};

pub const COMPILE: &str = "compile";
pub const WATCH: &str = "watch";
pub const DEFAULT: &str = "default";

/// Historical task names accepted on the command line and in `after`.
const ALIASES: &[(&str, &str)] = &[("sass", COMPILE), ("sass:watch", WATCH)];

/// Map an alias to its built-in task name; other names pass through.
pub fn canonical_name(name: &str) -> &str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, target)| *target)
        .unwrap_or(name)
}

/// Built-in tasks that a config file may not redefine.
pub fn is_reserved(name: &str) -> bool {
    let name = canonical_name(name);
    name == COMPILE || name == WATCH
}

/// What a task does when it runs, after its prerequisites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskBody {
    /// One pass of the stylesheet pipeline.
    Compile,
    /// Recompile on change until shutdown.
    Watch,
    /// Nothing of its own; only its prerequisites.
    Composite,
}

#[derive(Debug, Clone)]
struct TaskNode {
    body: TaskBody,
    /// Canonical names, in declared order.
    deps: Vec<String>,
    description: Option<String>,
}

impl TaskNode {
    fn built_in(body: TaskBody, deps: Vec<String>, description: &str) -> Self {
        Self {
            body,
            deps,
            description: Some(description.to_string()),
        }
    }
}

/// A task in an execution plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTask {
    pub name: String,
    pub body: TaskBody,
    pub description: Option<String>,
}

/// Named tasks and their ordered prerequisites.
///
/// Always contains `compile`, `watch` and `default` (`after = ["compile",
/// "watch"]` unless the config overrides it), plus every `[task.<name>]`.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    nodes: BTreeMap<String, TaskNode>,
}

impl TaskGraph {
    /// Build from raw `[task.<name>]` tables.
    ///
    /// Does not check references; use on validated input or before
    /// validation only for inspection.
    pub fn from_tasks(tasks: &BTreeMap<String, TaskConfig>) -> Self {
        let mut nodes = BTreeMap::new();

        nodes.insert(
            COMPILE.to_string(),
            TaskNode::built_in(TaskBody::Compile, Vec::new(), "compile stylesheets once"),
        );
        nodes.insert(
            WATCH.to_string(),
            TaskNode::built_in(TaskBody::Watch, Vec::new(), "recompile on change"),
        );
        nodes.insert(
            DEFAULT.to_string(),
            TaskNode::built_in(
                TaskBody::Composite,
                vec![COMPILE.to_string(), WATCH.to_string()],
                "compile, then watch",
            ),
        );

        for (name, task) in tasks {
            let deps = task
                .after
                .iter()
                .map(|d| canonical_name(d).to_string())
                .collect();
            nodes.insert(
                name.clone(),
                TaskNode {
                    body: TaskBody::Composite,
                    deps,
                    description: task.description.clone(),
                },
            );
        }

        Self { nodes }
    }

    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self::from_tasks(cfg.tasks())
    }

    /// All task names (canonical).
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(canonical_name(name))
    }

    pub fn body_of(&self, name: &str) -> Option<TaskBody> {
        self.nodes.get(canonical_name(name)).map(|n| n.body)
    }

    /// Free-form text from `[task.<name>] description`, or the built-in
    /// summary.
    pub fn description_of(&self, name: &str) -> Option<&str> {
        self.nodes
            .get(canonical_name(name))
            .and_then(|n| n.description.as_deref())
    }

    /// Immediate prerequisites of a task, in declared order.
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.nodes
            .get(canonical_name(name))
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Sequential execution order for `name`.
    ///
    /// Prerequisites run depth-first in declared order, each task at most
    /// once, and the requested task last. For `default` this is
    /// `[compile, watch, default]`: `compile` finishes before `watch` starts.
    pub fn execution_plan(&self, name: &str) -> Result<Vec<PlannedTask>> {
        let name = canonical_name(name);
        if !self.nodes.contains_key(name) {
            return Err(StylewatchError::UnknownTask(name.to_string()));
        }

        let mut plan = Vec::new();
        let mut done = HashSet::new();
        let mut visiting = HashSet::new();
        self.visit(name, &mut visiting, &mut done, &mut plan)?;
        Ok(plan)
    }

    fn visit<'a>(
        &'a self,
        name: &'a str,
        visiting: &mut HashSet<&'a str>,
        done: &mut HashSet<&'a str>,
        plan: &mut Vec<PlannedTask>,
    ) -> Result<()> {
        if done.contains(name) {
            return Ok(());
        }
        if !visiting.insert(name) {
            return Err(StylewatchError::TaskCycle(format!(
                "cycle detected in task graph involving task '{name}'"
            )));
        }

        let node = self
            .nodes
            .get(name)
            .ok_or_else(|| StylewatchError::UnknownTask(name.to_string()))?;

        for dep in &node.deps {
            self.visit(dep.as_str(), visiting, done, plan)?;
        }

        visiting.remove(name);
        done.insert(name);
        plan.push(PlannedTask {
            name: name.to_string(),
            body: node.body,
            description: node.description.clone(),
        });
        Ok(())
    }
}
