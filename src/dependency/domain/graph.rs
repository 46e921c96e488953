//! Per-project dependency graph.
//!
//! # Edge direction
//!
//! Edges point `predecessor → successor`. Adding `from → to` closes a cycle
//! when `from` is already reachable from `to` through sequencing edges.

use super::{Dependency, DependencyError, DependencyId, DependencyLabel, DependencyType, NewDependency, Perspective};
use crate::project::domain::{PhaseId, ProjectId, ProjectPlan, TaskId};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// What a dependency view shows about the task on the other end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    /// Task identifier.
    pub id: TaskId,
    /// Task name.
    pub name: String,
    /// Phase holding the task.
    pub phase_id: PhaseId,
    /// Name of that phase.
    pub phase_name: String,
}

/// Borrowed view of one edge from one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyView<'a> {
    /// The stored edge.
    pub dependency: &'a Dependency,
    /// The task on the other end.
    pub other: &'a TaskSummary,
    /// Relationship label as seen from the viewing task.
    pub label: DependencyLabel,
}

impl DependencyView<'_> {
    /// Returns an owned, serializable copy of the view.
    #[must_use]
    pub fn to_record(&self) -> DependencyRecord {
        DependencyRecord {
            dependency_id: self.dependency.id(),
            task: self.other.clone(),
            label: self.label,
            lead_lag_days: self.dependency.lead_lag_days(),
            note: self.dependency.note().map(str::to_owned),
        }
    }
}

/// Owned dependency view for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    /// Stored edge identifier.
    pub dependency_id: DependencyId,
    /// The task on the other end.
    pub task: TaskSummary,
    /// Relationship label as seen from the viewing task.
    pub label: DependencyLabel,
    /// Lead or lag in days.
    pub lead_lag_days: Option<i32>,
    /// Optional note.
    pub note: Option<String>,
}

/// Iterator over the edges incident to one task.
///
/// The iterator is lazy and finite. Calling
/// [`DependencyGraph::predecessors_of`] or [`DependencyGraph::successors_of`]
/// again starts a fresh pass.
#[derive(Debug, Clone)]
pub struct Neighbors<'a> {
    graph: &'a DependencyGraph,
    ids: std::slice::Iter<'a, DependencyId>,
    perspective: Perspective,
}

impl<'a> Iterator for Neighbors<'a> {
    type Item = DependencyView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for id in self.ids.by_ref() {
            let Some(dependency) = self.graph.edges.get(id) else {
                continue;
            };
            let other_id = match self.perspective {
                Perspective::Predecessor => dependency.successor(),
                Perspective::Successor => dependency.predecessor(),
            };
            let Some(other) = self.graph.tasks.get(&other_id) else {
                continue;
            };
            return Some(DependencyView {
                dependency,
                other,
                label: DependencyLabel::for_view(dependency.kind(), self.perspective),
            });
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.ids.size_hint().1)
    }
}

/// Directed, typed dependency edges among one project's tasks.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    project_id: ProjectId,
    tasks: HashMap<TaskId, TaskSummary>,
    edges: HashMap<DependencyId, Dependency>,
    outgoing: HashMap<TaskId, Vec<DependencyId>>,
    incoming: HashMap<TaskId, Vec<DependencyId>>,
}

const NO_EDGES: &[DependencyId] = &[];

impl DependencyGraph {
    /// Builds a graph from task summaries and stored edges.
    ///
    /// Edges referencing unknown tasks or another project are skipped with a
    /// warning.
    #[must_use]
    pub fn from_parts(
        project_id: ProjectId,
        tasks: impl IntoIterator<Item = TaskSummary>,
        dependencies: impl IntoIterator<Item = Dependency>,
    ) -> Self {
        let mut graph = Self {
            project_id,
            tasks: tasks.into_iter().map(|task| (task.id, task)).collect(),
            ..Self::default()
        };
        for dependency in dependencies {
            let known = dependency.project_id() == project_id
                && graph.tasks.contains_key(&dependency.predecessor())
                && graph.tasks.contains_key(&dependency.successor());
            if known {
                graph.insert(dependency);
            } else {
                tracing::warn!(
                    project_id = %project_id,
                    dependency_id = %dependency.id(),
                    "skipping dependency with unknown endpoint"
                );
            }
        }
        graph
    }

    /// Builds a graph over the tasks of a loaded plan.
    #[must_use]
    pub fn from_plan(plan: &ProjectPlan, dependencies: impl IntoIterator<Item = Dependency>) -> Self {
        let summaries = plan.tasks().iter().map(|task| TaskSummary {
            id: task.id(),
            name: task.name().to_owned(),
            phase_id: task.phase_id(),
            phase_name: plan
                .phase(task.phase_id())
                .map(|phase| phase.name().to_owned())
                .unwrap_or_default(),
        });
        Self::from_parts(plan.project_id(), summaries, dependencies)
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the number of stored edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Looks up an edge.
    #[must_use]
    pub fn edge(&self, id: DependencyId) -> Option<&Dependency> {
        self.edges.get(&id)
    }

    /// Iterates over all edges in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = &Dependency> + '_ {
        self.edges.values()
    }

    /// Validates and adds an edge, returning the stored copy.
    ///
    /// `blocked_by` requests are stored as `blocks` with the endpoints
    /// swapped.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::UnknownTask`],
    /// [`DependencyError::SelfDependency`],
    /// [`DependencyError::DuplicateEdge`], or [`DependencyError::Cycle`]. The
    /// graph is unchanged on error.
    pub fn add_edge(
        &mut self,
        spec: NewDependency,
        clock: &impl Clock,
    ) -> Result<Dependency, DependencyError> {
        let request = spec.normalized();
        let predecessor = request.predecessor();
        let successor = request.successor();
        for endpoint in [predecessor, successor] {
            if !self.tasks.contains_key(&endpoint) {
                return Err(DependencyError::UnknownTask(endpoint));
            }
        }
        if predecessor == successor {
            return Err(DependencyError::SelfDependency(predecessor));
        }
        if self.has_edge(predecessor, successor, request.kind()) {
            return Err(DependencyError::DuplicateEdge {
                predecessor,
                successor,
                kind: request.kind(),
            });
        }
        if request.kind().is_ordering_relevant() {
            if let Some(path) = self.path_between(successor, predecessor) {
                let mut cycle = Vec::with_capacity(path.len() + 1);
                cycle.push(predecessor);
                cycle.extend(path);
                return Err(DependencyError::Cycle { path: cycle });
            }
        }

        let dependency = Dependency::new(self.project_id, request, clock);
        self.insert(dependency.clone());
        Ok(dependency)
    }

    /// Removes an edge, returning it when it existed.
    pub fn remove_edge(&mut self, id: DependencyId) -> Option<Dependency> {
        let dependency = self.edges.remove(&id)?;
        if let Some(ids) = self.outgoing.get_mut(&dependency.predecessor()) {
            ids.retain(|existing| *existing != id);
        }
        if let Some(ids) = self.incoming.get_mut(&dependency.successor()) {
            ids.retain(|existing| *existing != id);
        }
        Some(dependency)
    }

    /// Removes a task and every edge touching it, returning the removed
    /// edges.
    pub fn remove_task(&mut self, task_id: TaskId) -> Vec<Dependency> {
        let incident: Vec<DependencyId> = self
            .outgoing
            .get(&task_id)
            .into_iter()
            .chain(self.incoming.get(&task_id))
            .flatten()
            .copied()
            .collect();
        let removed = incident
            .into_iter()
            .filter_map(|id| self.remove_edge(id))
            .collect();
        self.outgoing.remove(&task_id);
        self.incoming.remove(&task_id);
        self.tasks.remove(&task_id);
        removed
    }

    /// Iterates over edges whose successor is `task_id`, labelled from that
    /// task's side.
    #[must_use]
    pub fn predecessors_of(&self, task_id: TaskId) -> Neighbors<'_> {
        Neighbors {
            graph: self,
            ids: self.incoming.get(&task_id).map_or(NO_EDGES, Vec::as_slice).iter(),
            perspective: Perspective::Successor,
        }
    }

    /// Iterates over edges whose predecessor is `task_id`, labelled from
    /// that task's side.
    #[must_use]
    pub fn successors_of(&self, task_id: TaskId) -> Neighbors<'_> {
        Neighbors {
            graph: self,
            ids: self.outgoing.get(&task_id).map_or(NO_EDGES, Vec::as_slice).iter(),
            perspective: Perspective::Predecessor,
        }
    }

    fn insert(&mut self, dependency: Dependency) {
        let id = dependency.id();
        self.outgoing.entry(dependency.predecessor()).or_default().push(id);
        self.incoming.entry(dependency.successor()).or_default().push(id);
        self.edges.insert(id, dependency);
    }

    fn has_edge(&self, predecessor: TaskId, successor: TaskId, kind: DependencyType) -> bool {
        self.edges.values().any(|edge| {
            edge.kind() == kind
                && ((edge.predecessor() == predecessor && edge.successor() == successor)
                    || (kind.is_symmetric()
                        && edge.predecessor() == successor
                        && edge.successor() == predecessor))
        })
    }

    /// Depth-first search along sequencing edges. Returns the path from
    /// `start` to `target` inclusive.
    fn path_between(&self, start: TaskId, target: TaskId) -> Option<Vec<TaskId>> {
        let mut stack = vec![start];
        let mut visited: HashSet<TaskId> = HashSet::from([start]);
        let mut parent: HashMap<TaskId, TaskId> = HashMap::new();
        let budget = self.tasks.len();

        while let Some(current) = stack.pop() {
            if current == target {
                return Some(rebuild_path(start, target, &parent));
            }
            if visited.len() > budget {
                break;
            }
            let next_tasks = self
                .outgoing
                .get(&current)
                .into_iter()
                .flatten()
                .filter_map(|id| self.edges.get(id))
                .filter(|edge| edge.kind().is_ordering_relevant())
                .map(Dependency::successor);
            for next in next_tasks {
                if visited.insert(next) {
                    parent.insert(next, current);
                    stack.push(next);
                }
            }
        }
        None
    }
}

fn rebuild_path(start: TaskId, target: TaskId, parent: &HashMap<TaskId, TaskId>) -> Vec<TaskId> {
    let mut path = vec![target];
    let mut cursor = target;
    while cursor != start {
        let Some(previous) = parent.get(&cursor) else {
            break;
        };
        cursor = *previous;
        path.push(cursor);
    }
    path.reverse();
    path
}
