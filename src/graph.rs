//! Dependency ordering of jobs.
//!
//! Produces a topological order by depth-first search with three-colour
//! marking. Reaching a job that is still on the recursion stack means the
//! dependency graph has a cycle.
//!
//! Dependency ids that name no submitted job are treated as already
//! satisfied.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::HashMap;

use crate::error::{Result, SolveError};
use crate::models::{Job, JobId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Dependency graph over a borrowed job list.
#[derive(Debug, Clone)]
pub struct DependencyGraph<'a> {
    jobs: &'a [Job],
    index: HashMap<JobId, usize>,
}

impl<'a> DependencyGraph<'a> {
    /// Indexes `jobs` by id. A repeated id resolves to its last occurrence.
    pub fn new(jobs: &'a [Job]) -> Self {
        let index = jobs.iter().enumerate().map(|(i, j)| (j.id, i)).collect();
        Self { jobs, index }
    }

    /// Jobs ordered so that every job follows all of its dependencies.
    ///
    /// Roots are visited in submission order, dependencies in the order
    /// they are listed.
    ///
    /// # Errors
    /// [`SolveError::CyclicDependency`] naming the job at which the back
    /// edge was found.
    pub fn topological_order(&self) -> Result<Vec<&'a Job>> {
        let mut marks = vec![Mark::Unvisited; self.jobs.len()];
        let mut order = Vec::with_capacity(self.jobs.len());

        for job in self.jobs {
            let idx = self.index[&job.id];
            if marks[idx] == Mark::Unvisited {
                self.visit(idx, &mut marks, &mut order)?;
            }
        }

        Ok(order)
    }

    fn visit(&self, idx: usize, marks: &mut [Mark], order: &mut Vec<&'a Job>) -> Result<()> {
        match marks[idx] {
            Mark::Done => return Ok(()),
            Mark::InProgress => {
                return Err(SolveError::CyclicDependency {
                    job_id: self.jobs[idx].id,
                })
            }
            Mark::Unvisited => {}
        }

        marks[idx] = Mark::InProgress;
        let job = &self.jobs[idx];
        for dep in &job.dependencies {
            if let Some(&dep_idx) = self.index.get(dep) {
                self.visit(dep_idx, marks, order)?;
            }
        }
        marks[idx] = Mark::Done;
        order.push(job);
        Ok(())
    }
}

/// Shorthand for `DependencyGraph::new(jobs).topological_order()`.
pub fn topological_order(jobs: &[Job]) -> Result<Vec<&Job>> {
    DependencyGraph::new(jobs).topological_order()
}
