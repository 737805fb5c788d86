use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::domain::Solution;
use crate::error::SolverError;

pub type ProblemId = Uuid;

enum Entry {
    Processing,
    Done(Solution),
    Error(String),
}

/// Tracks the lifecycle of a submitted problem: `Processing` until the
/// solver finishes, then either `Done` or `Error`. Grounded on the
/// reference's in-memory problem store, generalized from a single-writer
/// map to a `RwLock` since the async HTTP surface can poll a problem's
/// state while the solver is still writing into another entry.
#[derive(Default)]
pub struct InMemoryRepository {
    entries: RwLock<HashMap<ProblemId, Entry>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_problem(&self, id: ProblemId) -> Result<(), SolverError> {
        let mut guard = self.entries.write().unwrap();
        if guard.contains_key(&id) {
            return Err(SolverError::AlreadyExists);
        }
        guard.insert(id, Entry::Processing);
        Ok(())
    }

    pub fn set_solution(&self, id: ProblemId, solution: Solution) -> Result<(), SolverError> {
        let mut guard = self.entries.write().unwrap();
        if !guard.contains_key(&id) {
            return Err(SolverError::NotFound);
        }
        guard.insert(id, Entry::Done(solution));
        Ok(())
    }

    pub fn set_error(&self, id: ProblemId, error: &SolverError) -> Result<(), SolverError> {
        let mut guard = self.entries.write().unwrap();
        if !guard.contains_key(&id) {
            return Err(SolverError::NotFound);
        }
        guard.insert(id, Entry::Error(error.to_string()));
        Ok(())
    }

    pub fn get_solution_by_problem_id(&self, id: ProblemId) -> Result<Solution, SolverError> {
        let guard = self.entries.read().unwrap();
        match guard.get(&id) {
            None => Err(SolverError::NotFound),
            Some(Entry::Processing) => Err(SolverError::InProcess),
            Some(Entry::Error(msg)) => Err(SolverError::AlgorithmFailed(msg.clone())),
            Some(Entry::Done(solution)) => Ok(solution.clone()),
        }
    }
}
