use crate::core::project::Project;
use crate::core::validation::messages;
use crate::error::OptimizerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Anything that can hand the optimizer a finite, materialized list of
/// candidate projects.
///
/// The optimizer needs random access and sorts its own copy, so sources
/// return an owned `Vec` rather than a live cursor.
pub trait ProjectSource {
    fn load_projects(&self) -> Result<Vec<Project>, OptimizerError>;
}

impl ProjectSource for Vec<Project> {
    fn load_projects(&self) -> Result<Vec<Project>, OptimizerError> {
        Ok(self.clone())
    }
}

impl ProjectSource for [Project] {
    fn load_projects(&self) -> Result<Vec<Project>, OptimizerError> {
        Ok(self.to_vec())
    }
}

/// Creation and modification timestamps of a stored project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditMetadata {
    pub created_at: DateTime<Utc>,
    pub last_modified_at: DateTime<Utc>,
}

impl AuditMetadata {
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            last_modified_at: now,
        }
    }
}

/// A project together with the identity a store would give it.
///
/// The id, audit metadata and version are bookkeeping only; the optimizer
/// works on the inner [`Project`] and ignores the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    id: Uuid,
    project: Project,
    audit: AuditMetadata,
    version: u64,
}

impl ProjectRecord {
    /// Wrap a project in a fresh record with a random id at version 0.
    pub fn new(project: Project) -> Self {
        Self::with_id(Uuid::new_v4(), project)
    }

    /// Create a record with a specific ID (useful for testing / determinism).
    pub fn with_id(id: Uuid, project: Project) -> Self {
        Self {
            id,
            project,
            audit: AuditMetadata::now(),
            version: 0,
        }
    }

    /// Replace the project, bumping the version and modification time.
    pub fn touch(&mut self, project: Project) {
        self.project = project;
        self.audit.last_modified_at = Utc::now();
        self.version += 1;
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn audit(&self) -> &AuditMetadata {
        &self.audit
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

/// An insertion-ordered, in-memory collection of project records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectCatalog {
    records: Vec<ProjectRecord>,
}

impl ProjectCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one project and return the id it was stored under.
    pub fn add(&mut self, project: Project) -> Uuid {
        let record = ProjectRecord::new(project);
        let id = record.id();
        self.records.push(record);
        id
    }

    /// Add a non-empty batch of projects, returning their ids in order.
    pub fn add_all<I>(&mut self, projects: I) -> Result<Vec<Uuid>, OptimizerError>
    where
        I: IntoIterator<Item = Project>,
    {
        let batch: Vec<Project> = projects.into_iter().collect();
        if batch.is_empty() {
            return Err(OptimizerError::invalid_input(messages::EMPTY_BATCH));
        }
        Ok(batch.into_iter().map(|p| self.add(p)).collect())
    }

    pub fn find_by_id(&self, id: Uuid) -> Result<&ProjectRecord, OptimizerError> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| OptimizerError::NotFound(format!("Project not found for ID: {}", id)))
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Materialize the stored projects in insertion order.
    pub fn projects(&self) -> Vec<Project> {
        self.records.iter().map(|r| r.project.clone()).collect()
    }
}

impl ProjectSource for ProjectCatalog {
    fn load_projects(&self) -> Result<Vec<Project>, OptimizerError> {
        Ok(self.projects())
    }
}

impl FromIterator<Project> for ProjectCatalog {
    fn from_iter<T: IntoIterator<Item = Project>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().map(ProjectRecord::new).collect(),
        }
    }
}
