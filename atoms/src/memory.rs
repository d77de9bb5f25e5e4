//! In-memory implementation of every repository port, for tests and local runs.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::boards::model::Board;
use crate::boards::repository::BoardRepository;
use crate::companies::model::{Company, UserCompanyStatus};
use crate::companies::repository::{CompanyRepository, CompanyStatusRepository};
use crate::documents::model::Document;
use crate::documents::repository::DocumentRepository;
use crate::error::{AtomError, AtomResult};
use crate::tasks::model::Task;
use crate::tasks::repository::{TaskRepository, MAX_TRANSACTION_ITEMS};
use crate::users::model::DriverProfile;
use crate::users::repository::ProfileRepository;
use crate::vehicles::model::Vehicle;
use crate::vehicles::repository::VehicleRepository;

type UserScoped = (String, String);

#[derive(Debug, Default)]
struct MemoryState {
    boards: HashMap<String, Board>,
    /// Keyed by (board_id, task_id).
    tasks: HashMap<UserScoped, Task>,
    companies: HashMap<String, Company>,
    /// Keyed by (user_id, company_id).
    company_statuses: HashMap<UserScoped, UserCompanyStatus>,
    documents: HashMap<UserScoped, Document>,
    vehicles: HashMap<UserScoped, Vehicle>,
    profiles: HashMap<String, DriverProfile>,
}

/// Thread-safe store shared by all ports; clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AtomResult<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|e| AtomError::persistence(format!("memory store poisoned: {}", e)))
    }

    fn write(&self) -> AtomResult<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|e| AtomError::persistence(format!("memory store poisoned: {}", e)))
    }
}

fn key(a: &str, b: &str) -> UserScoped {
    (a.to_string(), b.to_string())
}

#[async_trait]
impl BoardRepository for MemoryStore {
    async fn put_board(&self, board: &Board) -> AtomResult<()> {
        self.write()?.boards.insert(board.board_id.clone(), board.clone());
        Ok(())
    }

    async fn get_board(&self, board_id: &str) -> AtomResult<Option<Board>> {
        Ok(self.read()?.boards.get(board_id).cloned())
    }

    async fn list_boards(&self, owner_id: &str) -> AtomResult<Vec<Board>> {
        Ok(self
            .read()?
            .boards
            .values()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn put_task(&self, task: &Task) -> AtomResult<()> {
        self.write()?
            .tasks
            .insert(key(&task.board_id, &task.task_id), task.clone());
        Ok(())
    }

    async fn get_task(&self, board_id: &str, task_id: &str) -> AtomResult<Option<Task>> {
        Ok(self.read()?.tasks.get(&key(board_id, task_id)).cloned())
    }

    async fn list_tasks(&self, board_id: &str) -> AtomResult<Vec<Task>> {
        Ok(self
            .read()?
            .tasks
            .values()
            .filter(|t| t.board_id == board_id)
            .cloned()
            .collect())
    }

    async fn put_tasks_atomic(&self, tasks: &[Task]) -> AtomResult<()> {
        if tasks.len() > MAX_TRANSACTION_ITEMS {
            return Err(AtomError::Conflict(format!(
                "a single move may rewrite at most {} tasks",
                MAX_TRANSACTION_ITEMS
            )));
        }
        let mut state = self.write()?;
        // Check every row before touching any
        if let Some(missing) = tasks
            .iter()
            .find(|t| !state.tasks.contains_key(&key(&t.board_id, &t.task_id)))
        {
            return Err(AtomError::Conflict(format!(
                "task {} changed concurrently",
                missing.task_id
            )));
        }
        for task in tasks {
            state.tasks.insert(key(&task.board_id, &task.task_id), task.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl CompanyRepository for MemoryStore {
    async fn put_company(&self, company: &Company) -> AtomResult<()> {
        self.write()?
            .companies
            .insert(company.company_id.clone(), company.clone());
        Ok(())
    }

    async fn get_company(&self, company_id: &str) -> AtomResult<Option<Company>> {
        Ok(self.read()?.companies.get(company_id).cloned())
    }

    async fn list_companies(&self) -> AtomResult<Vec<Company>> {
        Ok(self.read()?.companies.values().cloned().collect())
    }
}

#[async_trait]
impl CompanyStatusRepository for MemoryStore {
    async fn put_status(&self, user_id: &str, company_id: &str, status: UserCompanyStatus) -> AtomResult<()> {
        self.write()?.company_statuses.insert(key(user_id, company_id), status);
        Ok(())
    }

    async fn get_status(&self, user_id: &str, company_id: &str) -> AtomResult<Option<UserCompanyStatus>> {
        Ok(self.read()?.company_statuses.get(&key(user_id, company_id)).copied())
    }

    async fn list_statuses(&self, user_id: &str) -> AtomResult<HashMap<String, UserCompanyStatus>> {
        Ok(self
            .read()?
            .company_statuses
            .iter()
            .filter(|((user, _), _)| user == user_id)
            .map(|((_, company), status)| (company.clone(), *status))
            .collect())
    }

    async fn delete_status(&self, user_id: &str, company_id: &str) -> AtomResult<()> {
        self.write()?.company_statuses.remove(&key(user_id, company_id));
        Ok(())
    }
}

#[async_trait]
impl DocumentRepository for MemoryStore {
    async fn put_document(&self, document: &Document) -> AtomResult<()> {
        self.write()?
            .documents
            .insert(key(&document.user_id, &document.document_id), document.clone());
        Ok(())
    }

    async fn get_document(&self, user_id: &str, document_id: &str) -> AtomResult<Option<Document>> {
        Ok(self.read()?.documents.get(&key(user_id, document_id)).cloned())
    }

    async fn list_documents(&self, user_id: &str) -> AtomResult<Vec<Document>> {
        Ok(self
            .read()?
            .documents
            .values()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_document(&self, user_id: &str, document_id: &str) -> AtomResult<()> {
        self.write()?.documents.remove(&key(user_id, document_id));
        Ok(())
    }
}

#[async_trait]
impl VehicleRepository for MemoryStore {
    async fn put_vehicle(&self, vehicle: &Vehicle) -> AtomResult<()> {
        self.write()?
            .vehicles
            .insert(key(&vehicle.user_id, &vehicle.vehicle_id), vehicle.clone());
        Ok(())
    }

    async fn get_vehicle(&self, user_id: &str, vehicle_id: &str) -> AtomResult<Option<Vehicle>> {
        Ok(self.read()?.vehicles.get(&key(user_id, vehicle_id)).cloned())
    }

    async fn list_vehicles(&self, user_id: &str) -> AtomResult<Vec<Vehicle>> {
        Ok(self
            .read()?
            .vehicles
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_vehicle(&self, user_id: &str, vehicle_id: &str) -> AtomResult<()> {
        self.write()?.vehicles.remove(&key(user_id, vehicle_id));
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn put_profile(&self, profile: &DriverProfile) -> AtomResult<()> {
        self.write()?
            .profiles
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> AtomResult<Option<DriverProfile>> {
        Ok(self.read()?.profiles.get(user_id).cloned())
    }

    async fn touch_last_login(&self, user_id: &str, at: DateTime<Utc>) -> AtomResult<()> {
        match self.write()?.profiles.get_mut(user_id) {
            Some(profile) => {
                profile.last_login_at = Some(at);
                Ok(())
            }
            None => Err(AtomError::not_found("User")),
        }
    }
}
