//! In-memory repositories that record every remote call, for tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use board_common::wire::CreatePersonRequest;
use board_common::{BoardAssignments, Person};

use super::repository::{BoardRepository, PeopleRepository};
use crate::errors::{BoardError, BoardResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SaveColumns(Vec<String>),
    Create {
        person_id: String,
        column_id: String,
    },
    Move {
        person_id: String,
        old_column_id: String,
        new_column_id: String,
    },
    Delete {
        person_id: String,
        column_id: String,
    },
    DeletePerson(String),
}

#[derive(Default)]
struct State {
    titles: Vec<String>,
    assignments: BoardAssignments,
    people: Vec<Person>,
    calls: Vec<Call>,
    fail_create: bool,
    fail_move: bool,
    fail_save: bool,
    fail_fetch: bool,
    fail_delete_person: bool,
    fail_delete_for: HashSet<String>,
}

#[derive(Default)]
pub struct FakeRemote {
    state: Mutex<State>,
}

fn server_error() -> BoardError {
    BoardError::Http {
        status: 500,
        message: "injected failure".into(),
    }
}

impl FakeRemote {
    pub fn new(titles: &[&str], people: &[(&str, &str)]) -> Self {
        let remote = Self::default();
        {
            let mut state = remote.state.lock().unwrap();
            state.titles = titles.iter().map(|t| t.to_string()).collect();
            state.people = people
                .iter()
                .map(|(id, name)| Person::new(*id, *name))
                .collect();
        }
        remote
    }

    pub fn assign(&self, column_id: &str, person_id: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .assignments
            .entry(column_id.to_string())
            .or_default()
            .push(person_id.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn assignments(&self) -> BoardAssignments {
        self.state.lock().unwrap().assignments.clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.state.lock().unwrap().titles.clone()
    }

    pub fn fail_create(&self, fail: bool) {
        self.state.lock().unwrap().fail_create = fail;
    }

    pub fn fail_move(&self, fail: bool) {
        self.state.lock().unwrap().fail_move = fail;
    }

    pub fn fail_save(&self, fail: bool) {
        self.state.lock().unwrap().fail_save = fail;
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.state.lock().unwrap().fail_fetch = fail;
    }

    pub fn fail_delete_person(&self, fail: bool) {
        self.state.lock().unwrap().fail_delete_person = fail;
    }

    pub fn fail_delete_for(&self, person_id: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_delete_for
            .insert(person_id.to_string());
    }
}

fn remove_pair(assignments: &mut BoardAssignments, person_id: &str, column_id: &str) {
    if let Some(people) = assignments.get_mut(column_id) {
        people.retain(|p| p != person_id);
        if people.is_empty() {
            assignments.remove(column_id);
        }
    }
}

#[async_trait]
impl BoardRepository for FakeRemote {
    async fn fetch_column_titles(&self) -> BoardResult<Vec<String>> {
        let state = self.state.lock().unwrap();
        if state.fail_fetch {
            return Err(server_error());
        }
        Ok(state.titles.clone())
    }

    async fn save_column_titles(&self, titles: &[String]) -> BoardResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::SaveColumns(titles.to_vec()));
        if state.fail_save {
            return Err(server_error());
        }
        state.titles = titles.to_vec();
        Ok(())
    }

    async fn fetch_assignments(&self) -> BoardResult<BoardAssignments> {
        let state = self.state.lock().unwrap();
        if state.fail_fetch {
            return Err(server_error());
        }
        Ok(state.assignments.clone())
    }

    async fn create_assignment(&self, person_id: &str, column_id: &str) -> BoardResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create {
            person_id: person_id.to_string(),
            column_id: column_id.to_string(),
        });
        if state.fail_create {
            return Err(server_error());
        }
        let people = state.assignments.entry(column_id.to_string()).or_default();
        if !people.iter().any(|p| p == person_id) {
            people.push(person_id.to_string());
        }
        Ok(())
    }

    async fn move_assignment(
        &self,
        person_id: &str,
        old_column_id: &str,
        new_column_id: &str,
    ) -> BoardResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Move {
            person_id: person_id.to_string(),
            old_column_id: old_column_id.to_string(),
            new_column_id: new_column_id.to_string(),
        });
        if state.fail_move {
            return Err(server_error());
        }
        remove_pair(&mut state.assignments, person_id, old_column_id);
        state
            .assignments
            .entry(new_column_id.to_string())
            .or_default()
            .push(person_id.to_string());
        Ok(())
    }

    async fn delete_assignment(&self, person_id: &str, column_id: &str) -> BoardResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Delete {
            person_id: person_id.to_string(),
            column_id: column_id.to_string(),
        });
        if state.fail_delete_for.contains(person_id) {
            return Err(server_error());
        }
        remove_pair(&mut state.assignments, person_id, column_id);
        Ok(())
    }
}

#[async_trait]
impl PeopleRepository for FakeRemote {
    async fn list_people(&self) -> BoardResult<Vec<Person>> {
        let state = self.state.lock().unwrap();
        if state.fail_fetch {
            return Err(server_error());
        }
        Ok(state.people.clone())
    }

    async fn create_person(&self, request: &CreatePersonRequest) -> BoardResult<Person> {
        let mut state = self.state.lock().unwrap();
        let mut person = Person::new(format!("p{}", state.people.len() + 1), &request.name);
        person.email = request.email.clone();
        person.phone = request.phone.clone();
        state.people.push(person.clone());
        Ok(person)
    }

    async fn delete_person(&self, person_id: &str) -> BoardResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DeletePerson(person_id.to_string()));
        if state.fail_delete_person {
            return Err(server_error());
        }
        state.people.retain(|p| p.id != person_id);
        for people in state.assignments.values_mut() {
            people.retain(|p| p != person_id);
        }
        state.assignments.retain(|_, people| !people.is_empty());
        Ok(())
    }
}
