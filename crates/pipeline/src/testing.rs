//! In-memory store with failure injection, shared by the stage tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{json, Value};

use cutover_core::error::{CutoverError, Result};
use cutover_core::models::account::{IdentityAccount, NewAccount};
use cutover_core::models::row::Row;
use cutover_core::models::table::Table;
use cutover_core::store::{IdentityStore, Page, TableStore};

#[derive(Default)]
pub struct State {
    pub tables: BTreeMap<Table, Vec<Row>>,
    pub accounts: Vec<IdentityAccount>,
    /// Whether `fetch_page` reports the exact table size.
    pub report_total: bool,
    /// Triggers a `profiles` row for every created account.
    pub auto_profiles: bool,

    pub page_sizes: BTreeMap<Table, Vec<usize>>,
    pub insert_batches: BTreeMap<Table, Vec<usize>>,
    pub deletes: Vec<Table>,
    pub grade_updates: Vec<Vec<i64>>,
    pub created: Vec<String>,
    pub banned: Vec<(String, String)>,
    pub listings: usize,

    pub fail_read: Option<Table>,
    pub fail_wipe: Option<Table>,
    pub fail_insert_batch: Option<(Table, usize)>,
    /// Silently discard one row of the next insert into this table.
    pub drop_row_on_insert: Option<Table>,
    pub fail_grade_update: bool,
    pub fail_listing: bool,
    pub create_failures: HashSet<String>,
    pub delete_failures: HashSet<String>,
    pub delete_failures_once: HashSet<String>,
    /// Allow only this many successful deletions per account listing.
    pub deletes_per_listing: Option<usize>,
    pub deletes_since_listing: usize,
    pub ban_failures: HashSet<String>,
}

pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with(|_| {})
    }

    pub fn with(configure: impl FnOnce(&mut State)) -> Self {
        let mut state = State {
            report_total: true,
            ..State::default()
        };
        configure(&mut state);
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn rows(&self, table: Table) -> Vec<Row> {
        self.state().tables.get(&table).cloned().unwrap_or_default()
    }

    pub fn len(&self, table: Table) -> usize {
        self.state().tables.get(&table).map_or(0, Vec::len)
    }

    pub fn account_count(&self) -> usize {
        self.state().accounts.len()
    }

    pub fn grades(&self) -> Vec<i64> {
        self.rows(Table::Students)
            .iter()
            .map(|r| r["grade"].as_i64().unwrap())
            .collect()
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn fetch_page(&self, table: Table, offset: usize, limit: usize) -> Result<Page> {
        let mut state = self.state();
        if state.fail_read == Some(table) {
            return Err(CutoverError::Store(format!("read {table} failed (503)")));
        }
        let all = state.tables.get(&table).cloned().unwrap_or_default();
        let rows: Vec<Row> = all.iter().skip(offset).take(limit).cloned().collect();
        state.page_sizes.entry(table).or_default().push(rows.len());
        let total = state.report_total.then_some(all.len() as u64);
        Ok(Page { rows, total })
    }

    async fn count(&self, table: Table) -> Result<u64> {
        Ok(self.len(table) as u64)
    }

    async fn delete_all(&self, table: Table) -> Result<()> {
        let mut state = self.state();
        if state.fail_wipe == Some(table) {
            return Err(CutoverError::Store(format!(
                "delete {table} failed (409): violates foreign key constraint"
            )));
        }
        state.tables.remove(&table);
        state.deletes.push(table);
        Ok(())
    }

    async fn insert(&self, table: Table, rows: &[Row]) -> Result<()> {
        let mut state = self.state();
        let index = state.insert_batches.get(&table).map_or(0, Vec::len);
        state.insert_batches.entry(table).or_default().push(rows.len());
        if state.fail_insert_batch == Some((table, index)) {
            return Err(CutoverError::Store(format!("insert {table} failed (400)")));
        }
        let mut rows = rows.to_vec();
        if state.drop_row_on_insert == Some(table) {
            rows.pop();
            state.drop_row_on_insert = None;
        }
        state.tables.entry(table).or_default().extend(rows);
        Ok(())
    }

    async fn update_grade(&self, student_ids: &[i64], grade: i64) -> Result<()> {
        let mut state = self.state();
        if state.fail_grade_update {
            return Err(CutoverError::Store("update students.grade failed (500)".into()));
        }
        state.grade_updates.push(student_ids.to_vec());
        let ids: HashSet<i64> = student_ids.iter().copied().collect();
        if let Some(students) = state.tables.get_mut(&Table::Students) {
            for row in students.iter_mut() {
                if row["id"].as_i64().is_some_and(|id| ids.contains(&id)) {
                    row.insert("grade".into(), json!(grade));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn list_accounts(&self, page: u32, per_page: usize) -> Result<Vec<IdentityAccount>> {
        let mut state = self.state();
        if state.fail_listing {
            return Err(CutoverError::Store("list accounts failed (502)".into()));
        }
        state.listings += 1;
        state.deletes_since_listing = 0;
        let skip = (page.saturating_sub(1) as usize) * per_page;
        Ok(state
            .accounts
            .iter()
            .skip(skip)
            .take(per_page)
            .cloned()
            .collect())
    }

    async fn create_account(&self, account: &NewAccount) -> Result<()> {
        let mut state = self.state();
        if state.create_failures.contains(&account.id) {
            return Err(CutoverError::Store(format!(
                "create account {} failed (422): email address already registered",
                account.id
            )));
        }
        state.created.push(account.id.clone());
        state.accounts.push(IdentityAccount {
            id: account.id.clone(),
            email: account.email.clone(),
            phone: account.phone.clone(),
            email_confirmed_at: None,
            phone_confirmed_at: None,
            user_metadata: account.user_metadata.clone(),
            app_metadata: account.app_metadata.clone(),
            created_at: None,
        });
        if state.auto_profiles {
            let profile = row(json!({"id": account.id, "display_name": null, "role": "student"}));
            state.tables.entry(Table::Profiles).or_default().push(profile);
        }
        Ok(())
    }

    async fn delete_account(&self, id: &str) -> Result<()> {
        let mut state = self.state();
        let over_budget = state
            .deletes_per_listing
            .is_some_and(|budget| state.deletes_since_listing >= budget);
        if over_budget
            || state.delete_failures.contains(id)
            || state.delete_failures_once.remove(id)
        {
            return Err(CutoverError::Store(format!("delete account {id} failed (500)")));
        }
        state.deletes_since_listing += 1;
        state.accounts.retain(|a| a.id != id);
        Ok(())
    }

    async fn ban_account(&self, id: &str, duration: &str) -> Result<()> {
        let mut state = self.state();
        if state.ban_failures.contains(id) {
            return Err(CutoverError::Store(format!(
                "ban account {id} failed (404): User not found"
            )));
        }
        state.banned.push((id.to_string(), duration.to_string()));
        Ok(())
    }
}

pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub fn account(id: &str, email: &str) -> IdentityAccount {
    serde_json::from_value(json!({
        "id": id,
        "email": email,
        "email_confirmed_at": "2025-04-01T00:00:00Z",
        "user_metadata": {"login_id": id},
        "app_metadata": {"provider": "email"}
    }))
    .unwrap()
}

pub fn numbered_rows(n: usize) -> Vec<Row> {
    (1..=n).map(|i| row(json!({"id": i}))).collect()
}

/// A consistent identity domain: one student per entry in `grades`, one
/// parent and one coach linked to every student, one admin with two codes.
pub fn school(grades: &[i64]) -> MemoryStore {
    MemoryStore::with(|s| {
        let mut profiles = Vec::new();
        let mut students = Vec::new();
        let mut parent_links = Vec::new();
        let mut coach_links = Vec::new();

        for (i, grade) in grades.iter().enumerate() {
            let n = i as i64 + 1;
            let user_id = format!("stu-{n}");
            s.accounts
                .push(account(&user_id, &format!("stu{n}@studyspark.local")));
            profiles.push(row(json!({
                "id": user_id,
                "display_name": format!("Student {n}"),
                "role": "student"
            })));
            students.push(row(json!({
                "id": n,
                "user_id": user_id,
                "grade": grade,
                "full_name": format!("Student {n}"),
                "login_id": format!("student{n}"),
                "course": "A"
            })));
            parent_links.push(row(json!({"id": n, "parent_id": 1, "student_id": n})));
            coach_links.push(row(json!({"id": n, "coach_id": 1, "student_id": n})));
        }

        for (id, role) in [("par-1", "parent"), ("coa-1", "coach"), ("adm-1", "admin")] {
            s.accounts.push(account(id, &format!("{id}@studyspark.local")));
            profiles.push(row(json!({"id": id, "display_name": id, "role": role})));
        }

        s.tables.insert(Table::Profiles, profiles);
        s.tables.insert(Table::Students, students);
        s.tables.insert(
            Table::Parents,
            vec![row(json!({"id": 1, "user_id": "par-1", "full_name": "Parent"}))],
        );
        s.tables.insert(
            Table::Coaches,
            vec![row(json!({"id": 1, "user_id": "coa-1", "full_name": "Coach"}))],
        );
        s.tables.insert(
            Table::Admins,
            vec![row(json!({
                "id": 1,
                "user_id": "adm-1",
                "full_name": "Admin",
                "invitation_code": "ADM"
            }))],
        );
        s.tables.insert(
            Table::InvitationCodes,
            vec![
                row(json!({"id": 1, "code": "PARENT-01", "role": "parent", "created_by": "adm-1"})),
                row(json!({"id": 2, "code": "COACH-01", "role": "coach", "created_by": "adm-1"})),
            ],
        );
        s.tables.insert(Table::ParentChildRelations, parent_links);
        s.tables.insert(Table::CoachStudentRelations, coach_links);
    })
}
