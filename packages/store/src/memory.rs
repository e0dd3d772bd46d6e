use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Duration, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::contract::{AuthError, RecordStore, SessionStore, SignUp, StoreError};
use crate::feed::{ChangeFeed, SessionChanges};
use crate::models::{AuthEvent, Collection, Row, Session, User};

const SESSION_LIFETIME_SECS: i64 = 3600;

/// Store operation that can be made to fail on purpose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Update,
    Insert,
    Upsert,
    Select,
}

#[derive(Debug)]
struct Account {
    password: String,
    user: User,
}

#[derive(Debug, Default)]
struct MemoryState {
    accounts: HashMap<String, Account>,
    current: Option<Session>,
    tables: HashMap<Collection, Vec<Row>>,
    failures: HashSet<(Collection, Operation)>,
    sign_in_failure: Option<String>,
    sign_out_calls: usize,
    clock: i64,
}

impl MemoryState {
    /// Monotonic `created_at` so "latest" is well defined even within one millisecond.
    fn next_timestamp(&mut self) -> String {
        self.clock += 1;
        (Utc::now() + Duration::milliseconds(self.clock)).to_rfc3339()
    }

    fn check(&self, collection: Collection, operation: Operation) -> Result<(), StoreError> {
        if self.failures.contains(&(collection, operation)) {
            return Err(StoreError::new(format!(
                "new row violates row-level security policy for table \"{}\"",
                collection.table()
            )));
        }
        Ok(())
    }
}

/// In-process backend for tests and offline development.
///
/// Behaves like the hosted service where the application can observe it: sign-up
/// creates the `profiles` row, every auth change is announced on the change feed,
/// and writes can be made to fail per collection to exercise degraded paths.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    feed: ChangeFeed,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an account without signing in or emitting anything.
    pub fn create_account(&self, email: &str, password: &str, metadata: Row) -> User {
        let mut state = self.lock();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: Some(email.to_lowercase()),
            user_metadata: metadata,
        };
        state.accounts.insert(
            email.to_lowercase(),
            Account {
                password: password.to_string(),
                user: user.clone(),
            },
        );
        let created_at = state.next_timestamp();
        let full_name = user.user_metadata.get("full_name").cloned();
        let language = user.user_metadata.get("language").cloned();
        state
            .tables
            .entry(Collection::Profiles)
            .or_default()
            .push(row(json!({
                "id": user.id,
                "full_name": full_name,
                "language": language,
                "total_points": 0,
                "current_streak": 0,
                "created_at": created_at,
            })));
        user
    }

    /// Start a session for an existing account as if it had been restored from
    /// a previous visit. Nothing is emitted.
    pub fn restore_session(&self, email: &str) -> Option<Session> {
        let mut state = self.lock();
        let user = state.accounts.get(&email.to_lowercase())?.user.clone();
        let session = issue_session(user);
        state.current = Some(session.clone());
        Some(session)
    }

    /// End the current session from outside the application (expiry, another tab).
    pub fn revoke_session(&self) {
        self.lock().current = None;
        self.feed.emit(AuthEvent::SignedOut, None);
    }

    pub fn fail(&self, collection: Collection, operation: Operation) {
        self.lock().failures.insert((collection, operation));
    }

    /// Make every password sign-in fail with `message`.
    pub fn fail_sign_in_with(&self, message: &str) {
        self.lock().sign_in_failure = Some(message.to_string());
    }

    pub fn insert_row(&self, collection: Collection, mut fields: Row) {
        let mut state = self.lock();
        if !fields.contains_key("created_at") {
            let created_at = state.next_timestamp();
            fields.insert("created_at".into(), Value::String(created_at));
        }
        state.tables.entry(collection).or_default().push(fields);
    }

    pub fn rows(&self, collection: Collection) -> Vec<Row> {
        self.lock()
            .tables
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.lock().current.clone()
    }

    pub fn sign_out_calls(&self) -> usize {
        self.lock().sign_out_calls
    }

    pub fn subscriber_count(&self) -> usize {
        self.feed.subscriber_count()
    }
}

fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

fn issue_session(user: User) -> Session {
    Session {
        access_token: format!("mem-access-{}", Uuid::new_v4()),
        refresh_token: format!("mem-refresh-{}", Uuid::new_v4()),
        expires_at: Some(Utc::now().timestamp() + SESSION_LIFETIME_SECS),
        user,
    }
}

fn owned_by(row: &Row, column: &str, id: &str) -> bool {
    row.get(column).and_then(Value::as_str) == Some(id)
}

impl SessionStore for MemoryStore {
    async fn get_session(&self) -> Option<Session> {
        self.lock().current.clone()
    }

    fn subscribe(&self) -> SessionChanges {
        self.feed.subscribe()
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = {
            let mut state = self.lock();
            if let Some(message) = &state.sign_in_failure {
                return Err(AuthError::new(message.clone()));
            }
            let user = match state.accounts.get(&email.to_lowercase()) {
                Some(account) if account.password == password => account.user.clone(),
                _ => return Err(AuthError::new("Invalid login credentials")),
            };
            let session = issue_session(user);
            state.current = Some(session.clone());
            session
        };
        self.feed.emit(AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str, metadata: Row) -> Result<SignUp, AuthError> {
        if self.lock().accounts.contains_key(&email.to_lowercase()) {
            return Err(AuthError::new("User already registered"));
        }
        let user = self.create_account(email, password, metadata);
        let session = issue_session(user.clone());
        self.lock().current = Some(session.clone());
        self.feed.emit(AuthEvent::SignedIn, Some(session.clone()));
        Ok(SignUp {
            user: Some(user),
            session: Some(session),
        })
    }

    async fn sign_out(&self) {
        {
            let mut state = self.lock();
            state.sign_out_calls += 1;
            state.current = None;
        }
        self.feed.emit(AuthEvent::SignedOut, None);
    }
}

impl RecordStore for MemoryStore {
    /// Unlike the hosted row API, an update that matches nothing is an error here,
    /// which lets tests drive the upsert fallback without touching policies.
    async fn update(&self, collection: Collection, id: &str, fields: Row) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.check(collection, Operation::Update)?;
        let column = collection.owner_column();
        let rows = state.tables.entry(collection).or_default();
        let mut matched = false;
        for existing in rows.iter_mut().filter(|r| owned_by(r, column, id)) {
            existing.extend(fields.clone());
            matched = true;
        }
        if !matched {
            return Err(StoreError::new(format!(
                "no {} row with {column} = {id}",
                collection.table()
            )));
        }
        Ok(())
    }

    async fn insert(&self, collection: Collection, fields: Row) -> Result<(), StoreError> {
        self.lock().check(collection, Operation::Insert)?;
        self.insert_row(collection, fields);
        Ok(())
    }

    async fn upsert_by_identity(&self, collection: Collection, fields: Row) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.check(collection, Operation::Upsert)?;
        let Some(id) = fields.get("id").and_then(Value::as_str).map(str::to_string) else {
            return Err(StoreError::new("upsert requires an id"));
        };
        let created_at = state.next_timestamp();
        let rows = state.tables.entry(collection).or_default();
        match rows.iter_mut().find(|r| owned_by(r, "id", &id)) {
            Some(existing) => existing.extend(fields),
            None => {
                let mut fresh = fields;
                fresh
                    .entry("created_at")
                    .or_insert(Value::String(created_at));
                rows.push(fresh);
            }
        }
        Ok(())
    }

    async fn select_latest_by_user(
        &self,
        collection: Collection,
        user_id: &str,
    ) -> Result<Option<Row>, StoreError> {
        let state = self.lock();
        state.check(collection, Operation::Select)?;
        let column = collection.owner_column();
        let latest = state
            .tables
            .get(&collection)
            .into_iter()
            .flatten()
            .enumerate()
            .filter(|(_, r)| owned_by(r, column, user_id))
            .max_by(|(a_idx, a), (b_idx, b)| {
                let a_at = a.get("created_at").and_then(Value::as_str);
                let b_at = b.get("created_at").and_then(Value::as_str);
                a_at.cmp(&b_at).then(a_idx.cmp(b_idx))
            })
            .map(|(_, r)| r.clone());
        Ok(latest)
    }
}
