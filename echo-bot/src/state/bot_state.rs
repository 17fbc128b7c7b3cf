//! Scoped bot state: one JSON record per conversation or per user, holding
//! named properties. Handlers read properties as owned values and write them
//! back explicitly; the record is persisted by [`BotState::save_changes`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use shared::{Activity, Result, ServiceError};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

use super::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateScope {
    Conversation,
    User,
}

impl StateScope {
    pub fn storage_key(&self, activity: &Activity) -> String {
        match self {
            StateScope::Conversation => format!(
                "{}/conversations/{}",
                activity.channel_id, activity.conversation.id
            ),
            StateScope::User => format!("{}/users/{}", activity.channel_id, activity.from.id),
        }
    }
}

impl std::fmt::Display for StateScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateScope::Conversation => write!(f, "conversation"),
            StateScope::User => write!(f, "user"),
        }
    }
}

/// Properties of one scope as loaded at the start of a turn.
#[derive(Debug, Clone)]
pub struct StateSnapshot {
    scope: StateScope,
    key: String,
    properties: Map<String, Value>,
    original: Map<String, Value>,
}

impl StateSnapshot {
    fn new(scope: StateScope, key: String, properties: Map<String, Value>) -> Self {
        Self {
            scope,
            key,
            original: properties.clone(),
            properties,
        }
    }

    pub fn scope(&self) -> StateScope {
        self.scope
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_changed(&self) -> bool {
        self.properties != self.original
    }

    fn to_value(&self) -> Value {
        Value::Object(self.properties.clone())
    }
}

#[derive(Clone)]
pub struct BotState {
    storage: Arc<dyn Storage>,
    scope: StateScope,
}

impl BotState {
    pub fn new(storage: Arc<dyn Storage>, scope: StateScope) -> Self {
        Self { storage, scope }
    }

    pub fn conversation(storage: Arc<dyn Storage>) -> Self {
        Self::new(storage, StateScope::Conversation)
    }

    pub fn user(storage: Arc<dyn Storage>) -> Self {
        Self::new(storage, StateScope::User)
    }

    pub fn scope(&self) -> StateScope {
        self.scope
    }

    pub fn create_property<T>(&self, name: impl Into<String>) -> StatePropertyAccessor<T> {
        StatePropertyAccessor {
            name: name.into(),
            scope: self.scope,
            _marker: PhantomData,
        }
    }

    pub async fn load(&self, activity: &Activity) -> Result<StateSnapshot> {
        let key = self.scope.storage_key(activity);
        let mut items = self.storage.read(std::slice::from_ref(&key)).await?;

        let properties = match items.remove(&key) {
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(ServiceError::Storage(format!(
                    "State record {} is not an object: {}",
                    key, other
                )))
            }
            None => Map::new(),
        };

        debug!(scope = %self.scope, key = %key, properties = properties.len(), "Loaded state");
        Ok(StateSnapshot::new(self.scope, key, properties))
    }

    /// Persists the snapshot when it changed since load, or always when
    /// `force` is set. Returns whether a write happened.
    pub async fn save_changes(&self, snapshot: &mut StateSnapshot, force: bool) -> Result<bool> {
        self.check_scope(snapshot)?;

        if !force && !snapshot.is_changed() {
            debug!(scope = %self.scope, key = %snapshot.key, "State unchanged, skipping save");
            return Ok(false);
        }

        let changes = HashMap::from([(snapshot.key.clone(), snapshot.to_value())]);
        self.storage.write(changes).await?;
        snapshot.original = snapshot.properties.clone();

        debug!(scope = %self.scope, key = %snapshot.key, force = force, "Saved state");
        Ok(true)
    }

    pub async fn delete(&self, snapshot: &mut StateSnapshot) -> Result<()> {
        self.check_scope(snapshot)?;

        self.storage.delete(std::slice::from_ref(&snapshot.key)).await?;
        snapshot.properties.clear();
        snapshot.original.clear();

        Ok(())
    }

    fn check_scope(&self, snapshot: &StateSnapshot) -> Result<()> {
        if snapshot.scope != self.scope {
            return Err(ServiceError::Internal(format!(
                "Snapshot of {} scope passed to {} state",
                snapshot.scope, self.scope
            )));
        }
        Ok(())
    }
}

/// Typed handle to a named property within one scope.
pub struct StatePropertyAccessor<T> {
    name: String,
    scope: StateScope,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for StatePropertyAccessor<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            scope: self.scope,
            _marker: PhantomData,
        }
    }
}

impl<T> StatePropertyAccessor<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, snapshot: &StateSnapshot, default: T) -> Result<T> {
        self.check_scope(snapshot)?;

        match snapshot.properties.get(&self.name) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(default),
        }
    }

    pub fn set(&self, snapshot: &mut StateSnapshot, value: &T) -> Result<()> {
        self.check_scope(snapshot)?;

        snapshot
            .properties
            .insert(self.name.clone(), serde_json::to_value(value)?);
        Ok(())
    }

    pub fn delete(&self, snapshot: &mut StateSnapshot) -> Result<()> {
        self.check_scope(snapshot)?;

        snapshot.properties.remove(&self.name);
        Ok(())
    }

    fn check_scope(&self, snapshot: &StateSnapshot) -> Result<()> {
        if snapshot.scope != self.scope {
            return Err(ServiceError::Internal(format!(
                "Property {} belongs to {} scope, snapshot is {} scope",
                self.name, self.scope, snapshot.scope
            )));
        }
        Ok(())
    }
}
