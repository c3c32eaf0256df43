// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Draft sessions: load-merge on open, debounced saves, unload flush

use crate::error::RuntimeError;
use crate::runtime::Runtime;
use eg_adapters::{FetchAdapter, VisibilityAdapter};
use eg_core::{merge_loaded, Clock, DraftConfig, DraftId, DraftRecord, Effect, Event, TimerId};
use eg_storage::KvStore;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Predicate consulted before every save; returning false skips the save
/// silently.
pub type ValidateHook = Arc<dyn Fn(&Map<String, Value>) -> bool + Send + Sync>;
/// Invoked with the restored fields after a saved draft is merged in.
pub type LoadedHook = Arc<dyn Fn(&Map<String, Value>) + Send + Sync>;

/// Everything a draft session needs: identity, initial data, and policy.
pub struct DraftSpec {
    /// Logical form key; namespaced with `source_url` in storage.
    pub key: String,
    /// Page location the form lives on.
    pub source_url: String,
    pub initial: Map<String, Value>,
    pub config: DraftConfig,
    pub validate: Option<ValidateHook>,
    pub on_loaded: Option<LoadedHook>,
}

impl DraftSpec {
    pub fn new(key: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            source_url: source_url.into(),
            initial: Map::new(),
            config: DraftConfig::default(),
            validate: None,
            on_loaded: None,
        }
    }

    pub fn with_initial(mut self, initial: Map<String, Value>) -> Self {
        self.initial = initial;
        self
    }

    pub fn with_config(mut self, config: DraftConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_validate(mut self, validate: ValidateHook) -> Self {
        self.validate = Some(validate);
        self
    }

    pub fn with_on_loaded(mut self, on_loaded: LoadedHook) -> Self {
        self.on_loaded = Some(on_loaded);
        self
    }
}

/// One wrapped form's in-memory state.
pub(crate) struct DraftSession {
    key: String,
    source_url: String,
    config: DraftConfig,
    data: Map<String, Value>,
    /// Changes exist that have not reached storage yet.
    dirty: bool,
    validate: Option<ValidateHook>,
}

impl<F, V, K, C> Runtime<F, V, K, C>
where
    F: FetchAdapter,
    V: VisibilityAdapter,
    K: KvStore,
    C: Clock,
{
    /// Open a draft session: restore any saved record within its
    /// freshness window and merge it over the initial data (saved values
    /// win). Returns the merged form data.
    pub async fn open_draft(
        &self,
        id: DraftId,
        spec: DraftSpec,
    ) -> Result<Map<String, Value>, RuntimeError> {
        let now_ms = self.clock().epoch_ms();
        let loaded = self
            .drafts
            .load(&spec.key, &spec.source_url, now_ms, spec.config.max_age);

        let mut data = spec.initial;
        let mut effects = Vec::new();
        if let Some(record) = loaded {
            if let Some(hook) = &spec.on_loaded {
                hook(&record.payload);
            }
            let fields = merge_loaded(&mut data, record.payload);
            effects.push(Effect::Emit {
                event: Event::DraftLoaded {
                    id: id.clone(),
                    fields,
                },
            });
        }

        self.draft_sessions.lock().insert(
            id,
            DraftSession {
                key: spec.key,
                source_url: spec.source_url,
                config: spec.config,
                data: data.clone(),
                dirty: false,
                validate: spec.validate,
            },
        );
        self.apply_effects(effects).await?;
        Ok(data)
    }

    /// Record a field change and restart the debounce window.
    pub async fn change_field(
        &self,
        id: &DraftId,
        name: &str,
        value: Value,
    ) -> Result<(), RuntimeError> {
        let debounce = {
            let mut sessions = self.draft_sessions.lock();
            let session = sessions
                .get_mut(id)
                .ok_or_else(|| RuntimeError::DraftNotFound(id.to_string()))?;
            session.data.insert(name.to_string(), value);
            session.dirty = true;
            session.config.debounce
        };
        self.apply_effects(vec![Effect::SetTimer {
            id: TimerId::debounce(id),
            duration: debounce,
        }])
        .await
    }

    /// The page is being discarded: flush now, bypassing the debounce.
    pub async fn unload_draft(&self, id: &DraftId) -> Result<(), RuntimeError> {
        let save = {
            let sessions = self.draft_sessions.lock();
            let session = sessions
                .get(id)
                .ok_or_else(|| RuntimeError::DraftNotFound(id.to_string()))?;
            session.config.save_on_unload
        };
        let mut effects = vec![Effect::CancelTimer {
            id: TimerId::debounce(id),
        }];
        if save {
            effects.extend(self.save_effects(id));
        }
        self.apply_effects(effects).await
    }

    /// Flush every open draft session, for the page-unload signal.
    pub async fn unload_all_drafts(&self) -> Result<(), RuntimeError> {
        let ids: Vec<DraftId> = self.draft_sessions.lock().keys().cloned().collect();
        for id in ids {
            self.unload_draft(&id).await?;
        }
        Ok(())
    }

    /// The wrapped form submitted successfully.
    pub async fn submit_succeeded(&self, id: &DraftId) -> Result<(), RuntimeError> {
        let clear = {
            let mut sessions = self.draft_sessions.lock();
            let session = sessions
                .get_mut(id)
                .ok_or_else(|| RuntimeError::DraftNotFound(id.to_string()))?;
            if session.config.clear_on_success {
                session.dirty = false;
                true
            } else {
                false
            }
        };
        if clear {
            self.clear_record(id).await?;
        }
        Ok(())
    }

    /// Manually invalidate the saved record, cancelling any pending save.
    pub async fn clear_saved_data(&self, id: &DraftId) -> Result<(), RuntimeError> {
        {
            let mut sessions = self.draft_sessions.lock();
            let session = sessions
                .get_mut(id)
                .ok_or_else(|| RuntimeError::DraftNotFound(id.to_string()))?;
            session.dirty = false;
        }
        self.clear_record(id).await
    }

    /// Close a session without touching its saved record.
    pub async fn close_draft(&self, id: &DraftId) -> Result<(), RuntimeError> {
        if self.draft_sessions.lock().remove(id).is_some() {
            self.apply_effects(vec![Effect::CancelTimer {
                id: TimerId::debounce(id),
            }])
            .await?;
        }
        Ok(())
    }

    /// Current form data of a session.
    pub fn draft_data(&self, id: &DraftId) -> Option<Map<String, Value>> {
        self.draft_sessions.lock().get(id).map(|s| s.data.clone())
    }

    /// Save the current data as a named snapshot, evicting the oldest
    /// snapshot past the configured cap. Returns the evicted name, if any.
    pub async fn save_draft_as(
        &self,
        id: &DraftId,
        name: &str,
    ) -> Result<Option<String>, RuntimeError> {
        let (key, source_url, record, cap) = {
            let sessions = self.draft_sessions.lock();
            let session = sessions
                .get(id)
                .ok_or_else(|| RuntimeError::DraftNotFound(id.to_string()))?;
            let mut record = DraftRecord::new(
                session.data.clone(),
                self.clock().epoch_ms(),
                session.source_url.clone(),
            );
            record.strip(&session.config.exclude_fields);
            (
                session.key.clone(),
                session.source_url.clone(),
                record,
                session.config.max_drafts,
            )
        };
        let evicted = self.drafts.save_named(&key, &source_url, name, &record, cap);
        self.apply_effects(vec![Effect::Emit {
            event: Event::DraftSaved { id: id.clone() },
        }])
        .await?;
        Ok(evicted)
    }

    /// Load a named snapshot over the session data (snapshot values win).
    /// Returns the merged data, or None when no such snapshot exists.
    pub async fn load_draft(
        &self,
        id: &DraftId,
        name: &str,
    ) -> Result<Option<Map<String, Value>>, RuntimeError> {
        let (key, source_url) = self.session_key(id)?;
        let Some(record) = self.drafts.load_named(&key, &source_url, name) else {
            return Ok(None);
        };

        let (data, fields) = {
            let mut sessions = self.draft_sessions.lock();
            let session = sessions
                .get_mut(id)
                .ok_or_else(|| RuntimeError::DraftNotFound(id.to_string()))?;
            let fields = merge_loaded(&mut session.data, record.payload);
            (session.data.clone(), fields)
        };
        self.apply_effects(vec![Effect::Emit {
            event: Event::DraftLoaded {
                id: id.clone(),
                fields,
            },
        }])
        .await?;
        Ok(Some(data))
    }

    /// Names of the session's snapshots, most recent first.
    pub fn list_drafts(&self, id: &DraftId) -> Result<Vec<String>, RuntimeError> {
        let (key, source_url) = self.session_key(id)?;
        Ok(self.drafts.list_named(&key, &source_url))
    }

    /// Delete a named snapshot. Returns true when it existed.
    pub fn delete_draft(&self, id: &DraftId, name: &str) -> Result<bool, RuntimeError> {
        let (key, source_url) = self.session_key(id)?;
        Ok(self.drafts.delete_named(&key, &source_url, name))
    }

    /// The debounce window closed: persist if the data is still dirty.
    pub(crate) async fn handle_debounce_timer(
        &self,
        id: &DraftId,
    ) -> Result<Vec<Event>, RuntimeError> {
        let effects = self.save_effects(id);
        Ok(self.executor.execute_all(effects).await?)
    }

    /// Build the effects for one save attempt.
    ///
    /// Validation failures consume the attempt silently; the next change
    /// restarts the debounce window.
    fn save_effects(&self, id: &DraftId) -> Vec<Effect> {
        let mut sessions = self.draft_sessions.lock();
        let Some(session) = sessions.get_mut(id) else {
            tracing::debug!(draft = %id, "debounce for unknown draft session");
            return Vec::new();
        };
        if !session.dirty {
            return Vec::new();
        }
        if let Some(validate) = &session.validate {
            if !validate(&session.data) {
                tracing::debug!(draft = %id, "draft save skipped by validation");
                return Vec::new();
            }
        }

        let mut record = DraftRecord::new(
            session.data.clone(),
            self.clock().epoch_ms(),
            session.source_url.clone(),
        );
        record.strip(&session.config.exclude_fields);

        if self.drafts.save(&session.key, &session.source_url, &record) {
            session.dirty = false;
            vec![Effect::Emit {
                event: Event::DraftSaved { id: id.clone() },
            }]
        } else {
            Vec::new()
        }
    }

    async fn clear_record(&self, id: &DraftId) -> Result<(), RuntimeError> {
        let (key, source_url) = self.session_key(id)?;
        self.drafts.clear(&key, &source_url);
        self.apply_effects(vec![
            Effect::CancelTimer {
                id: TimerId::debounce(id),
            },
            Effect::Emit {
                event: Event::DraftCleared { id: id.clone() },
            },
        ])
        .await
    }

    fn session_key(&self, id: &DraftId) -> Result<(String, String), RuntimeError> {
        let sessions = self.draft_sessions.lock();
        let session = sessions
            .get(id)
            .ok_or_else(|| RuntimeError::DraftNotFound(id.to_string()))?;
        Ok((session.key.clone(), session.source_url.clone()))
    }
}
