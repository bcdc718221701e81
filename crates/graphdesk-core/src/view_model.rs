//! Entity view-model lifecycle
//!
//! One view-model instance backs one detail page: it fetches and normalizes
//! the entity, carries the editable property list through create/edit mode,
//! and dispatches saves and deletes through the adapter. Errors surface as a
//! dismissible banner message and never escape this boundary; navigation is
//! the only side effect beyond network I/O and local state.
//!
//! Responses are tagged with a monotonic fetch generation: a response that
//! arrives for a superseded request is discarded instead of overwriting newer
//! state. Save and delete refuse to dispatch while another mutation is in
//! flight, independent of any UI gating.

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::adapter::{ApiAdapter, Endpoint};
use crate::error::GraphdeskError;
use crate::normalize;
use crate::transport::ApiTransport;
use crate::types::{Entity, GraphContext, Property, PropertyDraft};

/// Which lifecycle the page is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit,
    View,
}

/// Where the caller should navigate after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    ToCollection,
}

/// The editable field of a property row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyField {
    Predicate,
    Object,
}

/// Builds the save payload from the current entity.
pub type RequestBuilder = Box<dyn Fn(&Entity) -> JsonValue + Send + Sync>;

/// Synthesizes the default entity for create mode.
pub type EntityFactory = Box<dyn Fn(&GraphContext) -> Entity + Send + Sync>;

/// Every save sends the whole in-memory entity.
pub fn default_request_builder() -> RequestBuilder {
    Box::new(|entity| serde_json::to_value(entity).unwrap_or(JsonValue::Null))
}

pub struct EntityViewModel<T> {
    adapter: ApiAdapter<T>,
    endpoint: Endpoint,
    ctx: GraphContext,
    type_name: String,
    route_id: String,
    create_requested: bool,
    mode: Mode,
    loading: bool,
    saving: bool,
    error: Option<String>,
    entity: Option<Entity>,
    draft: PropertyDraft,
    generation: u64,
    factory: EntityFactory,
    builder: RequestBuilder,
}

impl<T: ApiTransport> EntityViewModel<T> {
    pub fn new(
        adapter: ApiAdapter<T>,
        endpoint: Endpoint,
        ctx: GraphContext,
        type_name: impl Into<String>,
        route_id: impl Into<String>,
    ) -> Self {
        Self {
            adapter,
            endpoint,
            ctx,
            type_name: type_name.into(),
            route_id: route_id.into(),
            create_requested: false,
            mode: Mode::View,
            loading: false,
            saving: false,
            error: None,
            entity: None,
            draft: PropertyDraft::default(),
            generation: 0,
            factory: Box::new(Entity::placeholder),
            builder: default_request_builder(),
        }
    }

    /// Force create mode regardless of the route identifier.
    pub fn with_create_mode(mut self) -> Self {
        self.create_requested = true;
        self
    }

    pub fn with_factory(mut self, factory: EntityFactory) -> Self {
        self.factory = factory;
        self
    }

    pub fn with_request_builder(mut self, builder: RequestBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn entity(&self) -> Option<&Entity> {
        self.entity.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn draft(&self) -> &PropertyDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut PropertyDraft {
        &mut self.draft
    }

    /// Enter the page. The route identifier literal `"new"` (or an explicit
    /// create request) skips the network and lands directly in create mode
    /// with a synthesized entity.
    pub async fn mount(&mut self) {
        if self.create_requested || self.route_id == "new" {
            self.mode = Mode::Create;
            self.entity = Some((self.factory)(&self.ctx));
            debug!(type_name = %self.type_name, "mounted in create mode");
            return;
        }
        self.mode = Mode::View;
        self.load().await;
    }

    /// Fetch and normalize the entity, superseding any in-flight load.
    pub async fn load(&mut self) {
        let generation = self.begin_load();
        let result = self
            .adapter
            .read(&self.endpoint, &self.ctx, &self.route_id)
            .await;
        self.apply_load(generation, result);
    }

    /// Start a fetch: bump the generation and set the loading flag. The
    /// returned generation must be handed back to [`apply_load`].
    ///
    /// [`apply_load`]: EntityViewModel::apply_load
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.generation
    }

    /// Apply a fetch result. A result carrying a superseded generation is
    /// discarded; its originating request lost the race.
    pub fn apply_load(&mut self, generation: u64, result: Result<JsonValue, GraphdeskError>) {
        if generation != self.generation {
            debug!(generation, current = self.generation, "discarding stale response");
            return;
        }
        self.loading = false;
        match result {
            Ok(payload) => {
                match normalize::normalize_entity(&payload, &self.route_id, &self.ctx) {
                    Some(entity) => {
                        debug!(uri = %entity.object_uri, "entity loaded");
                        self.entity = Some(entity);
                    }
                    None => {
                        self.error = Some(format!("{} not found", self.type_name));
                    }
                }
            }
            Err(err) => {
                self.error =
                    Some(err.banner_message(&format!("Failed to load {}", self.type_name)));
            }
        }
    }

    /// Switch a loaded entity into edit mode.
    pub fn edit(&mut self) -> Result<(), GraphdeskError> {
        if self.mode != Mode::View || self.entity.is_none() {
            return Err(GraphdeskError::State(
                "nothing loaded to edit".to_string(),
            ));
        }
        self.mode = Mode::Edit;
        Ok(())
    }

    /// Replace one field of one property row, leaving order and every other
    /// entry untouched. Out-of-range indices are ignored.
    pub fn update_property(&mut self, index: usize, field: PropertyField, value: &str) {
        let Some(entity) = self.entity.as_mut() else {
            return;
        };
        let Some(row) = entity.properties.get_mut(index) else {
            return;
        };
        match field {
            PropertyField::Predicate => {
                row.predicate = value.to_string();
                row.kind = normalize::classify_predicate(value);
            }
            PropertyField::Object => row.object = value.to_string(),
        }
        entity.recount();
    }

    /// Remove one property row. Out-of-range indices are ignored.
    pub fn remove_property(&mut self, index: usize) {
        let Some(entity) = self.entity.as_mut() else {
            return;
        };
        if index < entity.properties.len() {
            entity.properties.remove(index);
            entity.recount();
        }
    }

    /// Append the draft as a new property row. The draft must have both a
    /// predicate and a value; it is cleared only on success.
    pub fn add_property(&mut self) -> Result<(), GraphdeskError> {
        if !self.draft.is_complete() {
            return Err(GraphdeskError::Validation(
                "a property needs both a predicate and a value".to_string(),
            ));
        }
        let Some(entity) = self.entity.as_mut() else {
            return Err(GraphdeskError::State("no entity to edit".to_string()));
        };
        entity.properties.push(Property {
            predicate: self.draft.predicate.clone(),
            object: self.draft.value.clone(),
            kind: normalize::classify_predicate(&self.draft.predicate),
        });
        entity.recount();
        self.draft.clear();
        Ok(())
    }

    /// Serialize the current entity and dispatch it as a create or update.
    ///
    /// Create success asks the caller to navigate back to the owning list;
    /// update success re-fetches and returns to viewing. Any backend failure
    /// becomes the banner message and the page stays editable. The saving
    /// flag clears regardless of outcome.
    pub async fn save(&mut self) -> Result<Option<Navigation>, GraphdeskError> {
        if self.saving {
            return Err(GraphdeskError::State(
                "a save is already in flight".to_string(),
            ));
        }
        if self.mode == Mode::View {
            return Err(GraphdeskError::State(
                "save requires create or edit mode".to_string(),
            ));
        }
        let Some(entity) = self.entity.clone() else {
            return Err(GraphdeskError::State("nothing to save".to_string()));
        };

        self.saving = true;
        self.error = None;
        let payload = (self.builder)(&entity);
        let result = match self.mode {
            Mode::Create => self.adapter.create(&self.endpoint, &self.ctx, &payload).await,
            _ => {
                self.adapter
                    .update(&self.endpoint, &self.ctx, &self.route_id, &payload)
                    .await
            }
        };
        self.saving = false;

        match result {
            Ok(_) if self.mode == Mode::Create => {
                debug!(type_name = %self.type_name, "created, navigating to list");
                Ok(Some(Navigation::ToCollection))
            }
            Ok(_) => {
                self.mode = Mode::View;
                self.load().await;
                Ok(None)
            }
            Err(err) => {
                self.error =
                    Some(err.banner_message(&format!("Failed to save {}", self.type_name)));
                Ok(None)
            }
        }
    }

    /// Delete the entity and ask the caller to navigate to the owning list.
    pub async fn delete(&mut self) -> Result<Option<Navigation>, GraphdeskError> {
        if self.saving {
            return Err(GraphdeskError::State(
                "a mutation is already in flight".to_string(),
            ));
        }
        if self.mode == Mode::Create {
            return Err(GraphdeskError::State(
                "nothing persisted to delete".to_string(),
            ));
        }

        self.saving = true;
        self.error = None;
        let result = self
            .adapter
            .delete(&self.endpoint, &self.ctx, &self.route_id)
            .await;
        self.saving = false;

        match result {
            Ok(_) => Ok(Some(Navigation::ToCollection)),
            Err(err) => {
                self.error =
                    Some(err.banner_message(&format!("Failed to delete {}", self.type_name)));
                Ok(None)
            }
        }
    }
}
