//! The recipe form view-model.
//!
//! [`RecipeForm`] keeps a local copy of the remote collection and reconciles
//! it with the outcome of each create, update and delete call. The local list
//! changes only after the remote call has succeeded, and a single-record
//! mutation never triggers a refetch.
//!
//! Mutations run in three phases so that a caller driving an event loop can
//! keep handling input while a request is outstanding:
//!
//! 1. `prepare_*` validates and claims an in-flight slot,
//! 2. `send` performs the remote call without borrowing the form,
//! 3. `finish_*` reconciles the collection and releases the slot.
//!
//! A slot is held by the pending value and then by its outcome. Dropping
//! either one (including a cancelled `submit` or `remove` future) frees the
//! slot as well.
//!
//! [`RecipeForm::submit`] and [`RecipeForm::remove`] run all three in order.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use super::error::{ErrorKind, ErrorState, Operation, SyncError};
use super::form::FormState;
use crate::api::{ApiError, RecipeApi};
use crate::models::{Recipe, RecipeFields, RecipeId};

/// Keeps an in-flight slot taken for as long as it is alive.
type Claim = Arc<()>;

/// A create or update that has been validated but not yet sent.
///
/// Hand it back to [`RecipeForm::finish_submit`] (after
/// [`send`](Self::send)) to apply the response.
#[derive(Debug)]
#[must_use]
pub struct PendingSubmit {
    target: Option<RecipeId>,
    fields: RecipeFields,
    claim: Claim,
}

impl PendingSubmit {
    /// The record being updated, or `None` for a create.
    pub fn target(&self) -> Option<&RecipeId> {
        self.target.as_ref()
    }

    pub fn fields(&self) -> &RecipeFields {
        &self.fields
    }

    pub async fn send<A: RecipeApi>(self, api: &A) -> SubmitOutcome {
        let result = match &self.target {
            Some(id) => api.update(id, &self.fields).await,
            None => api.create(&self.fields).await,
        };
        SubmitOutcome {
            target: self.target,
            result,
            claim: self.claim,
        }
    }
}

/// Response to a [`PendingSubmit`].
#[derive(Debug)]
#[must_use]
pub struct SubmitOutcome {
    target: Option<RecipeId>,
    result: Result<Recipe, ApiError>,
    claim: Claim,
}

/// A delete that has claimed its record but not yet been sent.
#[derive(Debug)]
#[must_use]
pub struct PendingDelete {
    id: RecipeId,
    claim: Claim,
}

impl PendingDelete {
    pub fn id(&self) -> &RecipeId {
        &self.id
    }

    pub async fn send<A: RecipeApi>(self, api: &A) -> DeleteOutcome {
        let result = api.delete(&self.id).await;
        DeleteOutcome {
            id: self.id,
            result,
            claim: self.claim,
        }
    }
}

/// Response to a [`PendingDelete`].
#[derive(Debug)]
#[must_use]
pub struct DeleteOutcome {
    id: RecipeId,
    result: Result<(), ApiError>,
    claim: Claim,
}

/// Local mirror of a remote recipe collection, plus the form that edits it.
pub struct RecipeForm<A> {
    api: A,
    recipes: Vec<Recipe>,
    form: FormState,
    error: Option<ErrorState>,
    submit_slot: Weak<()>,
    in_flight: HashMap<RecipeId, Weak<()>>,
}

impl<A> RecipeForm<A> {
    /// Creates an empty form. Nothing is fetched until [`load_all`](Self::load_all).
    pub fn new(api: A) -> Self {
        Self {
            api,
            recipes: Vec::new(),
            form: FormState::new(),
            error: None,
            submit_slot: Weak::new(),
            in_flight: HashMap::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn error(&self) -> Option<&ErrorState> {
        self.error.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submit_slot.strong_count() > 0
    }

    /// Whether an update or delete of `id` is outstanding.
    pub fn is_in_flight(&self, id: &RecipeId) -> bool {
        self.in_flight
            .get(id)
            .is_some_and(|slot| slot.strong_count() > 0)
    }

    /// Forgets record slots whose pending value or outcome is gone.
    fn release_dropped(&mut self) {
        self.in_flight.retain(|_, slot| slot.strong_count() > 0);
    }

    pub fn get(&self, id: &RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| &r.id == id)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.form.fields.name = name.into();
    }

    pub fn set_cuisine(&mut self, cuisine: impl Into<String>) {
        self.form.fields.cuisine = cuisine.into();
    }

    pub fn set_ingredients(&mut self, ingredients: impl Into<String>) {
        self.form.fields.ingredients = ingredients.into();
    }

    pub fn set_favorite(&mut self, favorite: bool) {
        self.form.fields.favorite = favorite;
    }

    /// Loads the record `id` into the form for editing. Purely local.
    pub fn begin_edit(&mut self, id: &RecipeId) -> Result<&FormState, SyncError> {
        let recipe = self
            .recipes
            .iter()
            .find(|r| &r.id == id)
            .ok_or_else(|| SyncError::NotFound(id.clone()))?;
        self.form = FormState::editing(recipe);
        Ok(&self.form)
    }

    /// Drops the edit target and empties the form.
    pub fn cancel_edit(&mut self) {
        self.form.clear();
    }

    /// Validates the form and claims the submit slot.
    ///
    /// Refused while another submit is outstanding, or while a delete of the
    /// edit target is. Empty required fields set the validation error and
    /// never reach the store.
    pub fn prepare_submit(&mut self) -> Result<PendingSubmit, SyncError> {
        if self.is_submitting() {
            return Err(SyncError::SubmitInFlight);
        }
        let target = self.form.edit_target().cloned();
        if let Some(id) = &target {
            if self.is_in_flight(id) {
                return Err(SyncError::RecordInFlight(id.clone()));
            }
        }

        if !self.form.fields.is_complete() {
            self.error = Some(ErrorState::new(Operation::Submit, ErrorKind::Validation));
            return Err(SyncError::MissingFields);
        }

        self.release_dropped();
        let claim = Claim::new(());
        self.submit_slot = Arc::downgrade(&claim);
        if let Some(id) = &target {
            self.in_flight.insert(id.clone(), Arc::downgrade(&claim));
        }

        Ok(PendingSubmit {
            target,
            fields: self.form.fields.clone(),
            claim,
        })
    }

    /// Reconciles a submit response into the collection.
    ///
    /// A create is appended; an update replaces the entry with the target's
    /// id in place. On success the form and the error are cleared; on failure
    /// the form keeps the user's input.
    pub fn finish_submit(&mut self, outcome: SubmitOutcome) -> Result<Recipe, SyncError> {
        let SubmitOutcome {
            target,
            result,
            claim,
        } = outcome;
        drop(claim);
        self.release_dropped();

        let recipe = match result {
            Ok(recipe) => recipe,
            Err(e) => return Err(self.fail(Operation::Submit, e)),
        };

        match &target {
            None => {
                tracing::debug!("Appending created recipe {}", recipe.id);
                self.recipes.push(recipe.clone());
            }
            Some(id) => match self.recipes.iter_mut().find(|r| &r.id == id) {
                Some(slot) => {
                    tracing::debug!("Replacing recipe {}", id);
                    *slot = recipe.clone();
                }
                None => tracing::debug!("Updated recipe {} is no longer listed", id),
            },
        }

        self.form.clear();
        self.error = None;
        Ok(recipe)
    }

    /// Claims `id` for deletion. Refused while another mutation of `id` is
    /// outstanding.
    pub fn prepare_remove(&mut self, id: &RecipeId) -> Result<PendingDelete, SyncError> {
        if self.is_in_flight(id) {
            return Err(SyncError::RecordInFlight(id.clone()));
        }
        self.release_dropped();
        let claim = Claim::new(());
        self.in_flight.insert(id.clone(), Arc::downgrade(&claim));
        Ok(PendingDelete {
            id: id.clone(),
            claim,
        })
    }

    /// Applies a delete response: on success the matching entry, if any, is
    /// dropped from the collection. A form editing the deleted record is
    /// cleared.
    pub fn finish_remove(&mut self, outcome: DeleteOutcome) -> Result<(), SyncError> {
        let DeleteOutcome { id, result, claim } = outcome;
        drop(claim);
        self.release_dropped();

        if let Err(e) = result {
            return Err(self.fail(Operation::Delete, e));
        }

        let before = self.recipes.len();
        self.recipes.retain(|r| r.id != id);
        tracing::debug!(
            "Deleted recipe {}, {} local entry removed",
            id,
            before - self.recipes.len()
        );
        if self.form.edit_target() == Some(&id) {
            self.form.clear();
        }
        self.error = None;
        Ok(())
    }

    fn fail(&mut self, operation: Operation, e: ApiError) -> SyncError {
        let err = SyncError::from(e);
        tracing::warn!("{:?} failed: {}", operation, err);
        self.error = Some(ErrorState::new(operation, err.kind()));
        err
    }
}

impl<A: RecipeApi> RecipeForm<A> {
    /// Creates the form and fetches the collection once.
    ///
    /// A failed fetch leaves the collection empty; the failure is available
    /// from [`error`](Self::error).
    pub async fn mount(api: A) -> Self {
        let mut form = Self::new(api);
        // Recorded in the error state
        let _ = form.load_all().await;
        form
    }

    /// Replaces the collection with the store's current list.
    ///
    /// On failure the collection is left as it was.
    pub async fn load_all(&mut self) -> Result<&[Recipe], SyncError> {
        match self.api.list().await {
            Ok(recipes) => {
                tracing::debug!("Fetched {} recipe(s)", recipes.len());
                self.recipes = recipes;
                self.error = None;
                Ok(&self.recipes)
            }
            Err(e) => Err(self.fail(Operation::Fetch, e)),
        }
    }

    /// Creates or updates a recipe from the form's current contents.
    pub async fn submit(&mut self) -> Result<Recipe, SyncError> {
        let pending = self.prepare_submit()?;
        let outcome = pending.send(&self.api).await;
        self.finish_submit(outcome)
    }

    /// Deletes `id` remotely, then locally.
    pub async fn remove(&mut self, id: &RecipeId) -> Result<(), SyncError> {
        let pending = self.prepare_remove(id)?;
        let outcome = pending.send(&self.api).await;
        self.finish_remove(outcome)
    }
}

impl<A> fmt::Display for RecipeForm<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = &self.form.fields;
        match self.form.edit_target() {
            Some(id) => writeln!(f, "Edit recipe {}", id)?,
            None => writeln!(f, "New recipe")?,
        }
        writeln!(f, "  Name:        {}", fields.name)?;
        writeln!(f, "  Cuisine:     {}", fields.cuisine)?;
        writeln!(f, "  Ingredients: {}", fields.ingredients)?;
        writeln!(
            f,
            "  Favorite:    [{}]",
            if fields.favorite { "x" } else { " " }
        )?;

        if let Some(error) = &self.error {
            writeln!(f, "\n! {}", error)?;
        }

        writeln!(f)?;
        if self.recipes.is_empty() {
            return writeln!(f, "No recipes");
        }
        for recipe in &self.recipes {
            writeln!(f, "[{}]", recipe.id)?;
            writeln!(f, "{}", recipe)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        List,
        Create(RecipeFields),
        Update(RecipeId, RecipeFields),
        Delete(RecipeId),
    }

    #[derive(Default)]
    struct FakeState {
        recipes: Vec<Recipe>,
        calls: Vec<Call>,
        fail_with: Option<ApiError>,
        stall: bool,
        next_id: u32,
    }

    /// In-memory store that records calls and can be told to fail.
    #[derive(Clone, Default)]
    struct FakeApi {
        state: Arc<Mutex<FakeState>>,
    }

    impl FakeApi {
        fn with_recipes(recipes: Vec<Recipe>) -> Self {
            let api = Self::default();
            let next_id = recipes.len() as u32 + 1;
            {
                let mut state = api.state.lock().unwrap();
                state.recipes = recipes;
                state.next_id = next_id;
            }
            api
        }

        fn fail_with(&self, err: ApiError) {
            self.state.lock().unwrap().fail_with = Some(err);
        }

        fn recover(&self) {
            self.state.lock().unwrap().fail_with = None;
        }

        /// Makes every later create wait forever.
        fn stall(&self, stall: bool) {
            self.state.lock().unwrap().stall = stall;
        }

        fn calls(&self) -> Vec<Call> {
            self.state.lock().unwrap().calls.clone()
        }

        fn record(&self, call: Call) -> Result<(), ApiError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(call);
            match &state.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    impl RecipeApi for FakeApi {
        async fn list(&self) -> Result<Vec<Recipe>, ApiError> {
            self.record(Call::List)?;
            Ok(self.state.lock().unwrap().recipes.clone())
        }

        async fn create(&self, fields: &RecipeFields) -> Result<Recipe, ApiError> {
            self.record(Call::Create(fields.clone()))?;
            let stalled = self.state.lock().unwrap().stall;
            if stalled {
                std::future::pending::<()>().await;
            }
            let mut state = self.state.lock().unwrap();
            let id = format!("srv-{}", state.next_id);
            state.next_id += 1;
            let recipe = Recipe::new(id, fields.clone());
            state.recipes.push(recipe.clone());
            Ok(recipe)
        }

        async fn update(&self, id: &RecipeId, fields: &RecipeFields) -> Result<Recipe, ApiError> {
            self.record(Call::Update(id.clone(), fields.clone()))?;
            let recipe = Recipe::new(id.clone(), fields.clone());
            let mut state = self.state.lock().unwrap();
            if let Some(slot) = state.recipes.iter_mut().find(|r| &r.id == id) {
                *slot = recipe.clone();
            }
            Ok(recipe)
        }

        async fn delete(&self, id: &RecipeId) -> Result<(), ApiError> {
            self.record(Call::Delete(id.clone()))?;
            self.state.lock().unwrap().recipes.retain(|r| &r.id != id);
            Ok(())
        }
    }

    fn soup() -> Recipe {
        Recipe::new("1", RecipeFields::new("Soup", "FR", "water,salt"))
    }

    fn tacos() -> Recipe {
        Recipe::new(
            "2",
            RecipeFields::new("Tacos", "MX", "corn,beans").with_favorite(true),
        )
    }

    fn offline() -> ApiError {
        ApiError::Transport("connection refused".to_string())
    }

    async fn mounted(recipes: Vec<Recipe>) -> (RecipeForm<FakeApi>, FakeApi) {
        let api = FakeApi::with_recipes(recipes);
        let form = RecipeForm::mount(api.clone()).await;
        (form, api)
    }

    fn fill(form: &mut RecipeForm<FakeApi>, name: &str, cuisine: &str, ingredients: &str) {
        form.set_name(name);
        form.set_cuisine(cuisine);
        form.set_ingredients(ingredients);
    }

    #[tokio::test]
    async fn test_mount_fetches_collection() {
        let (form, api) = mounted(vec![soup(), tacos()]).await;
        assert_eq!(form.recipes(), &[soup(), tacos()]);
        assert!(form.error().is_none());
        assert_eq!(api.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn test_mount_failure_leaves_collection_empty() {
        let api = FakeApi::with_recipes(vec![soup()]);
        api.fail_with(offline());

        let form = RecipeForm::mount(api.clone()).await;

        assert!(form.recipes().is_empty());
        let error = form.error().unwrap();
        assert_eq!(error.message(), "Failed to fetch recipes");
        assert_eq!(error.kind, ErrorKind::Transport);
        // No automatic retry
        assert_eq!(api.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn test_reload_failure_keeps_collection() {
        let (mut form, api) = mounted(vec![soup()]).await;
        api.fail_with(offline());

        assert!(form.load_all().await.is_err());
        assert_eq!(form.recipes(), &[soup()]);

        api.recover();
        form.load_all().await.unwrap();
        assert!(form.error().is_none());
    }

    #[tokio::test]
    async fn test_submit_create_appends() {
        let (mut form, api) = mounted(vec![soup()]).await;
        fill(&mut form, "Tacos", "MX", "corn");
        form.set_favorite(true);

        let created = form.submit().await.unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(form.recipes().len(), 2);
        assert_eq!(form.recipes()[1], created);
        assert_eq!(
            created.fields,
            RecipeFields::new("Tacos", "MX", "corn").with_favorite(true)
        );
        assert_eq!(form.form(), &FormState::new());
        assert!(form.error().is_none());
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_edit_then_submit_replaces_in_place() {
        let (mut form, api) = mounted(vec![soup(), tacos()]).await;

        let state = form.begin_edit(&RecipeId::from("1")).unwrap();
        assert_eq!(state.fields.name, "Soup");

        form.set_name("Stew");
        let updated = form.submit().await.unwrap();

        assert_eq!(updated.id, RecipeId::from("1"));
        let expected = Recipe::new("1", RecipeFields::new("Stew", "FR", "water,salt"));
        assert_eq!(form.recipes(), &[expected.clone(), tacos()]);
        assert!(!form.form().is_editing());
        assert_eq!(
            api.calls().last(),
            Some(&Call::Update(RecipeId::from("1"), expected.fields))
        );
    }

    #[tokio::test]
    async fn test_begin_edit_copies_fields_without_network() {
        let (mut form, api) = mounted(vec![soup(), tacos()]).await;

        let state = form.begin_edit(&RecipeId::from("2")).unwrap().clone();

        assert_eq!(state.fields, tacos().fields);
        assert_eq!(state.edit_target(), Some(&RecipeId::from("2")));
        assert_eq!(api.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn test_begin_edit_unknown_id() {
        let (mut form, _api) = mounted(vec![soup()]).await;
        form.set_name("draft");

        let err = form.begin_edit(&RecipeId::from("9")).unwrap_err();

        assert_eq!(err, SyncError::NotFound(RecipeId::from("9")));
        assert_eq!(form.form().fields.name, "draft");
        assert!(form.error().is_none());
    }

    #[tokio::test]
    async fn test_submit_validation_never_calls_store() {
        let (mut form, api) = mounted(vec![soup()]).await;
        fill(&mut form, "", "FR", "x");

        let err = form.submit().await.unwrap_err();

        assert_eq!(err, SyncError::MissingFields);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(form.recipes(), &[soup()]);
        assert_eq!(
            form.error().unwrap().message(),
            "Name, cuisine, and ingredients are required"
        );
        assert_eq!(api.calls(), vec![Call::List]);
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_each_required_field_is_checked() {
        let (mut form, api) = mounted(vec![]).await;
        for (name, cuisine, ingredients) in [("", "a", "b"), ("a", "", "b"), ("a", "b", " ")] {
            fill(&mut form, name, cuisine, ingredients);
            assert_eq!(form.submit().await.unwrap_err(), SyncError::MissingFields);
        }
        assert_eq!(api.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_input() {
        let (mut form, api) = mounted(vec![soup()]).await;
        form.begin_edit(&RecipeId::from("1")).unwrap();
        form.set_name("Stew");
        api.fail_with(ApiError::Rejected {
            status: 500,
            message: "boom".to_string(),
        });

        let err = form.submit().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Rejected);
        assert_eq!(form.recipes(), &[soup()]);
        assert_eq!(form.form().fields.name, "Stew");
        assert_eq!(form.form().edit_target(), Some(&RecipeId::from("1")));
        let error = form.error().unwrap();
        assert_eq!(error.message(), "There was an error submitting the data");
        assert!(!error.is_retryable());

        // Retry succeeds with the preserved input
        api.recover();
        form.submit().await.unwrap();
        assert_eq!(form.recipes()[0].name(), "Stew");
        assert!(form.error().is_none());
    }

    #[tokio::test]
    async fn test_error_not_cleared_by_new_attempt() {
        let (mut form, api) = mounted(vec![soup()]).await;
        api.fail_with(offline());
        fill(&mut form, "A", "B", "C");
        assert!(form.submit().await.is_err());

        let pending = form.prepare_submit().unwrap();
        assert!(form.error().is_some());

        api.recover();
        let outcome = pending.send(form.api()).await;
        form.finish_submit(outcome).unwrap();
        assert!(form.error().is_none());
    }

    #[tokio::test]
    async fn test_remove_drops_entry() {
        let (mut form, api) = mounted(vec![soup(), tacos()]).await;

        form.remove(&RecipeId::from("1")).await.unwrap();

        assert_eq!(form.recipes(), &[tacos()]);
        assert_eq!(api.calls().last(), Some(&Call::Delete(RecipeId::from("1"))));
    }

    #[tokio::test]
    async fn test_remove_absent_id_leaves_collection() {
        let (mut form, api) = mounted(vec![soup()]).await;

        form.remove(&RecipeId::from("9")).await.unwrap();
        assert_eq!(form.recipes(), &[soup()]);

        api.fail_with(ApiError::Rejected {
            status: 404,
            message: "Recipe not found: 9".to_string(),
        });
        let err = form.remove(&RecipeId::from("9")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rejected);
        assert_eq!(form.recipes(), &[soup()]);
        assert_eq!(
            form.error().unwrap().message(),
            "There was an error deleting the recipe"
        );
    }

    #[tokio::test]
    async fn test_remove_failure_keeps_entry() {
        let (mut form, api) = mounted(vec![soup(), tacos()]).await;
        api.fail_with(offline());

        let err = form.remove(&RecipeId::from("2")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(form.recipes(), &[soup(), tacos()]);
        assert!(form.error().unwrap().is_retryable());
        assert!(!form.is_in_flight(&RecipeId::from("2")));
    }

    #[tokio::test]
    async fn test_remove_of_edit_target_clears_form() {
        let (mut form, _api) = mounted(vec![soup(), tacos()]).await;
        let id = RecipeId::from("1");
        form.begin_edit(&id).unwrap();

        form.remove(&id).await.unwrap();

        assert_eq!(form.form(), &FormState::new());
        assert_eq!(form.form().edit_target(), None);
        assert_eq!(form.recipes(), &[tacos()]);
    }

    #[tokio::test]
    async fn test_remove_of_other_record_keeps_edit() {
        let (mut form, _api) = mounted(vec![soup(), tacos()]).await;
        let editing = RecipeId::from("2");
        form.begin_edit(&editing).unwrap();

        form.remove(&RecipeId::from("1")).await.unwrap();

        assert_eq!(form.form().edit_target(), Some(&editing));
        assert_eq!(form.form().fields.name, "Tacos");
    }

    #[tokio::test]
    async fn test_double_submit_is_refused() {
        let (mut form, api) = mounted(vec![]).await;
        fill(&mut form, "Soup", "FR", "water");

        let first = form.prepare_submit().unwrap();
        assert!(form.is_submitting());
        assert_eq!(
            form.prepare_submit().unwrap_err(),
            SyncError::SubmitInFlight
        );
        assert!(form.error().is_none());

        let outcome = first.send(&api).await;
        form.finish_submit(outcome).unwrap();
        assert_eq!(form.recipes().len(), 1);
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_dropped_submit_releases_slot() {
        let (mut form, _api) = mounted(vec![]).await;
        fill(&mut form, "Soup", "FR", "water");

        let abandoned = form.prepare_submit().unwrap();
        assert!(form.is_submitting());
        drop(abandoned);
        assert!(!form.is_submitting());

        let recipe = form.submit().await.unwrap();
        assert_eq!(form.recipes(), &[recipe]);
    }

    #[tokio::test]
    async fn test_dropped_update_releases_record() {
        let (mut form, _api) = mounted(vec![soup()]).await;
        let id = RecipeId::from("1");
        form.begin_edit(&id).unwrap();

        let update = form.prepare_submit().unwrap();
        let outcome = update.send(form.api()).await;
        assert!(form.is_in_flight(&id));
        drop(outcome);

        assert!(!form.is_in_flight(&id));
        assert!(!form.is_submitting());
        form.remove(&id).await.unwrap();
        assert!(form.recipes().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_delete_releases_record() {
        let (mut form, _api) = mounted(vec![soup()]).await;
        let id = RecipeId::from("1");

        let abandoned = form.prepare_remove(&id).unwrap();
        assert!(form.is_in_flight(&id));
        drop(abandoned);
        assert!(!form.is_in_flight(&id));

        let delete = form.prepare_remove(&id).unwrap();
        let outcome = delete.send(form.api()).await;
        form.finish_remove(outcome).unwrap();
        assert!(form.recipes().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_submit_releases_slot() {
        let (mut form, api) = mounted(vec![]).await;
        fill(&mut form, "Soup", "FR", "water");
        api.stall(true);

        let timed_out = tokio::time::timeout(Duration::from_millis(50), form.submit()).await;
        assert!(timed_out.is_err());
        assert!(!form.is_submitting());
        assert!(form.recipes().is_empty());

        api.stall(false);
        let recipe = form.submit().await.unwrap();
        assert_eq!(form.recipes(), &[recipe]);
    }

    #[tokio::test]
    async fn test_record_mutations_are_exclusive() {
        let (mut form, api) = mounted(vec![soup()]).await;
        let id = RecipeId::from("1");

        form.begin_edit(&id).unwrap();
        let update = form.prepare_submit().unwrap();
        assert!(form.is_in_flight(&id));
        assert_eq!(
            form.prepare_remove(&id).unwrap_err(),
            SyncError::RecordInFlight(id.clone())
        );

        let outcome = update.send(&api).await;
        form.finish_submit(outcome).unwrap();

        let delete = form.prepare_remove(&id).unwrap();
        form.begin_edit(&id).unwrap();
        assert_eq!(
            form.prepare_submit().unwrap_err(),
            SyncError::RecordInFlight(id.clone())
        );

        let outcome = delete.send(&api).await;
        form.finish_remove(outcome).unwrap();
        assert!(form.recipes().is_empty());
    }

    #[tokio::test]
    async fn test_completions_apply_in_arrival_order() {
        let (mut form, api) = mounted(vec![soup(), tacos()]).await;

        fill(&mut form, "Pho", "VN", "beef");
        let create = form.prepare_submit().unwrap();
        let delete = form.prepare_remove(&RecipeId::from("1")).unwrap();

        // User keeps typing while both requests are outstanding
        form.set_name("next draft");

        let deleted = delete.send(&api).await;
        let created = create.send(&api).await;

        form.finish_remove(deleted).unwrap();
        assert_eq!(form.recipes(), &[tacos()]);

        let recipe = form.finish_submit(created).unwrap();
        assert_eq!(form.recipes(), &[tacos(), recipe]);
        // A successful submit resets the form
        assert_eq!(form.form().fields.name, "");
    }

    #[tokio::test]
    async fn test_update_of_vanished_record_is_not_appended() {
        let (mut form, api) = mounted(vec![soup(), tacos()]).await;
        let id = RecipeId::from("1");
        form.begin_edit(&id).unwrap();
        form.set_name("Stew");
        let update = form.prepare_submit().unwrap();

        // Record disappears locally while the update is in flight
        form.recipes.retain(|r| r.id != id);

        let outcome = update.send(&api).await;
        form.finish_submit(outcome).unwrap();
        assert_eq!(form.recipes(), &[tacos()]);
    }

    #[tokio::test]
    async fn test_cancel_edit() {
        let (mut form, _api) = mounted(vec![soup()]).await;
        form.begin_edit(&RecipeId::from("1")).unwrap();

        form.cancel_edit();

        assert_eq!(form.form(), &FormState::new());
    }

    #[tokio::test]
    async fn test_render() {
        let (mut form, api) = mounted(vec![soup(), tacos()]).await;
        form.begin_edit(&RecipeId::from("2")).unwrap();
        api.fail_with(offline());
        let _ = form.remove(&RecipeId::from("1")).await;

        let text = form.to_string();

        assert!(text.contains("Edit recipe 2"));
        assert!(text.contains("Name:        Tacos"));
        assert!(text.contains("Favorite:    [x]"));
        assert!(text.contains("! There was an error deleting the recipe"));
        assert!(text.contains("[1]"));
        assert!(text.contains("Soup - FR"));
    }

    #[tokio::test]
    async fn test_render_empty() {
        let (form, _api) = mounted(vec![]).await;
        let text = form.to_string();
        assert!(text.starts_with("New recipe"));
        assert!(text.contains("No recipes"));
        assert!(!text.contains('!'));
    }
}
