//! Todo Store Adapter
//!
//! Turns user actions into remote calls and writes confirmed results into
//! the local `TodoState`. Nothing changes locally before the platform has
//! answered, and failures are logged and returned without touching state.
//!
//! Borrows of the local state are never held across an `.await`.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;

use crate::domain::{ItemId, ListId, TodoItem, TodoList, UserId, UserProfile};
use crate::error::PlatformResult;
use crate::repository::{DocumentStore, TodoRepository};
use crate::state::TodoState;

type Observer = Box<dyn Fn(&TodoState)>;

pub struct TodoStore {
    repo: TodoRepository,
    owner: RefCell<Option<UserId>>,
    state: RefCell<TodoState>,
    observer: RefCell<Option<Observer>>,
}

impl TodoStore {
    pub fn new(documents: Rc<dyn DocumentStore>) -> Self {
        Self {
            repo: TodoRepository::new(documents),
            owner: RefCell::new(None),
            state: RefCell::new(TodoState::default()),
            observer: RefCell::new(None),
        }
    }

    /// Register the callback that receives every new state snapshot
    pub fn observe(&self, observer: impl Fn(&TodoState) + 'static) {
        *self.observer.borrow_mut() = Some(Box::new(observer));
    }

    pub fn snapshot(&self) -> TodoState {
        self.state.borrow().clone()
    }

    pub fn owner(&self) -> Option<UserId> {
        self.owner.borrow().clone()
    }

    /// Scope the store to a user. Switching users drops all cached state.
    pub fn set_owner(&self, owner: Option<UserId>) {
        if *self.owner.borrow() == owner {
            return;
        }
        log::debug!("todo store owner changed to {owner:?}");
        *self.owner.borrow_mut() = owner;
        self.apply(|state| *state = TodoState::default());
    }

    fn apply(&self, change: impl FnOnce(&mut TodoState)) {
        change(&mut self.state.borrow_mut());
        let state = self.state.borrow();
        if let Some(observer) = self.observer.borrow().as_ref() {
            observer(&state);
        }
    }

    /// The owner's profile document, if one was written at registration
    pub async fn load_profile(&self) -> PlatformResult<Option<UserProfile>> {
        let Some(owner) = self.owner() else {
            return Ok(None);
        };
        let profile = self
            .repo
            .load_profile(&owner)
            .await
            .inspect_err(|e| log::error!("Error fetching user profile: {e}"))?;

        // Another user signed in meanwhile
        if self.owner().as_ref() != Some(&owner) {
            return Ok(None);
        }
        Ok(profile)
    }

    /// Replace the local lists with the owner's lists, oldest first
    pub async fn fetch_lists(&self) -> PlatformResult<()> {
        let Some(owner) = self.owner() else {
            return Ok(());
        };
        let lists = self
            .repo
            .lists_for_owner(&owner)
            .await
            .inspect_err(|e| log::error!("Error fetching todo lists: {e}"))?;

        if self.owner().as_ref() == Some(&owner) {
            log::info!("loaded {} todo lists", lists.len());
            self.apply(|state| state.replace_lists(lists));
        }
        Ok(())
    }

    /// Create a list and make it active.
    ///
    /// A blank name, or no signed-in user, is a no-op returning `None`.
    /// The name is stored as typed; only the blank check trims it.
    pub async fn create_list(&self, name: &str) -> PlatformResult<Option<TodoList>> {
        let Some(owner) = self.owner() else {
            return Ok(None);
        };
        if name.trim().is_empty() {
            return Ok(None);
        }

        let list = self
            .repo
            .create_list(&TodoList::new(name, owner.clone(), Utc::now()))
            .await
            .inspect_err(|e| log::error!("Error creating list: {e}"))?;

        if self.owner().as_ref() != Some(&owner) {
            log::debug!("dropping list {} created for a previous owner", list.id);
            return Ok(Some(list));
        }
        self.apply(|state| state.push_list(list.clone()));
        self.select_list(Some(list.id.clone())).await?;
        Ok(Some(list))
    }

    /// Delete a list and all of its items.
    pub async fn delete_list(&self, id: &ListId) -> PlatformResult<()> {
        let removed = self
            .repo
            .delete_list_cascade(id)
            .await
            .inspect_err(|e| log::error!("Error deleting todo list: {e}"))?;

        log::info!("deleted list {id} and {removed} items");
        self.apply(|state| {
            state.remove_list(id);
        });
        Ok(())
    }

    /// Change the active list, then load its items. `None` clears the items.
    pub async fn select_list(&self, id: Option<ListId>) -> PlatformResult<()> {
        self.apply(|state| state.set_active(id.clone()));
        match id {
            Some(id) => self.fetch_items(&id).await,
            None => Ok(()),
        }
    }

    /// Replace the local items with the items of `list_id`, oldest first.
    ///
    /// The result is dropped if another list became active meanwhile.
    pub async fn fetch_items(&self, list_id: &ListId) -> PlatformResult<()> {
        let items = self
            .repo
            .items_for_list(list_id)
            .await
            .inspect_err(|e| log::error!("Error fetching todos: {e}"))?;

        if self.state.borrow().is_active(list_id) {
            self.apply(|state| state.replace_items(items));
        }
        Ok(())
    }

    /// Add an open item to the active list.
    ///
    /// A blank title, or no active list, is a no-op returning `None`.
    pub async fn add_item(&self, title: &str, description: &str) -> PlatformResult<Option<TodoItem>> {
        let Some(list_id) = self.state.borrow().active_list.clone() else {
            return Ok(None);
        };
        if title.trim().is_empty() {
            return Ok(None);
        }

        let item = self
            .repo
            .create_item(&TodoItem::new(title, description, list_id.clone(), Utc::now()))
            .await
            .inspect_err(|e| log::error!("Error adding todo: {e}"))?;

        if self.state.borrow().is_active(&list_id) {
            self.apply(|state| state.push_item(item.clone()));
        }
        Ok(Some(item))
    }

    /// Persist new title and description and leave edit mode
    pub async fn update_item(&self, id: &ItemId, title: &str, description: &str) -> PlatformResult<()> {
        self.repo
            .update_item_text(id, title, description)
            .await
            .inspect_err(|e| log::error!("Error updating todo: {e}"))?;

        self.apply(|state| state.patch_item_text(id, title, description));
        Ok(())
    }

    /// Persist the inverse completion flag; returns the new value.
    ///
    /// Items not in the local state are ignored.
    pub async fn toggle_complete(&self, id: &ItemId) -> PlatformResult<Option<bool>> {
        let Some(completed) = self.state.borrow().item(id).map(|item| !item.completed) else {
            return Ok(None);
        };

        self.repo
            .set_completed(id, completed)
            .await
            .inspect_err(|e| log::error!("Error toggling todo completion: {e}"))?;

        self.apply(|state| state.set_completed(id, completed));
        Ok(Some(completed))
    }

    pub async fn delete_item(&self, id: &ItemId) -> PlatformResult<()> {
        self.repo
            .delete_item(id)
            .await
            .inspect_err(|e| log::error!("Error deleting todo: {e}"))?;

        self.apply(|state| state.remove_item(id));
        Ok(())
    }

    /// Enter or leave edit mode for an item (local only)
    pub fn toggle_edit(&self, id: &ItemId) {
        self.apply(|state| state.toggle_edit(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldValue, Fields, StoredDocument};
    use crate::repository::{DocumentRef, MemoryStore};
    use std::cell::Cell;

    /// Store that runs a hook while a call is in flight, after the wrapped
    /// store has answered but before the caller sees the result
    #[derive(Default)]
    struct Interrupting {
        inner: MemoryStore,
        hook: RefCell<Option<Box<dyn Fn()>>>,
    }

    impl Interrupting {
        fn on_next_call(&self, hook: impl Fn() + 'static) {
            *self.hook.borrow_mut() = Some(Box::new(hook));
        }

        fn fire(&self) {
            let hook = self.hook.borrow_mut().take();
            if let Some(hook) = hook {
                hook();
            }
        }
    }

    #[async_trait::async_trait(?Send)]
    impl DocumentStore for Interrupting {
        async fn add(&self, collection: &str, fields: Fields) -> PlatformResult<String> {
            let id = self.inner.add(collection, fields).await;
            self.fire();
            id
        }

        async fn set(&self, collection: &str, id: &str, fields: Fields) -> PlatformResult<()> {
            self.inner.set(collection, id, fields).await
        }

        async fn get(&self, collection: &str, id: &str) -> PlatformResult<Option<StoredDocument>> {
            let doc = self.inner.get(collection, id).await;
            self.fire();
            doc
        }

        async fn query_eq(
            &self,
            collection: &str,
            field: &str,
            value: &FieldValue,
        ) -> PlatformResult<Vec<StoredDocument>> {
            self.inner.query_eq(collection, field, value).await
        }

        async fn update(&self, collection: &str, id: &str, fields: Fields) -> PlatformResult<()> {
            self.inner.update(collection, id, fields).await
        }

        async fn delete(&self, collection: &str, id: &str) -> PlatformResult<()> {
            self.inner.delete(collection, id).await
        }

        async fn delete_batch(&self, refs: &[DocumentRef]) -> PlatformResult<()> {
            self.inner.delete_batch(refs).await
        }
    }

    fn setup_interrupting() -> (Rc<Interrupting>, Rc<TodoStore>) {
        let documents = Rc::new(Interrupting::default());
        let store = Rc::new(TodoStore::new(documents.clone()));
        store.set_owner(Some(UserId::new("u1")));
        (documents, store)
    }

    fn switch_owner_to(store: &Rc<TodoStore>, owner: &'static str) -> impl Fn() + 'static {
        let store = Rc::downgrade(store);
        move || {
            if let Some(store) = store.upgrade() {
                store.set_owner(Some(UserId::new(owner)));
            }
        }
    }

    fn setup() -> (Rc<MemoryStore>, TodoStore) {
        let documents = Rc::new(MemoryStore::new());
        let store = TodoStore::new(documents.clone());
        store.set_owner(Some(UserId::new("u1")));
        (documents, store)
    }

    #[tokio::test]
    async fn test_blank_list_name_is_noop() {
        let (documents, store) = setup();

        assert_eq!(store.create_list("").await.unwrap(), None);
        assert_eq!(store.create_list("   ").await.unwrap(), None);

        assert!(store.snapshot().lists.is_empty());
        assert_eq!(documents.document_count("todoLists"), 0);
    }

    #[tokio::test]
    async fn test_create_list_without_owner_is_noop() {
        let documents = Rc::new(MemoryStore::new());
        let store = TodoStore::new(documents.clone());

        assert_eq!(store.create_list("Work").await.unwrap(), None);
        assert_eq!(documents.document_count("todoLists"), 0);
    }

    #[tokio::test]
    async fn test_created_list_becomes_active() {
        let (_, store) = setup();

        let list = store.create_list("Work").await.unwrap().unwrap();

        let state = store.snapshot();
        assert_eq!(state.active_list, Some(list.id));
        assert_eq!(state.active().map(|l| l.name.as_str()), Some("Work"));
        assert!(state.items.is_empty());
    }

    #[tokio::test]
    async fn test_add_item_requires_title_and_active_list() {
        let (documents, store) = setup();
        assert_eq!(store.add_item("Buy milk", "").await.unwrap(), None);

        store.create_list("Work").await.unwrap();
        assert_eq!(store.add_item(" ", "desc").await.unwrap(), None);

        assert!(store.snapshot().items.is_empty());
        assert_eq!(documents.document_count("todos"), 0);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_original_value() {
        let (_, store) = setup();
        store.create_list("Work").await.unwrap();
        let item = store.add_item("Buy milk", "2%").await.unwrap().unwrap();

        assert_eq!(store.toggle_complete(&item.id).await.unwrap(), Some(true));
        assert_eq!(store.toggle_complete(&item.id).await.unwrap(), Some(false));

        assert!(!store.snapshot().item(&item.id).unwrap().completed);
        store.fetch_items(&item.list_id).await.unwrap();
        assert!(!store.snapshot().item(&item.id).unwrap().completed);
    }

    #[tokio::test]
    async fn test_update_item_leaves_edit_mode() {
        let (_, store) = setup();
        store.create_list("Work").await.unwrap();
        let item = store.add_item("Buy milk", "").await.unwrap().unwrap();
        store.toggle_edit(&item.id);
        assert!(store.snapshot().is_editing(&item.id));

        store.update_item(&item.id, "Buy oat milk", "1l").await.unwrap();

        let state = store.snapshot();
        assert!(!state.is_editing(&item.id));
        assert_eq!(state.item(&item.id).unwrap().title, "Buy oat milk");
    }

    #[tokio::test]
    async fn test_failed_calls_leave_state_unchanged() {
        let (documents, store) = setup();
        store.create_list("Work").await.unwrap();
        let item = store.add_item("Buy milk", "").await.unwrap().unwrap();
        let before = store.snapshot();

        documents.set_unavailable(true);
        assert!(store.create_list("Home").await.is_err());
        assert!(store.add_item("Bread", "").await.is_err());
        assert!(store.toggle_complete(&item.id).await.is_err());
        assert!(store.update_item(&item.id, "x", "y").await.is_err());
        assert!(store.delete_item(&item.id).await.is_err());
        assert!(store.delete_list(&item.list_id).await.is_err());

        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn test_delete_active_list_clears_selection() {
        let (documents, store) = setup();
        let work = store.create_list("Work").await.unwrap().unwrap();
        store.add_item("a", "").await.unwrap();
        store.add_item("b", "").await.unwrap();

        store.delete_list(&work.id).await.unwrap();

        let state = store.snapshot();
        assert!(state.lists.is_empty());
        assert!(state.active_list.is_none());
        assert!(state.items.is_empty());
        assert_eq!(documents.document_count("todos"), 0);
    }

    #[tokio::test]
    async fn test_selecting_none_clears_items() {
        let (_, store) = setup();
        store.create_list("Work").await.unwrap();
        store.add_item("a", "").await.unwrap();

        store.select_list(None).await.unwrap();

        assert!(store.snapshot().items.is_empty());
    }

    #[tokio::test]
    async fn test_owner_change_resets_state_and_notifies() {
        let (_, store) = setup();
        let notifications = Rc::new(Cell::new(0));
        let counter = Rc::clone(&notifications);
        store.observe(move |_| counter.set(counter.get() + 1));

        store.create_list("Work").await.unwrap();
        let after_create = notifications.get();
        assert!(after_create > 0);

        store.set_owner(Some(UserId::new("u2")));
        assert_eq!(store.snapshot(), TodoState::default());
        assert_eq!(notifications.get(), after_create + 1);

        store.fetch_lists().await.unwrap();
        assert!(store.snapshot().lists.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_lists_sees_other_clients_changes() {
        let (documents, store) = setup();
        let other = TodoStore::new(documents.clone());
        other.set_owner(Some(UserId::new("u1")));

        other.create_list("From elsewhere").await.unwrap();
        assert!(store.snapshot().lists.is_empty());

        store.fetch_lists().await.unwrap();
        assert_eq!(store.snapshot().lists.len(), 1);
    }

    #[tokio::test]
    async fn test_list_created_for_previous_owner_is_not_shown() {
        let (documents, store) = setup_interrupting();
        documents.on_next_call(switch_owner_to(&store, "u2"));

        let created = store.create_list("u1 secret").await.unwrap();

        assert!(created.is_some());
        let state = store.snapshot();
        assert_eq!(store.owner(), Some(UserId::new("u2")));
        assert!(state.lists.is_empty());
        assert!(state.active_list.is_none());
    }

    #[tokio::test]
    async fn test_profile_loaded_for_previous_owner_is_dropped() {
        let (documents, store) = setup_interrupting();
        TodoRepository::new(documents.clone())
            .save_profile(&UserProfile::new(UserId::new("u1"), "Alice", "a@b.com"))
            .await
            .unwrap();
        assert!(store.load_profile().await.unwrap().is_some());

        documents.on_next_call(switch_owner_to(&store, "u2"));

        assert_eq!(store.load_profile().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_name_is_stored_as_typed() {
        let (documents, store) = setup();

        let list = store.create_list("  Work ").await.unwrap().unwrap();

        assert_eq!(list.name, "  Work ");
        let doc = documents.get("todoLists", list.id.as_str()).await.unwrap().unwrap();
        assert_eq!(doc.fields["name"], FieldValue::String("  Work ".into()));
    }
}
