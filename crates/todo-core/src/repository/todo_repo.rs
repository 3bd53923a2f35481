//! Todo Repository
//!
//! Remote round trips for lists, items and profiles. Holds no local state;
//! `TodoStore` reconciles the results.

use std::rc::Rc;

use crate::domain::{fields, ItemId, ListId, TodoItem, TodoList, UserId, UserProfile};
use crate::error::PlatformResult;

use super::document_repo::DocumentRepository;
use super::traits::DocumentStore;

#[derive(Clone)]
pub struct TodoRepository {
    store: Rc<dyn DocumentStore>,
    lists: DocumentRepository<TodoList>,
    items: DocumentRepository<TodoItem>,
    profiles: DocumentRepository<UserProfile>,
}

impl TodoRepository {
    pub fn new(store: Rc<dyn DocumentStore>) -> Self {
        Self {
            lists: DocumentRepository::new(Rc::clone(&store)),
            items: DocumentRepository::new(Rc::clone(&store)),
            profiles: DocumentRepository::new(Rc::clone(&store)),
            store,
        }
    }

    pub async fn load_profile(&self, uid: &UserId) -> PlatformResult<Option<UserProfile>> {
        self.profiles.find_by_id(uid).await
    }

    pub async fn save_profile(&self, profile: &UserProfile) -> PlatformResult<()> {
        self.profiles.put(profile).await
    }

    /// Lists owned by `owner`, oldest first
    pub async fn lists_for_owner(&self, owner: &UserId) -> PlatformResult<Vec<TodoList>> {
        let mut lists = self
            .lists
            .find_where("userId", owner.as_str().into())
            .await?;
        lists.sort_by_key(|list| list.created_at);
        Ok(lists)
    }

    pub async fn create_list(&self, list: &TodoList) -> PlatformResult<TodoList> {
        self.lists.create(list).await
    }

    /// Delete a list together with every item that references it.
    ///
    /// The deletes go out as one atomic batch. Returns the number of items
    /// removed.
    pub async fn delete_list_cascade(&self, list_id: &ListId) -> PlatformResult<usize> {
        let mut refs = self
            .items
            .refs_where("listId", list_id.as_str().into())
            .await?;
        let removed = refs.len();

        refs.push(self.lists.doc_ref(list_id));
        self.store.delete_batch(&refs).await?;

        Ok(removed)
    }

    /// Items of one list, oldest first
    pub async fn items_for_list(&self, list_id: &ListId) -> PlatformResult<Vec<TodoItem>> {
        let mut items = self
            .items
            .find_where("listId", list_id.as_str().into())
            .await?;
        items.sort_by_key(|item| item.created_at);
        Ok(items)
    }

    pub async fn create_item(&self, item: &TodoItem) -> PlatformResult<TodoItem> {
        self.items.create(item).await
    }

    pub async fn update_item_text(
        &self,
        id: &ItemId,
        title: &str,
        description: &str,
    ) -> PlatformResult<()> {
        self.items
            .update_fields(
                id,
                fields([("title", title.into()), ("description", description.into())]),
            )
            .await
    }

    pub async fn set_completed(&self, id: &ItemId, completed: bool) -> PlatformResult<()> {
        self.items
            .update_fields(id, fields([("completed", completed.into())]))
            .await
    }

    pub async fn delete_item(&self, id: &ItemId) -> PlatformResult<()> {
        self.items.delete(id).await
    }
}
