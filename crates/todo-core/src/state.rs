//! Local Todo State
//!
//! The client-side cache of lists and items plus UI-only selection state.
//! Mutators are applied by `TodoStore` after the remote call succeeded.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{ItemId, ListId, TodoItem, TodoList};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoState {
    /// Lists of the signed-in user, oldest first
    pub lists: Vec<TodoList>,
    /// Items of the active list, oldest first
    pub items: Vec<TodoItem>,
    /// At most one selected list
    pub active_list: Option<ListId>,
    /// Items currently shown in edit mode; never persisted
    pub editing: BTreeSet<ItemId>,
}

impl TodoState {
    pub fn active(&self) -> Option<&TodoList> {
        let active = self.active_list.as_ref()?;
        self.lists.iter().find(|list| &list.id == active)
    }

    pub fn is_active(&self, id: &ListId) -> bool {
        self.active_list.as_ref() == Some(id)
    }

    pub fn item(&self, id: &ItemId) -> Option<&TodoItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn is_editing(&self, id: &ItemId) -> bool {
        self.editing.contains(id)
    }

    pub(crate) fn replace_lists(&mut self, lists: Vec<TodoList>) {
        self.lists = lists;
        let active_gone = self
            .active_list
            .as_ref()
            .is_some_and(|id| !self.lists.iter().any(|list| &list.id == id));
        if active_gone {
            self.set_active(None);
        }
    }

    pub(crate) fn push_list(&mut self, list: TodoList) {
        self.lists.push(list);
    }

    /// Remove a list; returns whether it was the active one
    pub(crate) fn remove_list(&mut self, id: &ListId) -> bool {
        self.lists.retain(|list| &list.id != id);
        let was_active = self.is_active(id);
        if was_active {
            self.set_active(None);
        }
        was_active
    }

    /// Switch the active list. Items always belong to the active list, so a
    /// change drops them until they are fetched again.
    pub(crate) fn set_active(&mut self, id: Option<ListId>) {
        if self.active_list != id {
            self.active_list = id;
            self.items.clear();
            self.editing.clear();
        }
    }

    pub(crate) fn replace_items(&mut self, items: Vec<TodoItem>) {
        self.items = items;
        self.editing.clear();
    }

    pub(crate) fn push_item(&mut self, item: TodoItem) {
        self.items.push(item);
    }

    /// Apply a confirmed text edit and leave edit mode
    pub(crate) fn patch_item_text(&mut self, id: &ItemId, title: &str, description: &str) {
        if let Some(item) = self.items.iter_mut().find(|item| &item.id == id) {
            item.title = title.to_string();
            item.description = description.to_string();
        }
        self.editing.remove(id);
    }

    pub(crate) fn set_completed(&mut self, id: &ItemId, completed: bool) {
        if let Some(item) = self.items.iter_mut().find(|item| &item.id == id) {
            item.completed = completed;
        }
    }

    pub(crate) fn remove_item(&mut self, id: &ItemId) {
        self.items.retain(|item| &item.id != id);
        self.editing.remove(id);
    }

    /// Flip edit mode for an item of the active list
    pub(crate) fn toggle_edit(&mut self, id: &ItemId) {
        if !self.editing.remove(id) && self.item(id).is_some() {
            self.editing.insert(id.clone());
        }
    }
}
