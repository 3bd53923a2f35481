//! Application Context
//!
//! Shared handles provided via Leptos Context API. The platform objects are
//! `!Send`, so they live in local storage of the reactive owner.

use std::rc::Rc;

use leptos::prelude::*;
use todo_core::forms::{LoginFlow, RegisterFlow};
use todo_core::repository::IdentityProvider;
use todo_core::TodoStore;

use crate::backend::Backend;
use crate::store::AppStore;

#[derive(Clone, Copy)]
pub struct AppContext {
    identity: StoredValue<Rc<dyn IdentityProvider>, LocalStorage>,
    todos: StoredValue<Rc<TodoStore>, LocalStorage>,
    register: StoredValue<Rc<RegisterFlow>, LocalStorage>,
    login: StoredValue<Rc<LoginFlow>, LocalStorage>,
    pub store: AppStore,
}

impl AppContext {
    pub fn new(backend: &Backend, todos: Rc<TodoStore>, store: AppStore) -> Self {
        let register = RegisterFlow::new(backend.identity.clone(), backend.documents.clone());
        let login = LoginFlow::new(backend.identity.clone());
        Self {
            identity: StoredValue::new_local(backend.identity.clone()),
            todos: StoredValue::new_local(todos),
            register: StoredValue::new_local(Rc::new(register)),
            login: StoredValue::new_local(Rc::new(login)),
            store,
        }
    }

    pub fn identity(&self) -> Rc<dyn IdentityProvider> {
        self.identity.get_value()
    }

    pub fn todos(&self) -> Rc<TodoStore> {
        self.todos.get_value()
    }

    pub fn register_flow(&self) -> Rc<RegisterFlow> {
        self.register.get_value()
    }

    pub fn login_flow(&self) -> Rc<LoginFlow> {
        self.login.get_value()
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
