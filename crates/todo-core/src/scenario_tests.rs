//! End-to-end flow against the in-memory platform: register, sign in,
//! manage a list and its items.

use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::UserId;
use crate::forms::{LoginFlow, LoginOutcome, RegisterFlow, RegisterOutcome, Registration};
use crate::repository::{DocumentStore, IdentityProvider, MemoryIdentity, MemoryStore, TodoRepository};
use crate::session::{SessionMirror, SessionState};
use crate::store::TodoStore;

struct App {
    identity: Rc<MemoryIdentity>,
    documents: Rc<MemoryStore>,
    todos: Rc<TodoStore>,
    _mirror: SessionMirror,
}

/// Wire the pieces the way the frontend does: the session mirror scopes the
/// todo store to the signed-in user.
fn app() -> App {
    let identity = Rc::new(MemoryIdentity::new());
    let documents = Rc::new(MemoryStore::new());
    let todos = Rc::new(TodoStore::new(documents.clone()));
    let scoped = Rc::clone(&todos);
    let mirror = SessionMirror::attach(identity.as_ref(), move |session: &SessionState| {
        scoped.set_owner(session.user.as_ref().map(|u| u.uid.clone()));
    });
    App {
        identity,
        documents,
        todos,
        _mirror: mirror,
    }
}

#[tokio::test]
async fn test_register_create_list_and_manage_items() {
    let app = app();
    let register = RegisterFlow::new(app.identity.clone(), app.documents.clone());

    let outcome = register
        .submit(&Registration::new("Alice", "a@b.com", "secret1", "secret1"))
        .await;
    let RegisterOutcome::Registered(user) = outcome else {
        panic!("registration failed: {outcome:?}");
    };
    assert_eq!(app.todos.owner(), Some(user.uid.clone()));

    let profile = app.todos.load_profile().await.unwrap().unwrap();
    assert_eq!((profile.name.as_str(), profile.email.as_str()), ("Alice", "a@b.com"));

    let work = app.todos.create_list("Work").await.unwrap().unwrap();
    let state = app.todos.snapshot();
    assert_eq!(state.active().map(|l| l.name.as_str()), Some("Work"));
    assert!(state.items.is_empty());

    let milk = app.todos.add_item("Buy milk", "2%").await.unwrap().unwrap();
    let state = app.todos.snapshot();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].title, "Buy milk");
    assert!(!state.items[0].completed);

    app.todos.toggle_complete(&milk.id).await.unwrap();
    assert!(app.todos.snapshot().items[0].completed);

    app.todos.delete_item(&milk.id).await.unwrap();
    assert!(app.todos.snapshot().items.is_empty());

    app.todos.delete_list(&work.id).await.unwrap();
    let state = app.todos.snapshot();
    assert!(state.lists.is_empty());
    let leftovers = app
        .documents
        .query_eq("todos", "listId", &work.id.as_str().into())
        .await
        .unwrap();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_deleted_list_items_absent_from_later_fetches() {
    let app = app();
    app.identity.create_account("a@b.com", "secret1").await.unwrap();

    let work = app.todos.create_list("Work").await.unwrap().unwrap();
    for title in ["one", "two", "three"] {
        app.todos.add_item(title, "").await.unwrap();
    }
    let home = app.todos.create_list("Home").await.unwrap().unwrap();
    app.todos.add_item("dishes", "").await.unwrap();

    app.todos.delete_list(&work.id).await.unwrap();
    app.todos.fetch_lists().await.unwrap();

    let state = app.todos.snapshot();
    let names: Vec<_> = state.lists.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["Home"]);
    assert_eq!(state.active_list, Some(home.id.clone()));

    let repo = TodoRepository::new(app.documents.clone());
    assert!(repo.items_for_list(&work.id).await.unwrap().is_empty());
    assert_eq!(repo.items_for_list(&home.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_sign_out_clears_local_state_and_sign_in_reloads() {
    let app = app();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&changes);
    app.todos.observe(move |state| log.borrow_mut().push(state.lists.len()));

    app.identity.create_account("a@b.com", "secret1").await.unwrap();
    app.todos.create_list("Work").await.unwrap();
    assert_eq!(app.todos.snapshot().lists.len(), 1);

    app.identity.sign_out().await.unwrap();
    assert_eq!(app.todos.owner(), None);
    assert!(app.todos.snapshot().lists.is_empty());
    assert_eq!(changes.borrow().last(), Some(&0));

    let login = LoginFlow::new(app.identity.clone());
    assert!(matches!(
        login.submit("a@b.com", "secret1").await,
        LoginOutcome::SignedIn(_)
    ));
    app.todos.fetch_lists().await.unwrap();
    assert_eq!(app.todos.snapshot().lists.len(), 1);
}

#[tokio::test]
async fn test_users_do_not_see_each_others_lists() {
    let app = app();
    app.identity.create_account("a@b.com", "secret1").await.unwrap();
    app.todos.create_list("Alice's").await.unwrap();

    app.identity.create_account("c@d.com", "secret2").await.unwrap();
    app.todos.fetch_lists().await.unwrap();

    let state = app.todos.snapshot();
    assert!(state.lists.is_empty());
    assert!(state.active_list.is_none());
    assert_ne!(app.todos.owner(), Some(UserId::default()));
}
