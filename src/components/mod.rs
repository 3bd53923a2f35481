//! UI Components
//!
//! Pages and the pieces of the todo screen.

mod list_bar;
mod login_page;
mod register_page;
mod todo_page;
mod todo_panel;
mod todo_row;

pub use list_bar::{ListBar, NewListForm};
pub use login_page::LoginPage;
pub use register_page::RegisterPage;
pub use todo_page::TodoPage;
pub use todo_panel::TodoPanel;
pub use todo_row::TodoRow;
