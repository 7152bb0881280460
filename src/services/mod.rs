//! List tools and their storage
//! 
//! The task list and shopping list persist themselves through a
//! `KeyValueStore`; the pomodoro timer never touches storage.

pub mod grocery_list;
pub mod storage;
pub mod todo_list;

// Re-export main types
pub use grocery_list::{GroceryItem, GroceryList, GrocerySnapshot};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use todo_list::{TodoFilter, TodoItem, TodoList, TodoSnapshot};
