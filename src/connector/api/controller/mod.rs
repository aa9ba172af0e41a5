pub mod ask_controller;
pub mod chat_controller;
mod progress;
pub mod tasks_controller;

pub use ask_controller::AskController;
pub use chat_controller::{ChatCommand, ChatController};
pub use tasks_controller::TasksController;
