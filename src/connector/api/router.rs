use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, ChatController, TasksController};

pub struct Router<'a> {
    ask_controller: AskController<'a>,
    chat_controller: ChatController<'a>,
    tasks_controller: TasksController,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            ask_controller: AskController::new(container),
            chat_controller: ChatController::new(container),
            tasks_controller: TasksController::new(),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Ask {
                text,
                task,
                export_text,
                export_docx,
            } => {
                self.ask_controller
                    .ask(text, task, export_text, export_docx)
                    .await
            }
            Commands::Chat { task } => self.chat_controller.run(task).await,
            Commands::Tasks => Ok(self.tasks_controller.list()),
        }
    }
}
