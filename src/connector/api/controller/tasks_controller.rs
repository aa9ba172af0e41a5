use crate::domain::TaskLabel;

pub struct TasksController;

impl TasksController {
    pub fn new() -> Self {
        Self
    }

    pub fn list(&self) -> String {
        let mut output = String::from("Available tasks:\n\n");
        for label in TaskLabel::ALL {
            output.push_str(&format!("  {:<22} (--task {})\n", label.as_str(), label.slug()));
        }
        output.push_str("\nWithout --task the request is routed by keywords (user story, email, general).");
        output
    }
}

impl Default for TasksController {
    fn default() -> Self {
        Self::new()
    }
}
