pub mod orchestration;

pub use orchestration::{run_push_workflow, PushWorkflowArgs, WorkflowResult};
