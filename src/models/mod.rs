pub mod task;

pub use task::{Task, TaskCreate, TaskUpdate};
