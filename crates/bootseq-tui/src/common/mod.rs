mod scrollbar;
mod task;
pub mod text;

pub use scrollbar::Scrollbar;
pub use task::TaskState;
