//! Data models: full database rows and their client-safe projections.

mod note;
mod tag;
mod task;
mod user;

pub use note::{Note, NoteInfo};
pub use tag::{Tag, TagInfo};
pub use task::{Task, TaskInfo};
pub use user::{User, UserInfo};
