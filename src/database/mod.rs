pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryCommentRepository;
pub use models::{Comment, NewComment};
pub use postgres::PgCommentRepository;
pub use repository::{CommentRepository, SharedRepository};
