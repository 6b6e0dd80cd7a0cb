// Public handlers: no authentication required
pub mod comments;
pub mod system;
