mod post;
mod taxonomy;
mod user;

pub use post::*;
pub use taxonomy::*;
pub use user::*;
