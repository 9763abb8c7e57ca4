pub mod user;
pub mod whoami;

pub use user::user_delete;
pub use whoami::whoami_get;
