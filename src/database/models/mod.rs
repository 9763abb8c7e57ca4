pub mod bucketlist;
pub mod item;
pub mod user;

pub use bucketlist::{Bucketlist, BucketlistWithItems};
pub use item::Item;
pub use user::User;
