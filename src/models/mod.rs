pub mod boundary;
pub mod entity;
pub mod protocol;
pub mod roster;
pub mod segment;

pub use boundary::*;
pub use entity::*;
pub use protocol::*;
pub use roster::*;
pub use segment::*;
