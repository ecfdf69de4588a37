pub mod event;
pub mod pairing;
pub mod todo;

pub use event::*;
pub use pairing::*;
pub use todo::*;
