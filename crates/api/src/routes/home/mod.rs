mod index;

pub use index::welcome_handler;
