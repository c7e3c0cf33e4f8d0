pub mod layouts;
pub mod pages;

pub use pages::welcome_page;
