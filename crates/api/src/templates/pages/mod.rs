mod welcome;

pub use welcome::{welcome_page, AVAILABLE_ROUTES};
