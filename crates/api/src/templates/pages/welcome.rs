use maud::{html, Markup};

use crate::templates::layouts::{base, PageConfig};

/// Routes advertised on the landing page, placeholders spelled out.
pub const AVAILABLE_ROUTES: &[&str] = &[
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/start_date",
    "/api/v1.0/start_date/end_date",
];

pub fn welcome_page(api_base: &str) -> Markup {
    let config = PageConfig {
        title: "Climate API",
        api_base,
    };

    base(&config, content())
}

fn content() -> Markup {
    html! {
        "Available Routes:"
        br;
        @for route in AVAILABLE_ROUTES {
            (route)
            br;
        }
    }
}
