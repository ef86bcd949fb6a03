//! Full-page shell around a view fragment.

use askama::Template;

use crate::view::{nav, NavLink, Route};

#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub title: &'static str,
    pub route: &'static str,
    pub nav: Vec<NavLink>,
    /// Pre-escaped view fragment.
    pub body: String,
    /// Fragment refresh period; zero disables refreshing.
    pub refresh_ms: u64,
    pub version: &'static str,
}

impl PageTemplate {
    pub fn new(route: Route, body: String, refresh_ms: u64) -> Self {
        Self {
            title: route.title(),
            route: route.name(),
            nav: nav(route),
            body,
            refresh_ms: if route.is_live() { refresh_ms } else { 0 },
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_wraps_fragment() {
        let body = "<table id=\"incTable\"></table>".to_string();
        let html = PageTemplate::new(Route::Incidents, body, 3000)
            .render()
            .unwrap();
        assert!(html.contains("<table id=\"incTable\"></table>"));
        assert!(html.contains(r#"class="nav-link active" href="/incidents""#));
        assert!(html.contains("/fragments/incidents"));
    }

    #[test]
    fn test_row_clicks_go_through_toggle_route() {
        let html = PageTemplate::new(Route::Dashboard, String::new(), 3000)
            .render()
            .unwrap();
        let toggle = r#"fetch("/fragments/dashboard/rows/" + row.dataset.row + "/toggle""#;
        assert!(html.contains(toggle));
        assert_eq!(html.matches("addEventListener(\"click\"").count(), 1);
    }

    #[test]
    fn test_about_page_does_not_refresh() {
        let page = PageTemplate::new(Route::About, String::new(), 3000);
        assert_eq!(page.refresh_ms, 0);
        assert!(!page.render().unwrap().contains("setInterval"));
    }
}
