//! The application's page route table
//!
//! Five pages, each reached by one path. Only the record editor takes a
//! parameter, and it receives it as a prop.

use crate::router::{Route, RouteName, Router, RouterConfig, RouterResult, ViewLoader};
use serde::Serialize;
use std::fmt;

/// Pages of the records application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Page {
    Home,
    Records,
    RecordEdit,
    SubjectRecords,
    Students,
}

impl Page {
    /// Every page, in route table order
    pub const ALL: [Page; 5] = [
        Page::Home,
        Page::Records,
        Page::RecordEdit,
        Page::SubjectRecords,
        Page::Students,
    ];

    /// Path pattern the page is mounted at
    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Records => "/records",
            Page::RecordEdit => "/record/:id",
            Page::SubjectRecords => "/subject-records",
            Page::Students => "/students",
        }
    }

    /// Route name of the page
    pub fn route_name(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Records => "records",
            Page::RecordEdit => "record-edit",
            Page::SubjectRecords => "subject-records",
            Page::Students => "students",
        }
    }

    /// Name of the view component rendered for the page
    pub fn component(&self) -> &'static str {
        match self {
            Page::Home => "HomePage",
            Page::Records => "RecordsPage",
            Page::RecordEdit => "RecordEditPage",
            Page::SubjectRecords => "SubjectRecordsPage",
            Page::Students => "StudentsPage",
        }
    }

    /// Whether route params are passed to the view as props
    pub fn forwards_props(&self) -> bool {
        matches!(self, Page::RecordEdit)
    }

    /// Look a page up by route name
    pub fn from_route_name(name: &RouteName) -> Option<Page> {
        Page::ALL
            .into_iter()
            .find(|page| page.route_name() == name.as_str())
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.component())
    }
}

/// Build the route table, asking `views` for each page's deferred view
///
/// `views` is called once per page while building the table; the loaders it
/// returns decide what actually gets loaded on first visit.
pub fn app_route_config<V, F>(base: &str, mut views: F) -> RouterConfig<V>
where
    F: FnMut(Page) -> ViewLoader<V>,
{
    Page::ALL
        .into_iter()
        .fold(RouterConfig::new().with_base(base), |config, page| {
            let route = Route::new(page.path(), page.route_name(), views(page))
                .with_description(page.component());
            let route = if page.forwards_props() {
                route.with_props()
            } else {
                route
            };
            config.add_route(route)
        })
}

/// Router over the route table whose views are the [`Page`] references
pub fn app_router(base: &str) -> RouterResult<Router<Page>> {
    Router::new(app_route_config(base, |page| {
        ViewLoader::new(move || async move { Ok(page) })
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, RouterError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_table_declares_five_routes() {
        let router = app_router("/").unwrap();
        let declared: Vec<(&str, &str, bool)> = router
            .config()
            .routes()
            .iter()
            .map(|route| (route.pattern.as_str(), route.name.as_str(), route.props))
            .collect();

        assert_eq!(
            declared,
            vec![
                ("/", "home", false),
                ("/records", "records", false),
                ("/record/:id", "record-edit", true),
                ("/subject-records", "subject-records", false),
                ("/students", "students", false),
            ]
        );
    }

    #[tokio::test]
    async fn test_record_editor_gets_id_prop() {
        let mut router = app_router("/").unwrap();
        let nav = router.navigate("/record/42").await.unwrap();

        assert_eq!(nav.matched.name.as_str(), "record-edit");
        assert_eq!(*nav.view, Page::RecordEdit);
        assert_eq!(nav.matched.props.get("id").map(String::as_str), Some("42"));
    }

    #[tokio::test]
    async fn test_other_pages_get_no_props() {
        let mut router = app_router("/").unwrap();
        for page in [Page::Home, Page::Records, Page::SubjectRecords, Page::Students] {
            let nav = router.navigate(page.path()).await.unwrap();
            assert_eq!(*nav.view, page);
            assert!(nav.matched.props.is_empty());
            assert_eq!(Page::from_route_name(&nav.matched.name), Some(page));
        }
    }

    #[tokio::test]
    async fn test_undeclared_paths_do_not_match() {
        let mut router = app_router("/").unwrap();
        for location in ["/record", "/records/42", "/teachers", "/record/42/edit", "/subject"] {
            assert!(router.resolve(location).is_none(), "{location} matched");
        }
        let err = router.navigate("/teachers").await.unwrap_err();
        assert!(matches!(err, Error::Router(RouterError::RouteNotFound(_))));
    }

    #[tokio::test]
    async fn test_views_load_only_when_visited() {
        let loads = Arc::new(AtomicUsize::new(0));
        let config = app_route_config("/school/", |page| {
            let loads = Arc::clone(&loads);
            ViewLoader::new(move || {
                loads.fetch_add(1, Ordering::SeqCst);
                async move { Ok(page.component()) }
            })
        });
        let mut router = Router::new(config).unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 0);

        let nav = router.navigate("/school/students").await.unwrap();
        assert_eq!(*nav.view, "StudentsPage");
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        router.navigate("/school/").await.unwrap();
        router.navigate("/school/students").await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);

        let loaded: Vec<&str> = router
            .config()
            .routes()
            .iter()
            .filter(|route| route.view.is_loaded())
            .map(|route| route.name.as_str())
            .collect();
        assert_eq!(loaded, vec!["home", "students"]);
    }
}
