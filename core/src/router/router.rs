//! Router implementation for resolving locations and tracking navigation
//!
//! Routes are tried in declaration order and the first match wins. Locations
//! are browser-style paths under a base path; query and fragment are ignored
//! for matching.

use super::route::{Route, RouteName, RouteParams};
use crate::error::{Error, Result, RouterError};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Type alias for router construction results
pub type RouterResult<T> = std::result::Result<T, RouterError>;

/// Props handed to a view, keyed by parameter name
pub type RouteProps = RouteParams;

/// Result of matching a location against the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Name of the matched route
    pub name: RouteName,
    /// Location path with base, query and fragment removed
    pub path: String,
    /// Parameters bound from dynamic segments
    pub params: RouteParams,
    /// Props for the view; empty unless the route forwards params
    pub props: RouteProps,
}

/// A completed navigation: the match plus its loaded view
#[derive(Debug)]
pub struct Navigation<V> {
    pub matched: RouteMatch,
    pub view: Arc<V>,
}

/// Current state of the router
#[derive(Debug, Clone)]
pub struct RouterState {
    /// Currently active route, if any navigation has happened
    pub current: Option<RouteMatch>,
    /// Navigation history as paths (most recent first)
    pub history: Vec<String>,
    /// Maximum number of history entries to keep
    pub max_history: usize,
}

impl RouterState {
    /// Create an empty router state
    pub fn new(max_history: usize) -> Self {
        Self {
            current: None,
            history: Vec::new(),
            max_history,
        }
    }

    /// Make `matched` current, remembering the previous location
    pub fn navigate_to(&mut self, matched: RouteMatch) {
        if let Some(previous) = self.current.take() {
            if previous.path != matched.path && self.max_history > 0 {
                self.history.insert(0, previous.path);
                self.history.truncate(self.max_history);
            }
        }
        self.current = Some(matched);
    }

    /// Take the most recent history entry
    pub fn pop_history(&mut self) -> Option<String> {
        if self.history.is_empty() {
            None
        } else {
            Some(self.history.remove(0))
        }
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Get the navigation history
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

/// Configuration for the router
#[derive(Debug)]
pub struct RouterConfig<V> {
    /// Routes in match order
    pub routes: Vec<Route<V>>,
    /// Base path locations are rooted at, normalized without trailing `/`
    pub base: String,
    /// Whether to enable navigation history
    pub enable_history: bool,
    /// Maximum number of history entries
    pub max_history: usize,
}

impl<V> RouterConfig<V> {
    /// Create a new router configuration rooted at `/`
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            base: String::new(),
            enable_history: true,
            max_history: 50,
        }
    }

    /// Append a route; earlier routes win on overlapping patterns
    pub fn add_route(mut self, route: Route<V>) -> Self {
        self.routes.push(route);
        self
    }

    /// Root all locations at `base`, e.g. `/app/`
    pub fn with_base(mut self, base: &str) -> Self {
        self.base = normalize_base(base);
        self
    }

    /// Disable navigation history
    pub fn without_history(mut self) -> Self {
        self.enable_history = false;
        self
    }

    /// Set maximum history size
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    /// Get a route by name
    pub fn get_route(&self, name: &str) -> Option<&Route<V>> {
        self.routes.iter().find(|route| route.name.as_str() == name)
    }

    /// Get all routes
    pub fn routes(&self) -> &[Route<V>] {
        &self.routes
    }
}

impl<V> Default for RouterConfig<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Main router struct that resolves locations and manages navigation state
#[derive(Debug)]
pub struct Router<V> {
    /// Router configuration
    config: RouterConfig<V>,
    /// Current router state
    state: RouterState,
}

impl<V: Send + Sync + 'static> Router<V> {
    /// Create a new router with the given configuration
    pub fn new(config: RouterConfig<V>) -> RouterResult<Self> {
        if config.routes.is_empty() {
            return Err(RouterError::NoRoutes);
        }

        let mut seen = HashSet::new();
        for route in &config.routes {
            if !seen.insert(route.name.as_str()) {
                return Err(RouterError::DuplicateRoute(route.name.0.clone()));
            }
        }

        let max_history = if config.enable_history {
            config.max_history
        } else {
            0
        };

        Ok(Self {
            state: RouterState::new(max_history),
            config,
        })
    }

    /// Get the current router state
    pub fn state(&self) -> &RouterState {
        &self.state
    }

    /// Get the router configuration
    pub fn config(&self) -> &RouterConfig<V> {
        &self.config
    }

    /// Match a location without navigating or loading anything
    pub fn resolve(&self, location: &str) -> Option<RouteMatch> {
        let path = self.strip_base(strip_query_and_fragment(location));

        self.config.routes.iter().find_map(|route| {
            route.pattern.matches(path).map(|params| RouteMatch {
                name: route.name.clone(),
                path: path.to_string(),
                props: if route.props {
                    params.clone()
                } else {
                    RouteProps::new()
                },
                params,
            })
        })
    }

    /// Navigate to a location, loading its view on first visit
    pub async fn navigate(&mut self, location: &str) -> Result<Navigation<V>> {
        self.visit(location, true).await
    }

    /// Navigate to a named route, filling its pattern with `params`
    pub async fn navigate_named(
        &mut self,
        name: &str,
        params: &RouteParams,
    ) -> Result<Navigation<V>> {
        let path = self.path_for(name, params)?;
        self.visit(&path, true).await
    }

    /// Go back to the previous location
    ///
    /// Returns `Ok(None)` when there is nothing to go back to.
    pub async fn go_back(&mut self) -> Result<Option<Navigation<V>>> {
        match self.state.pop_history() {
            Some(path) => self.visit(&path, false).await.map(Some),
            None => Ok(None),
        }
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        self.config.enable_history && self.state.can_go_back()
    }

    /// Get the current route match
    pub fn current_route(&self) -> Option<&RouteMatch> {
        self.state.current.as_ref()
    }

    /// Build the concrete path for a named route
    pub fn path_for(&self, name: &str, params: &RouteParams) -> RouterResult<String> {
        let route = self
            .config
            .get_route(name)
            .ok_or_else(|| RouterError::RouteNotFound(name.to_string()))?;

        route
            .pattern
            .build(params)
            .map_err(|param| RouterError::MissingParam {
                route: name.to_string(),
                param,
            })
    }

    /// Prefix a route path with the base, for rendering links
    pub fn href(&self, path: &str) -> String {
        if self.config.base.is_empty() {
            path.to_string()
        } else if path == "/" {
            format!("{}/", self.config.base)
        } else {
            format!("{}{}", self.config.base, path)
        }
    }

    async fn visit(&mut self, location: &str, remember: bool) -> Result<Navigation<V>> {
        let matched = self
            .resolve(location)
            .ok_or_else(|| RouterError::RouteNotFound(location.to_string()))?;

        let route = self
            .config
            .get_route(matched.name.as_str())
            .ok_or_else(|| RouterError::RouteNotFound(matched.name.0.clone()))?;

        let first_visit = !route.view.is_loaded();
        let view = route.view.load().await.map_err(|e| Error::ViewLoad {
            route: matched.name.0.clone(),
            message: e.to_string(),
        })?;
        debug!(route = %matched.name, path = %matched.path, first_visit, "navigated");

        if remember {
            self.state.navigate_to(matched.clone());
        } else {
            self.state.current = Some(matched.clone());
        }

        Ok(Navigation { matched, view })
    }

    fn strip_base<'a>(&self, path: &'a str) -> &'a str {
        let base = self.config.base.as_str();
        if base.is_empty() {
            return path;
        }

        // Same ASCII case folding as static segments
        let rest = match path.get(..base.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(base) => &path[base.len()..],
            _ => return path,
        };
        match rest {
            "" => "/",
            rest if rest.starts_with('/') => rest,
            _ => path,
        }
    }
}

fn strip_query_and_fragment(location: &str) -> &str {
    location
        .find(['?', '#'])
        .map_or(location, |end| &location[..end])
}

fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::ViewLoader;

    fn page(name: &'static str) -> ViewLoader<&'static str> {
        ViewLoader::new(move || async move { Ok(name) })
    }

    fn config() -> RouterConfig<&'static str> {
        RouterConfig::new()
            .add_route(Route::new("/", "home", page("Home")))
            .add_route(Route::new("/items/new", "item-new", page("ItemNew")))
            .add_route(Route::new("/items/:id", "item", page("Item")).with_props())
            .add_route(Route::new("/tags/:tag", "tag", page("Tag")))
    }

    #[test]
    fn test_router_rejects_bad_tables() {
        let empty: RouterConfig<&'static str> = RouterConfig::new();
        assert_eq!(Router::new(empty).unwrap_err(), RouterError::NoRoutes);

        let duplicated = config().add_route(Route::new("/other", "home", page("Other")));
        assert_eq!(
            Router::new(duplicated).unwrap_err(),
            RouterError::DuplicateRoute("home".to_string())
        );
    }

    #[test]
    fn test_first_match_wins_and_props_follow_flag() {
        let router = Router::new(config()).unwrap();

        let matched = router.resolve("/items/new").unwrap();
        assert_eq!(matched.name.as_str(), "item-new");

        let matched = router.resolve("/items/9?tab=notes#top").unwrap();
        assert_eq!(matched.name.as_str(), "item");
        assert_eq!(matched.path, "/items/9");
        assert_eq!(matched.params.get("id").map(String::as_str), Some("9"));
        assert_eq!(matched.props, matched.params);

        let matched = router.resolve("/tags/math").unwrap();
        assert_eq!(matched.params.get("tag").map(String::as_str), Some("math"));
        assert!(matched.props.is_empty());

        assert!(router.resolve("/nowhere").is_none());
    }

    #[test]
    fn test_base_path_is_stripped() {
        let router = Router::new(config().with_base("/app/")).unwrap();
        assert_eq!(router.config().base, "/app");

        assert_eq!(router.resolve("/app").unwrap().name.as_str(), "home");
        assert_eq!(router.resolve("/app/").unwrap().name.as_str(), "home");
        assert_eq!(router.resolve("/app/items/3").unwrap().path, "/items/3");
        assert!(router.resolve("/application/items/3").is_none());
        assert_eq!(router.resolve("/APP/items/3").unwrap().path, "/items/3");
        assert_eq!(router.resolve("/App").unwrap().name.as_str(), "home");

        assert_eq!(router.href("/items/3"), "/app/items/3");
        assert_eq!(router.href("/"), "/app/");
    }

    #[tokio::test]
    async fn test_navigation_history() {
        let mut router = Router::new(config()).unwrap();
        assert!(router.current_route().is_none());

        let nav = router.navigate("/").await.unwrap();
        assert_eq!(*nav.view, "Home");
        assert!(!router.can_go_back());

        let nav = router.navigate("/items/5").await.unwrap();
        assert_eq!(*nav.view, "Item");
        router.navigate("/items/5").await.unwrap();
        assert_eq!(router.state().history(), &["/".to_string()]);

        let back = router.go_back().await.unwrap().unwrap();
        assert_eq!(back.matched.name.as_str(), "home");
        assert_eq!(router.current_route().unwrap().path, "/");
        assert!(!router.can_go_back());
        assert!(router.go_back().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_history_limits() {
        let mut router = Router::new(config().with_max_history(2)).unwrap();
        for location in ["/", "/items/1", "/items/2", "/items/3"] {
            router.navigate(location).await.unwrap();
        }
        assert_eq!(
            router.state().history(),
            &["/items/2".to_string(), "/items/1".to_string()]
        );

        let mut router = Router::new(config().without_history()).unwrap();
        router.navigate("/").await.unwrap();
        router.navigate("/items/1").await.unwrap();
        assert!(!router.can_go_back());
        assert!(router.go_back().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_location_leaves_state_alone() {
        let mut router = Router::new(config()).unwrap();
        router.navigate("/items/1").await.unwrap();

        let err = router.navigate("/missing").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Router(RouterError::RouteNotFound(ref path)) if path == "/missing"
        ));
        assert_eq!(router.current_route().unwrap().path, "/items/1");
    }

    #[tokio::test]
    async fn test_navigate_named() {
        let mut router = Router::new(config()).unwrap();

        let mut params = RouteParams::new();
        params.insert("id".to_string(), "12".to_string());
        let nav = router.navigate_named("item", &params).await.unwrap();
        assert_eq!(nav.matched.path, "/items/12");
        assert_eq!(nav.matched.props.get("id").map(String::as_str), Some("12"));

        let err = router
            .navigate_named("item", &RouteParams::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Router(RouterError::MissingParam { .. })
        ));

        let err = router.path_for("ghost", &params).unwrap_err();
        assert_eq!(err, RouterError::RouteNotFound("ghost".to_string()));
    }

    #[tokio::test]
    async fn test_view_failure_aborts_navigation() {
        let failing: ViewLoader<&'static str> = ViewLoader::new(|| async {
            Err(Error::Status {
                status: 500,
                body: "boom".to_string(),
            })
        });
        let config = config().add_route(Route::new("/broken", "broken", failing));
        let mut router = Router::new(config).unwrap();
        router.navigate("/").await.unwrap();

        let err = router.navigate("/broken").await.unwrap_err();
        match err {
            Error::ViewLoad { route, message } => {
                assert_eq!(route, "broken");
                assert!(message.contains("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(router.current_route().unwrap().name.as_str(), "home");
        assert!(!router.can_go_back());
    }
}
