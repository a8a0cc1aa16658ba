//! Route table commands

use anyhow::Result;
use gradebook_core::router::RouteParams;
use gradebook_core::{app_router, Page};
use tracing::info;

use crate::config::CliConfigLoader;

fn format_params(params: &RouteParams) -> String {
    if params.is_empty() {
        return "-".to_string();
    }
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve a location against the page route table
pub async fn route_command(location: String, config_loader: CliConfigLoader) -> Result<()> {
    let config = config_loader.load().await?;
    info!("Resolving {} under base {}", location, config.app_base);

    let mut router = app_router(&config.app_base)?;
    let navigation = router.navigate(&location).await?;
    let page: Page = *navigation.view;

    println!("route:     {}", navigation.matched.name);
    println!("path:      {}", navigation.matched.path);
    println!("component: {}", page.component());
    println!("params:    {}", format_params(&navigation.matched.params));
    println!("props:     {}", format_params(&navigation.matched.props));

    Ok(())
}

/// List the page route table
pub async fn routes_command(config_loader: CliConfigLoader) -> Result<()> {
    let config = config_loader.load().await?;
    let router = app_router(&config.app_base)?;

    for page in Page::ALL {
        let props = if page.forwards_props() { "props" } else { "" };
        println!(
            "{:<22} {:<16} {:<20} {}",
            router.href(page.path()),
            page.route_name(),
            page.component(),
            props
        );
    }

    Ok(())
}
