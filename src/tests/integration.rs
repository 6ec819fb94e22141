use crate::{DashboardConfig, DashboardResult, DashboardServices};
use dotenvy::dotenv;

fn setup() -> DashboardResult<DashboardServices> {
    dotenv().ok();
    DashboardServices::new(DashboardConfig::from_env()?)
}

#[tokio::test]
#[ignore = "requires a running dashboard backend and PVE_DASHBOARD_BASE_URL"]
async fn test_integration_health() -> DashboardResult<()> {
    let services = setup()?;
    let health = services.api.health().await?;
    assert!(health.is_healthy(), "backend reported {:?}", health);
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running dashboard backend and PVE_DASHBOARD_BASE_URL"]
async fn test_integration_refresh_nodes() -> DashboardResult<()> {
    let services = setup()?;
    let controller = services.controller();
    let mut events = services.events.subscribe();

    let nodes = controller.refresh_nodes().await?;
    assert_eq!(
        events.try_recv().map(|e| e.name()).ok(),
        Some("nodesLoaded")
    );
    for node in nodes.iter().filter(|n| n.is_online()) {
        controller.show_resources(&node.id).await?;
    }
    Ok(())
}
