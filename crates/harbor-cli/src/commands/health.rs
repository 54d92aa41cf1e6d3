use harbor_core::{HealthState, Service};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct ServiceHealth {
    service: Service,
    url: String,
    alive: bool,
}

#[derive(Serialize)]
struct HealthResponse {
    state: HealthState,
    available: bool,
    can_authenticate: bool,
    services: Vec<ServiceHealth>,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let health = ctx.session.probe_health().await;
    let services = Service::ALL
        .into_iter()
        .map(|service| ServiceHealth {
            service,
            url: ctx.api.probe_url(service),
            alive: health.is_alive(service),
        })
        .collect();

    output(
        &HealthResponse {
            state: health.state(),
            available: health.is_available(),
            can_authenticate: health.can_authenticate(),
            services,
        },
        flags.format,
    )
}
