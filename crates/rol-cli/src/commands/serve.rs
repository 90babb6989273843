use rol_core::config::PipelineConfig;
use std::net::SocketAddr;

use crate::server::{self, AppState};

pub async fn run(config: PipelineConfig, bind: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::from_config(config);
    server::serve(bind, state).await
}
