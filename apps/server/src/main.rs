use anyhow::Context;
use cwatch::domain::config::ApiConfig;
use cwatch::domain::constants::CONFIG_FILE;
use cwatch::kernel::config::load_config;
use cwatch_profiler::CpuProfiler;
use cwatch_server::{Server, init_logger};
use tracing::info;

#[cwatch_runtime::main(single_threaded)]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig =
        load_config(Some(CONFIG_FILE)).context("Critical: Configuration is malformed")?;

    let _log = init_logger(&cfg.logging)?;

    info!(
        port = cfg.server.port,
        records = cfg.dataset.size,
        profiler = cfg.profiler.enabled,
        "Configuration loaded"
    );

    let profiler = if cfg.profiler.enabled {
        let profiler = CpuProfiler::builder()
            .config(&cfg.profiler)
            .start()
            .context("Failed to start CPU profiler")?;
        Some(profiler)
    } else {
        None
    };

    Server::builder().config(cfg).build()?.run().await?;

    if let Some(profiler) = profiler {
        let path = profiler.stop().context("Failed to save CPU profile")?;
        info!("CPU profile saved to {}", path.display());
    }

    Ok(())
}
