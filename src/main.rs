use anyhow::Result;
use netexporter::*;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!(
        procfs = %app_config.paths.procfs,
        rootfs = %app_config.paths.rootfs,
        "starting {}",
        version::banner()
    );

    let host_repo = Arc::new(host_repo::HostRepo::new(host_repo::HostPaths::from_config(
        &app_config.paths,
    )));

    let docker_repo = match docker_repo::DockerRepo::connect(
        &app_config.docker.socket,
        app_config.docker.timeout_secs,
    ) {
        Ok(repo) => repo,
        Err(e) => {
            tracing::warn!(error = %e, socket = %app_config.docker.socket, "docker client unavailable, container labels disabled");
            docker_repo::DockerRepo::unavailable()
        }
    };

    let chroot = app_config
        .paths
        .is_chrooted()
        .then(|| std::path::PathBuf::from(&app_config.paths.rootfs));
    let vm_repo = vm_repo::VmRepo::new(vm_repo::CommandRunner::new(
        chroot,
        Duration::from_secs(app_config.commands.timeout_secs),
    ));

    let resolver = Arc::new(resolver::TopologyResolver::new(
        host_repo,
        Arc::new(docker_repo),
        Arc::new(vm_repo),
    ));

    let app = routes::app(resolver, app_config.clone());
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        "Listening on http://{}{}",
        addr,
        app_config.server.metrics_path
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Received shutdown signal");

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
