use anyhow::Result;
use healthspend::{
    chart::{Presenter, SvgPresenter},
    config::Config,
    fetch::{HttpFetcher, SnapshotFetcher},
    pipeline::{self, Outputs},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,healthspend=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configure output ─────────────────────────────────────────
    let config = Config::from_env();
    let outputs = Outputs::new(&config.out_dir);
    let presenter = if config.skip_charts {
        None
    } else {
        Some(pipeline::log_failure(SvgPresenter::new(config.charts_dir()))?)
    };
    let presenter = presenter.as_ref().map(|p| p as &dyn Presenter);
    let origin = pipeline::origin_label(config.snapshot_dir.as_deref());

    // ─── 3) run against the live pages or a saved snapshot ───────────
    let result = match &config.snapshot_dir {
        Some(dir) => {
            info!("replaying snapshot {}", dir.display());
            pipeline::run(&SnapshotFetcher::new(dir), presenter, &outputs, &origin).await
        }
        None => match HttpFetcher::new(&config.user_agent) {
            Ok(fetcher) => pipeline::run(&fetcher, presenter, &outputs, &origin).await,
            Err(e) => Err(e),
        },
    };
    let summary = pipeline::log_failure(result)?;

    info!(
        countries = summary.final_rows,
        excluded = summary.excluded.len(),
        "all done → {}",
        outputs.dir.display()
    );
    Ok(())
}
