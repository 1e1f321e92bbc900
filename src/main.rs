use stampede::config::Config;
use stampede::driver::LoadDriver;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env();
    let report_path = config.report_path.clone();

    tracing::info!("stampede starting");

    let driver = LoadDriver::new(config);
    let report = driver.run().await;

    tracing::info!(
        total = report.total_requests,
        succeeded = report.success_count,
        failed = report.error_count,
        total_secs = report.total_time.as_secs_f64(),
        "load test completed"
    );

    // Individual request failures are already in the report; only failing to
    // write the artifact itself fails the run.
    report.persist(&report_path).await?;

    tracing::info!("report saved as {}", report_path.display());
    Ok(())
}
