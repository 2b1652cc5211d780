mod modules;

use anyhow::Context;
use taskshelf_kernel::settings::{LogFormat, Settings};
use taskshelf_kernel::{InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load taskshelf settings")?;

    let format = match settings.telemetry.log_format {
        LogFormat::Pretty => taskshelf_telemetry::Format::Pretty,
        LogFormat::Json => taskshelf_telemetry::Format::Json,
    };
    taskshelf_telemetry::init(format, settings.telemetry.filter.as_deref())?;

    tracing::info!(
        env = ?settings.environment,
        "taskshelf bootstrap starting"
    );

    // A reachable store is a hard startup requirement.
    let db = taskshelf_db::connect(&settings.database.connect_options())
        .await
        .with_context(|| "failed to connect to the document store")?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &db);

    let ctx = InitCtx {
        settings: &settings,
        db: &db,
    };
    registry.init_all(&ctx).await?;
    registry.apply_migrations(&db).await?;
    registry.start_all(&ctx).await?;

    tracing::info!("taskshelf bootstrap complete");

    taskshelf_http::start_server(&registry, &settings).await?;

    registry.stop_all().await?;
    Ok(())
}
