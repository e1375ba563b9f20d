use shotbox_core::ServerConfig;

// Use mimalloc as the global allocator for better performance and lower fragmentation,
// especially when running on musl-based systems inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = ServerConfig::from_env()?;

    // Storage root, validator and routes
    let (_state, router) = shotbox_api::setup::initialize_app(config.clone()).await?;

    shotbox_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
