use asset_server::config::{self, Config};
use asset_server::logger;
use asset_server::server::{self, Server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional config file path (without extension)
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;

    logger::init(&cfg)?;

    // Create Tokio runtime, worker count from config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let server = match Server::bind(&cfg) {
        Ok(s) => s,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to bind {}:{}: {e}",
                cfg.server.host, cfg.server.port
            ));
            return Err(e.into());
        }
    };

    let addr = server.local_addr()?;
    logger::log_server_start(&addr, &cfg);

    if !cfg.static_root().is_dir() {
        logger::log_warning(&format!(
            "Static root '{}' is not a directory; every request will return 404",
            cfg.static_files.root
        ));
    }

    server.run(server::shutdown_signal()).await;
    Ok(())
}
