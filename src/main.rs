use std::rc::Rc;
use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod server;
mod store;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    // One thread serves every connection; store calls never overlap
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let provider = store::BackendProvider::from_config(&cfg.storage);
    provider.initialize(cfg.storage.init_schema)?;

    let listener = server::create_listener(addr, cfg.server.backlog)?;
    logger::log_server_start(&listener.local_addr()?, &cfg);

    let state = Rc::new(config::AppState::new(cfg, Box::new(provider)));
    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(listener, state, signals))
        .await
}
