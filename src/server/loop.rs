// Server loop module
// Accepts connections until shutdown is requested

use std::rc::Rc;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// Run the accept loop on the current `LocalSet`.
///
/// Returns once the signal handler requests shutdown. Connections already
/// being served run to completion on the local set.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    state: Rc<AppState>,
    signals: Arc<SignalHandler>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            _ = signals.shutdown.notified() => {
                logger::log_server_stop();
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::{create_listener, SignalHandler};
    use crate::store::BackendProvider;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn roundtrip(addr: SocketAddr, raw: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw.as_bytes()).await.unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn test_http10_requests_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::load_from(dir.path().join("none").to_str().unwrap()).unwrap();
        cfg.storage.path = dir.path().join("squirrels.db").display().to_string();
        cfg.logging.access_log = false;

        let provider = BackendProvider::from_config(&cfg.storage);
        provider.initialize(true).unwrap();

        let listener = create_listener("127.0.0.1:0".parse().unwrap(), 16).unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Rc::new(AppState::new(cfg, Box::new(provider)));
        let signals = Arc::new(SignalHandler::new());

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let server = tokio::task::spawn_local(start_server_loop(
                    listener,
                    Rc::clone(&state),
                    Arc::clone(&signals),
                ));

                let created = roundtrip(
                    addr,
                    "POST /squirrels HTTP/1.0\r\nContent-Length: 22\r\n\r\nname=Chippy&size=small",
                )
                .await;
                assert!(created.contains(" 201 "), "{created}");

                let listed = roundtrip(addr, "GET /squirrels HTTP/1.0\r\n\r\n").await;
                assert!(listed.contains(" 200 "), "{listed}");
                assert!(listed.contains("content-type: application/json"), "{listed}");
                assert!(listed.ends_with(r#"[{"id":1,"name":"Chippy","size":"small"}]"#));

                let missing = roundtrip(addr, "GET /squirrel HTTP/1.0\r\n\r\n").await;
                assert!(missing.contains(" 404 "), "{missing}");
                assert!(missing.ends_with("404 Not Found"));

                let deleted = roundtrip(addr, "DELETE /squirrels/1 HTTP/1.0\r\n\r\n").await;
                assert!(deleted.contains(" 204 "), "{deleted}");

                signals.request_shutdown();
                server.await.unwrap().unwrap();
            })
            .await;
    }
}
