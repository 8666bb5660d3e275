//! TCP debug server

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::Mutex;

use crate::protocol::{DebugCommand, DebugResponse};

/// Trait that the application implements to handle debug commands
pub trait DebugHandler: Send + Sync + 'static {
    fn handle_command(&mut self, cmd: DebugCommand) -> DebugResponse;
}

/// Debug server handle - the server stops when this is dropped
pub struct DebugServer {
    local_addr: SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl DebugServer {
    /// Bind the debug server and start accepting clients in the background.
    /// The handler is called for each incoming command. Port 0 picks a free port.
    pub async fn bind(handler: Arc<Mutex<dyn DebugHandler>>, addr: impl ToSocketAddrs) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        log::info!("Debug server listening on {}", local_addr);

        let handle = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, peer)) => {
                        log::info!("Debug client connected from {}", peer);
                        let handler = handler.clone();
                        tokio::spawn(async move {
                            handle_connection(stream, handler).await;
                            log::info!("Debug client disconnected: {}", peer);
                        });
                    }
                    Err(e) => {
                        log::error!("Debug server accept error: {}", e);
                    }
                }
            }
        });

        Ok(Self { local_addr, handle })
    }

    /// Address the server is listening on
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Drop for DebugServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_connection(
    stream: tokio::net::TcpStream,
    handler: Arc<Mutex<dyn DebugHandler>>,
) {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => break, // Connection closed
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let response = match serde_json::from_str::<DebugCommand>(trimmed) {
                    Ok(cmd) => {
                        log::debug!("Debug command: {:?}", cmd);
                        let mut h = handler.lock().await;
                        h.handle_command(cmd)
                    }
                    Err(e) => DebugResponse::error(format!("Invalid command JSON: {}", e)),
                };

                let mut resp_json =
                    serde_json::to_string(&response).unwrap_or_else(|e| {
                        format!(
                            "{{\"status\":\"error\",\"message\":\"Serialize error: {}\"}}",
                            e
                        )
                    });
                resp_json.push('\n');

                if let Err(e) = writer.write_all(resp_json.as_bytes()).await {
                    log::error!("Debug server write error: {}", e);
                    break;
                }
                if let Err(e) = writer.flush().await {
                    log::error!("Debug server flush error: {}", e);
                    break;
                }
            }
            Err(e) => {
                log::error!("Debug server read error: {}", e);
                break;
            }
        }
    }
}
