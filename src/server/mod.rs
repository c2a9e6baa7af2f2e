// Server module entry point
// Binds the listener, runs the accept loop, handles shutdown signals

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as server_loop
#[path = "loop.rs"]
pub mod server_loop;

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::config::{AppState, Config};
use crate::logger;

pub use listener::create_listener;
pub use server_loop::start_server_loop;
pub use signal::shutdown_signal;

/// A bound asset server; accepting starts with [`Server::run`]
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Bind the configured address. Failure here is fatal for the caller.
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind(config: &Config) -> io::Result<Self> {
        let addr = config
            .get_socket_addr()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let listener = create_listener(addr)?;

        Ok(Self {
            listener,
            state: Arc::new(AppState::new(config)),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until `shutdown` resolves, then drain in-flight connections
    pub async fn run<S>(self, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        let drain_timeout = Duration::from_secs(self.state.config.performance.shutdown_timeout);

        start_server_loop(
            self.listener,
            Arc::clone(&self.state),
            Arc::new(AtomicUsize::new(0)),
            drain_timeout,
            shutdown,
        )
        .await;

        logger::log_server_stop();
    }
}
