//! HTTP server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpSocket};
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

use crate::parser::{HttpRequest, Method};
use crate::router::{RouteConfig, RouteTable};
use crate::server::config::ServerConfig;
use crate::server::connection::{handle_connection, Shared};
use crate::server::error::Error;
use crate::server::files::{FileSource, LocalFiles};
use crate::server::handler::{Handler, HandlerFuture};
use crate::server::logging::LogSink;
use crate::server::response::Response;

/// An HTTP server under construction.
///
/// Routes are registered here; [`HttpServer::start`] consumes the server, so
/// the route table cannot change once connections are being accepted.
pub struct HttpServer {
    /// The server configuration.
    pub config: ServerConfig,
    routes: RouteTable,
    logger: LogSink,
    files: Arc<dyn FileSource>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            routes: RouteTable::new(),
            logger: LogSink::global(),
            files: Arc::new(LocalFiles),
        }
    }

    /// Log through `logger` instead of the global `log` logger.
    pub fn with_logger(mut self, logger: LogSink) -> Self {
        self.logger = logger;
        self
    }

    /// Serve `send_file` from `files` instead of the local filesystem.
    pub fn with_file_source(mut self, files: impl FileSource + 'static) -> Self {
        self.files = Arc::new(files);
        self
    }

    /// The routes registered so far.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Add a route with the default [`RouteConfig`].
    pub fn add_route<F>(&mut self, method: Method, pattern: &str, handler: F) -> Result<(), Error>
    where
        F: for<'a> Fn(&'a mut HttpRequest, &'a mut Response, Vec<String>) -> HandlerFuture<'a>
            + Send
            + Sync
            + 'static,
    {
        self.add_route_with_config(method, pattern, RouteConfig::default(), handler)
    }

    /// Add a route. Earlier routes win over later ones that also match.
    pub fn add_route_with_config<F>(
        &mut self,
        method: Method,
        pattern: &str,
        config: RouteConfig,
        handler: F,
    ) -> Result<(), Error>
    where
        F: for<'a> Fn(&'a mut HttpRequest, &'a mut Response, Vec<String>) -> HandlerFuture<'a>
            + Send
            + Sync
            + 'static,
    {
        self.add_handler(method, pattern, config, handler)
    }

    /// Add a route served by any [`Handler`] implementation.
    pub fn add_handler(
        &mut self,
        method: Method,
        pattern: &str,
        config: RouteConfig,
        handler: impl Handler,
    ) -> Result<(), Error> {
        self.routes.add(method, pattern, config, Arc::new(handler))?;
        Ok(())
    }

    /// Handle every request no route claims, in place of 404 and 405.
    pub fn set_catch_all<F>(&mut self, handler: F)
    where
        F: for<'a> Fn(&'a mut HttpRequest, &'a mut Response, Vec<String>) -> HandlerFuture<'a>
            + Send
            + Sync
            + 'static,
    {
        self.routes.set_catch_all(Arc::new(handler), RouteConfig::default());
    }

    pub(crate) fn into_shared(self) -> Arc<Shared> {
        Arc::new(Shared {
            config: self.config,
            routes: self.routes,
            logger: self.logger,
            files: self.files,
        })
    }

    /// Log the registered endpoints.
    fn display_server_info(&self) {
        let logger = &self.logger;
        logger.info(format_args!("Registered endpoints:"));
        for route in self.routes.iter() {
            logger.info(format_args!("  {} {}", route.method, route.pattern));
        }
        if self.routes.has_catch_all() {
            logger.info(format_args!("  * catch-all"));
        }
    }

    /// Bind a listener with the configured backlog.
    fn setup_listener(&self) -> Result<TcpListener, Error> {
        let addr = self.config.addr;
        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        Ok(socket.listen(self.config.backlog)?)
    }

    /// Bind and start accepting connections in a background task.
    pub async fn start(self) -> Result<RunningServer, Error> {
        self.display_server_info();

        let listener = self.setup_listener()?;
        let local_addr = listener.local_addr()?;
        self.logger
            .info(format_args!("Server listening on http://{local_addr}"));

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        let shared = self.into_shared();
        let task = tokio::spawn(accept_loop(listener, shared, shutdown_rx));

        Ok(RunningServer {
            local_addr,
            shutdown_tx,
            task,
        })
    }

    /// Start the server and run until Ctrl+C, then shut down gracefully.
    pub async fn run(self) -> Result<(), Error> {
        let logger = self.logger.clone();
        let server = self.start().await?;
        signal::ctrl_c().await?;
        logger.info(format_args!("Received Ctrl+C, initiating graceful shutdown"));
        server.stop().await
    }
}

/// A server accepting connections.
///
/// Dropping the handle stops accepting as well, just like [`RunningServer::stop`]
/// without waiting.
#[derive(Debug)]
pub struct RunningServer {
    local_addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl RunningServer {
    /// The address actually bound, useful when the configured port was 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight ones to finish.
    pub async fn stop(self) -> Result<(), Error> {
        // The accept loop may already be gone; the join below still applies.
        let _ = self.shutdown_tx.send(()).await;
        self.task
            .await
            .map_err(|e| Error::InternalError(format!("accept loop failed: {e}")))
    }
}

async fn accept_loop(listener: TcpListener, shared: Arc<Shared>, mut shutdown_rx: mpsc::Receiver<()>) {
    let mut tasks = JoinSet::new();

    loop {
        tokio::select! {
            // Check for shutdown signal
            _ = shutdown_rx.recv() => {
                shared.logger.info(format_args!("Shutting down server..."));
                break;
            }

            // Reap finished connections
            Some(res) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = res {
                    shared.logger.error(format_args!("Connection task failed: {e}"));
                }
            }

            // Accept new connections
            accepted = listener.accept() => {
                match accepted {
                    Ok((socket, addr)) => {
                        shared.logger.debug(format_args!("Connection from {addr}"));
                        let shared = Arc::clone(&shared);
                        tasks.spawn(async move {
                            handle_connection(socket, &shared).await;
                        });
                    }
                    Err(e) => {
                        if handle_accept_error(&shared.logger, e).await {
                            break;
                        }
                    }
                }
            }
        }
    }

    drop(listener);
    perform_shutdown(&mut tasks, &shared.logger).await;
}

/// Log an accept error; returns true if the loop should stop.
async fn handle_accept_error(logger: &LogSink, e: std::io::Error) -> bool {
    logger.error(format_args!("Error accepting connection: {e}"));

    if e.kind() == std::io::ErrorKind::BrokenPipe {
        logger.error(format_args!("Critical error accepting connection, shutting down"));
        return true;
    }

    // For other errors (e.g. out of file descriptors), wait a bit before retrying
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    false
}

/// Wait for in-flight connections; each is bounded by the request timeout.
async fn perform_shutdown(tasks: &mut JoinSet<()>, logger: &LogSink) {
    logger.info(format_args!(
        "Waiting for {len} active connections to complete...",
        len = tasks.len()
    ));
    while let Some(res) = tasks.join_next().await {
        if let Err(e) = res {
            logger.error(format_args!("Connection task failed during shutdown: {e}"));
        }
    }
    logger.info(format_args!("Server shutdown complete"));
}
