//! bale plugin that serves build output over HTTP
//!
//! On the first `write_bundle` the plugin binds `host:port` and spawns a
//! static file server over its `contentBase` directories. The server runs as
//! a background task of the build: the pipeline hands it back unawaited and
//! the caller decides how long to keep the process alive.
//!
//! Binding happens inside the hook, so a port that is already taken fails
//! the build with a plugin error.
//!
//! ```toml
//! [[plugins]]
//! name = "serve"
//! when = "!production"
//! options = { port = 3000, contentBase = ["./dist"] }
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use anyhow::Context;
use async_trait::async_trait;
use bale_bundler::{
    HookResult, OutputBundle, Plugin, PluginContext, PluginRegistry, SharedPlugin,
    builtins::parse_options,
};
use tokio::net::TcpListener;
use tracing::debug;

mod options;
pub mod server;

pub use options::{DEFAULT_HOST, DEFAULT_PORT, ServeOptions};

/// Name the plugin is registered under.
pub const PLUGIN_NAME: &str = "serve";

/// Register the `serve` factory.
pub fn register(registry: &mut PluginRegistry) {
    registry.register(PLUGIN_NAME, |options, _| {
        let options: ServeOptions = parse_options(options)?;
        Ok(Arc::new(ServePlugin::new(options)) as SharedPlugin)
    });
}

/// Starts a development server once per plugin instance.
#[derive(Debug, Default)]
pub struct ServePlugin {
    options: ServeOptions,
    addr: OnceLock<SocketAddr>,
}

impl ServePlugin {
    pub fn new(options: ServeOptions) -> Self {
        Self {
            options,
            addr: OnceLock::new(),
        }
    }

    /// Address the server is bound to, once it has started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.addr.get().copied()
    }

    fn content_dirs(&self, ctx: &PluginContext) -> Vec<PathBuf> {
        if self.options.content_base.is_empty() {
            return vec![ctx.cwd().to_path_buf()];
        }
        self.options
            .content_base
            .iter()
            .map(|dir| ctx.cwd().join(dir))
            .collect()
    }
}

#[async_trait]
impl Plugin for ServePlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    async fn write_bundle(&self, bundle: &OutputBundle, ctx: &PluginContext) -> HookResult<()> {
        if self.addr.get().is_some() {
            debug!(bundle = %bundle.file.display(), "server already running");
            return Ok(());
        }

        let host = self.options.host.as_str();
        let listener = TcpListener::bind((host, self.options.port))
            .await
            .with_context(|| format!("Failed to bind to {host}:{}", self.options.port))?;
        let addr = listener.local_addr()?;
        if self.addr.set(addr).is_err() {
            debug!(%addr, "another write started the server first");
            return Ok(());
        }

        let dirs = self.content_dirs(ctx);
        ctx.spawn_background(
            format!("serve http://{addr}"),
            server::serve(listener, dirs),
        );
        Ok(())
    }
}
