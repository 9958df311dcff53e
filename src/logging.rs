//! the terminal belongs to the ui, so log lines go to a file or nowhere
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::fmt as tracing_fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::error::Result;

/// used when `RUST_LOG` is unset or unparseable
pub const DEFAULT_DIRECTIVE: &str = "info";

pub fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// install a subscriber writing to `path`. without a path, events are dropped
pub fn init(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;
    let layer = tracing_fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file));
    Registry::default().with(layer).with(filter()).try_init()?;
    Ok(())
}
