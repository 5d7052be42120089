use anyhow::Result;
use std::io;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    #[must_use]
    pub fn from_arg(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Initialize logging on stderr so stdout stays reserved for command output.
///
/// # Errors
///
/// Returns an error if a filter directive is invalid or a global subscriber is already set
pub fn init(verbosity_level: Option<Level>, format: Format) -> Result<()> {
    let verbosity_level = verbosity_level.unwrap_or(Level::ERROR);

    // RUST_LOG=
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity_level.into())
        .from_env_lossy()
        .add_directive("hyper=error".parse()?)
        .add_directive("hyper_util=error".parse()?)
        .add_directive("reqwest=warn".parse()?);

    match format {
        Format::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_target(false)
                .with_writer(io::stderr);

            let subscriber = Registry::default().with(fmt_layer).with(filter);
            tracing::subscriber::set_global_default(subscriber)?;
        }
        Format::Text => {
            let fmt_layer = fmt::layer()
                .with_file(false)
                .with_line_number(false)
                .with_thread_ids(false)
                .with_target(false)
                .with_writer(io::stderr);

            let subscriber = Registry::default().with(fmt_layer).with(filter);
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    Ok(())
}
