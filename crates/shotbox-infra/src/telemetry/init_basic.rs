use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Options for [`init_telemetry`].
#[derive(Debug, Clone)]
pub struct TelemetryOptions {
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
    pub service_name: String,
}

impl TelemetryOptions {
    pub fn new(service_name: impl Into<String>, default_filter: impl Into<String>) -> Self {
        Self {
            default_filter: default_filter.into(),
            json: false,
            service_name: service_name.into(),
        }
    }

    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

/// Initialize tracing with an `EnvFilter` and a fmt layer.
pub fn init_telemetry(options: &TelemetryOptions) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&options.default_filter));

    let (json_layer, text_layer) = if options.json {
        (Some(fmt::layer().json()), None)
    } else {
        (None, Some(fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()?;

    tracing::debug!(service = %options.service_name, json = options.json, "Tracing initialized");
    Ok(())
}

pub async fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown");
}
