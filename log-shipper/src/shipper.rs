use std::sync::Arc;

use reqwest::header;
use tokio::runtime::Handle;
use tokio::task::{JoinHandle, JoinSet};
use tracing::debug;

use crate::config::{Config, Credentials, Environment};
use crate::console;
use crate::entry::{Labels, Level, LogEntry, Metadata, NanoClock, APP_LABEL, ENVIRONMENT_LABEL};
use crate::error::{ConfigError, DeliveryError};
use crate::payload::PushPayload;

/// Ships log lines to a Loki push endpoint, best effort.
///
/// Cloning is cheap: clones share the HTTP client and the timestamp clock.
#[derive(Clone)]
pub struct LogShipper {
    inner: Arc<Inner>,
}

struct Inner {
    /// The client used for HTTP requests.
    client: reqwest::Client,
    /// Where every payload is posted.
    push_url: reqwest::Url,
    /// Basic auth pair, if one was configured.
    credentials: Option<Credentials>,
    environment: Environment,
    /// `app` and `environment`, attached to every entry before caller metadata.
    fixed_labels: Labels,
    clock: NanoClock,
}

impl LogShipper {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let push_url: reqwest::Url = config.push_url.parse()?;
        let credentials = config.credentials();

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(credentials) = &credentials {
            let tenant = header::HeaderValue::from_str(&credentials.user_id)
                .map_err(|_| ConfigError::InvalidTenantError(credentials.user_id.to_owned()))?;
            headers.insert(header::HeaderName::from_static("x-scope-orgid"), tenant);
        }

        // No timeout: requests are bounded only by the client's defaults.
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent("log-shipper")
            .build()?;

        let fixed_labels = Labels::from([
            (APP_LABEL.to_owned(), config.app_name.to_owned()),
            (
                ENVIRONMENT_LABEL.to_owned(),
                config.environment.as_str().to_owned(),
            ),
        ]);

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                push_url,
                credentials,
                environment: config.environment.clone(),
                fixed_labels,
                clock: NanoClock::new(),
            }),
        })
    }

    pub fn environment(&self) -> &Environment {
        &self.inner.environment
    }

    /// Log `message` at `info`, unless `metadata` carries its own `level`.
    ///
    /// Returns immediately. Delivery happens on a background task and its outcome is never
    /// reported back: failures end up on the console instead.
    pub fn log(&self, message: impl Into<String>, metadata: impl Into<Metadata>) {
        self.dispatch(Level::Info, message, metadata);
    }

    pub fn info(&self, message: impl Into<String>, metadata: impl Into<Metadata>) {
        self.dispatch(Level::Info, message, metadata);
    }

    pub fn warn(&self, message: impl Into<String>, metadata: impl Into<Metadata>) {
        self.dispatch(Level::Warn, message, metadata);
    }

    pub fn error(&self, message: impl Into<String>, metadata: impl Into<Metadata>) {
        self.dispatch(Level::Error, message, metadata);
    }

    pub fn debug(&self, message: impl Into<String>, metadata: impl Into<Metadata>) {
        self.dispatch(Level::Debug, message, metadata);
    }

    /// Same as `log`, but hands back the delivery task so short-lived callers can wait for
    /// in-flight entries before exiting. `None` when nothing was sent over the network.
    pub fn dispatch(
        &self,
        default_level: Level,
        message: impl Into<String>,
        metadata: impl Into<Metadata>,
    ) -> Option<JoinHandle<()>> {
        let entry = self.remote_entry(default_level, message, metadata)?;

        match Handle::try_current() {
            Ok(handle) => {
                let shipper = self.clone();
                Some(handle.spawn(async move { shipper.ship(entry).await }))
            }
            Err(_) => {
                console::no_runtime(&entry);
                None
            }
        }
    }

    /// Like `dispatch`, but the delivery task is owned by `tasks`, so long-running callers can
    /// reap finished deliveries as they go.
    pub fn dispatch_into(
        &self,
        tasks: &mut JoinSet<()>,
        default_level: Level,
        message: impl Into<String>,
        metadata: impl Into<Metadata>,
    ) {
        let Some(entry) = self.remote_entry(default_level, message, metadata) else {
            return;
        };

        match Handle::try_current() {
            Ok(handle) => {
                let shipper = self.clone();
                tasks.spawn_on(async move { shipper.ship(entry).await }, &handle);
            }
            Err(_) => console::no_runtime(&entry),
        }
    }

    /// Build an entry, printing it instead when running in development.
    /// `None` means the entry was handled locally.
    fn remote_entry(
        &self,
        default_level: Level,
        message: impl Into<String>,
        metadata: impl Into<Metadata>,
    ) -> Option<LogEntry> {
        let entry = self.entry(default_level, message, metadata);

        if self.inner.environment.is_development() {
            console::print(&entry);
            metrics::counter!("log_shipper_entries_total", "outcome" => "console").increment(1);
            return None;
        }

        Some(entry)
    }

    /// Build an entry stamped with the current time and this shipper's fixed labels.
    pub fn entry(
        &self,
        default_level: Level,
        message: impl Into<String>,
        metadata: impl Into<Metadata>,
    ) -> LogEntry {
        LogEntry::new(
            message.into(),
            default_level,
            &self.inner.fixed_labels,
            metadata.into(),
            self.inner.clock.now(),
        )
    }

    /// Push `entry`, falling back to the console if it cannot be delivered.
    pub async fn ship(&self, entry: LogEntry) {
        match self.push(&entry).await {
            Ok(_) => {
                metrics::counter!("log_shipper_entries_total", "outcome" => "delivered")
                    .increment(1);
            }
            Err(error) => console::delivery_failed(&error, &entry),
        }
    }

    /// Make a single POST request with `entry` to the push endpoint.
    /// Any 2xx status counts as delivered. Nothing is retried.
    pub async fn push(&self, entry: &LogEntry) -> Result<(), DeliveryError> {
        let payload = PushPayload::from(entry);

        let mut request = self
            .inner
            .client
            .post(self.inner.push_url.clone())
            .json(&payload);

        if let Some(credentials) = &self.inner.credentials {
            request = request.basic_auth(&credentials.user_id, credentials.token.as_ref());
        }

        let response = request.send().await.map_err(DeliveryError::RequestError)?;

        let response = response
            .error_for_status()
            .map_err(DeliveryError::RejectedError)?;

        debug!(status = %response.status(), "delivered log entry");

        Ok(())
    }
}
