#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use log_shipper::config::{Config, Environment};

pub const PUSH_PATH: &str = "/loki/api/v1/push";

pub fn config_for(push_url: String, environment: Environment) -> Config {
    Config {
        push_url,
        grafana_user_id: Some("123456".to_owned()),
        grafana_token: Some("glc_secret".to_owned()),
        environment,
        app_name: "recipe-scraper".to_owned(),
    }
}

/// Everything written to the console while the guard is alive.
#[derive(Clone, Default)]
pub struct CapturedConsole(Arc<Mutex<Vec<u8>>>);

pub struct CapturedWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedConsole {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedWriter(self.0.clone())
    }
}

impl CapturedConsole {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn lines_containing(&self, needle: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_owned)
            .collect()
    }
}

/// Route this thread's tracing output into a buffer. `#[tokio::test]` runs spawned tasks on
/// the test thread, so background deliveries are captured too.
pub fn capture_console() -> (CapturedConsole, DefaultGuard) {
    let console = CapturedConsole::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(console.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();

    (console, tracing::subscriber::set_default(subscriber))
}

/// Like `capture_console`, but only events passing `filter` reach the buffer.
pub fn capture_console_filtered(filter: &str) -> (CapturedConsole, DefaultGuard) {
    let console = CapturedConsole::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(console.clone())
        .with_ansi(false)
        .with_env_filter(EnvFilter::new(filter))
        .finish();

    (console, tracing::subscriber::set_default(subscriber))
}
