// # dynupd - dynamic-DNS update daemon
//
// Thin integration layer: reads configuration, wires the detector,
// registry and notifier together, and runs the polling scheduler. All
// protocol logic lives in dynup-core; the scheduler here only decides
// *when* to call update(), reading the per-host counters the core
// exposes for exactly that purpose.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Single host
// - `DYNUP_PROTOCOL`: provider key (dyndns, noip, majimoto, duckdns)
// - `DYNUP_HOSTNAME`: hostname to keep updated
// - `DYNUP_USERID` / `DYNUP_PASSWORD`: Basic-auth credentials
// - `DYNUP_TOKEN` / `DYNUP_KEY`: token credentials
// - `DYNUP_URL`: endpoint override (duckdns-compatible services)
//
// ### Multiple hosts
// - `DYNUP_HOSTS_FILE`: path to a JSON array of host entries:
//   `[{"protocol": "dyndns", "hostname": "...", "userid": "...", ...}]`
//
// ### Detection & scheduling
// - `DYNUP_IP_URL`: custom "what is my IP" service (default: built-in list)
// - `DYNUP_INTERVAL_SECS`: base polling interval (default: 300)
// - `DYNUP_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export DYNUP_PROTOCOL=duckdns
// export DYNUP_HOSTNAME=myhost.duckdns.org
// export DYNUP_TOKEN=your_token
//
// dynupd
// ```

use std::env;
use std::net::IpAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use dynup_core::{
    HostStatus, IpDetector, LogNotifier, ProtocolOptions, ProtocolRegistry, UpdateProtocol,
    UpdateState,
};
use dynup_ip_http::HttpIpDetector;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Default base polling interval
const DEFAULT_INTERVAL_SECS: u64 = 300;

/// Cap on the exponential failure backoff (2^5 = 32x base interval)
const MAX_BACKOFF_SHIFT: u32 = 5;

/// Consecutive nochg answers after which the interval is stretched
const NOCHG_STRETCH_THRESHOLD: u32 = 3;

/// Exit codes following systemd conventions
#[derive(Debug, Clone, Copy)]
enum DynupExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DynupExitCode> for ExitCode {
    fn from(code: DynupExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// One managed hostname, as configured
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HostEntry {
    /// Provider configuration key
    protocol: String,

    /// Hostname plus provider-specific credential fields
    #[serde(flatten)]
    options: ProtocolOptions,
}

/// Daemon configuration
#[derive(Debug)]
struct Config {
    hosts: Vec<HostEntry>,
    ip_url: Option<String>,
    interval_secs: u64,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let hosts = match env::var("DYNUP_HOSTS_FILE").ok() {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read DYNUP_HOSTS_FILE '{}'", path))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("failed to parse DYNUP_HOSTS_FILE '{}'", path))?
            }
            None => match env::var("DYNUP_PROTOCOL").ok() {
                Some(protocol) => {
                    let hostname = env::var("DYNUP_HOSTNAME").unwrap_or_default();
                    let mut options = ProtocolOptions::new(hostname);
                    for (field, var) in [
                        ("userid", "DYNUP_USERID"),
                        ("password", "DYNUP_PASSWORD"),
                        ("token", "DYNUP_TOKEN"),
                        ("key", "DYNUP_KEY"),
                        ("url", "DYNUP_URL"),
                    ] {
                        if let Ok(value) = env::var(var) {
                            options = options.with_field(field, value);
                        }
                    }
                    vec![HostEntry { protocol, options }]
                }
                None => Vec::new(),
            },
        };

        Ok(Self {
            hosts,
            ip_url: env::var("DYNUP_IP_URL").ok(),
            interval_secs: env::var("DYNUP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_INTERVAL_SECS),
            log_level: env::var("DYNUP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration against the registry
    fn validate(&self, registry: &ProtocolRegistry) -> Result<()> {
        if self.hosts.is_empty() {
            anyhow::bail!(
                "no hosts configured. \
                Set DYNUP_PROTOCOL and DYNUP_HOSTNAME, or point DYNUP_HOSTS_FILE \
                at a JSON host list."
            );
        }

        for host in &self.hosts {
            if !registry.has(&host.protocol) {
                anyhow::bail!(
                    "unknown protocol '{}' for hostname '{}'. Known protocols: {}",
                    host.protocol,
                    host.options.hostname,
                    registry.keys().join(", ")
                );
            }
            if host.options.hostname.is_empty() {
                anyhow::bail!("a host entry for protocol '{}' has no hostname", host.protocol);
            }
        }

        if self.interval_secs == 0 {
            anyhow::bail!("DYNUP_INTERVAL_SECS must be > 0");
        }

        if let Some(ref url) = self.ip_url
            && url.is_empty()
        {
            anyhow::bail!("DYNUP_IP_URL cannot be empty when set");
        }

        Ok(())
    }
}

fn main() -> ExitCode {
    let registry = ProtocolRegistry::new();
    if let Err(e) = dynup_protocols::register(&registry) {
        eprintln!("Provider registration error: {}", e);
        return DynupExitCode::ConfigError.into();
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DynupExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate(&registry) {
        eprintln!("Configuration validation error: {}", e);
        return DynupExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DynupExitCode::ConfigError.into();
    }

    info!("Starting dynupd");
    info!("Configuration loaded: {} host(s)", config.hosts.len());

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DynupExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config, registry).await {
            error!("Daemon error: {}", e);
            DynupExitCode::RuntimeError
        } else {
            DynupExitCode::CleanShutdown
        }
    });

    result.into()
}

/// One scheduled updater: protocol instance plus scheduling bookkeeping
struct ManagedHost {
    updater: UpdateProtocol,
    /// Last address the provider acknowledged (Success or NoChange)
    last_acknowledged: Option<IpAddr>,
    next_due: Instant,
}

/// Run the polling scheduler until a shutdown signal arrives
async fn run_daemon(config: Config, registry: ProtocolRegistry) -> Result<()> {
    let notifier = Arc::new(LogNotifier);

    let detector: Box<dyn IpDetector> = match config.ip_url {
        Some(ref url) => Box::new(HttpIpDetector::with_url(url.clone())?),
        None => Box::new(HttpIpDetector::new()?),
    };

    let base_interval = Duration::from_secs(config.interval_secs);
    let now = Instant::now();
    let mut hosts = Vec::new();
    for entry in &config.hosts {
        let updater = registry.create(&entry.protocol, &entry.options, notifier.clone())?;
        info!(
            "Managing '{}' via '{}'",
            updater.hostname(),
            entry.protocol
        );
        hosts.push(ManagedHost {
            updater,
            last_acknowledged: None,
            next_due: now,
        });
    }

    loop {
        // hosts is never empty: validate() rejects an empty host list
        let next_due = hosts
            .iter()
            .map(|host| host.next_due)
            .min()
            .unwrap_or_else(Instant::now);

        tokio::select! {
            _ = tokio::time::sleep_until(next_due) => {
                run_round(&mut hosts, detector.as_ref(), base_interval).await;
            }
            signal = wait_for_shutdown() => {
                match signal {
                    Ok(name) => info!("Received shutdown signal: {}", name),
                    Err(e) => {
                        error!("Shutdown error: {}", e);
                        return Err(e);
                    }
                }
                break;
            }
        }
    }

    info!("Shutting down dynupd");
    Ok(())
}

/// Update every due host once
async fn run_round(hosts: &mut Vec<ManagedHost>, detector: &dyn IpDetector, base: Duration) {
    let now = Instant::now();
    if !hosts.iter().any(|host| host.next_due <= now) {
        return;
    }

    let current_ip = match detector.detect().await {
        Ok(ip) => ip,
        Err(e) => {
            // recoverable: try again after one base interval
            warn!("IP detection failed: {}", e);
            for host in hosts.iter_mut().filter(|host| host.next_due <= now) {
                host.next_due = now + base;
            }
            return;
        }
    };

    for host in hosts.iter_mut().filter(|host| host.next_due <= now) {
        let unchanged = host.last_acknowledged == Some(current_ip);
        if unchanged && host.updater.state().status() == HostStatus::Ok {
            debug!(
                "'{}' already points at {}, skipping",
                host.updater.hostname(),
                current_ip
            );
            host.next_due = now + base;
            continue;
        }

        let outcome = host.updater.update(Some(current_ip)).await;
        info!(
            "updated '{}': {} (fails: {}, nochg: {})",
            host.updater.hostname(),
            outcome.kind(),
            host.updater.state().fail_count(),
            host.updater.state().nochg_count()
        );

        if outcome.is_ok() {
            host.last_acknowledged = Some(current_ip);
        }
        host.next_due = now + base * backoff_factor(host.updater.state());
    }
}

/// Scheduling factor derived from the core's counters
///
/// The core only reports what happened; turning failure and no-change
/// streaks into longer intervals is this scheduler's job.
fn backoff_factor(state: &UpdateState) -> u32 {
    if state.status() == HostStatus::Failing {
        1 << state.fail_count().min(MAX_BACKOFF_SHIFT)
    } else if state.nochg_count() >= NOCHG_STRETCH_THRESHOLD {
        // the provider keeps telling us nothing changed; be polite
        2
    } else {
        1
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(name)
}

/// Wait for shutdown (SIGINT only), fallback for non-Unix platforms
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
