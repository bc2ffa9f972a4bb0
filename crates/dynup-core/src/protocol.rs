//! Update orchestrator
//!
//! One [`UpdateProtocol`] instance manages one hostname at one provider.
//! `update()` builds the GET request from the profile, performs it with a
//! bounded timeout, classifies the response, applies the state
//! transition, and notifies for every non-silent outcome. It never
//! retries internally and never lets a network failure escape as a
//! panic or error: whatever happens comes back as an [`Outcome`].

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::classify::classify;
use crate::config::ProtocolOptions;
use crate::error::{Error, Result};
use crate::notify::Notifier;
use crate::outcome::Outcome;
use crate::profile::{AuthScheme, HostnameParam, IpParamPolicy, ProviderProfile};
use crate::state::UpdateState;

/// Request timeout for provider update calls
const UPDATE_TIMEOUT: Duration = Duration::from_secs(60);

/// Resolved credential material for one updater instance
enum CredentialSet {
    Basic { userid: String, password: String },
    Query { param: &'static str, secret: String },
    None,
}

/// Drives the update protocol for one managed hostname
///
/// The embedded [`UpdateState`] is owned exclusively by this instance;
/// drive it from one task at a time. Profiles may be shared across
/// instances of the same provider.
pub struct UpdateProtocol {
    profile: ProviderProfile,
    hostname: String,
    credentials: CredentialSet,
    state: UpdateState,
    client: reqwest::Client,
    notifier: Arc<dyn Notifier>,
}

// Credentials never appear in Debug output
impl std::fmt::Debug for UpdateProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateProtocol")
            .field("profile", &self.profile.key)
            .field("hostname", &self.hostname)
            .field("credentials", &"<REDACTED>")
            .field("state", &self.state)
            .finish()
    }
}

impl UpdateProtocol {
    /// Create an updater for one hostname
    ///
    /// Fails with [`Error::Config`] when the hostname is empty or a
    /// credential field the profile requires is missing. This is the only
    /// point where configuration is validated; `update()` itself cannot
    /// fail locally.
    pub fn new(
        profile: ProviderProfile,
        options: &ProtocolOptions,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        Self::with_timeout(profile, options, notifier, UPDATE_TIMEOUT)
    }

    /// Like [`new`](Self::new) with an explicit request timeout
    pub fn with_timeout(
        profile: ProviderProfile,
        options: &ProtocolOptions,
        notifier: Arc<dyn Notifier>,
        timeout: Duration,
    ) -> Result<Self> {
        if options.hostname.is_empty() {
            return Err(Error::config("hostname must not be empty"));
        }
        options.require_all(profile.credential_fields)?;

        let credentials = match profile.auth {
            AuthScheme::Basic => CredentialSet::Basic {
                userid: options.require("userid")?.to_string(),
                password: options.require("password")?.to_string(),
            },
            AuthScheme::QueryParam { param } => CredentialSet::Query {
                param,
                secret: options.require(param)?.to_string(),
            },
            AuthScheme::None => CredentialSet::None,
        };

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(e.to_string()))?;

        Ok(Self {
            profile,
            hostname: options.hostname.clone(),
            credentials,
            state: UpdateState::new(),
            client,
            notifier,
        })
    }

    /// The managed hostname
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// The provider profile driving this instance
    pub fn profile(&self) -> &ProviderProfile {
        &self.profile
    }

    /// Health record accumulated across update attempts
    pub fn state(&self) -> &UpdateState {
        &self.state
    }

    /// Perform one update attempt
    ///
    /// `ip = None` asks the provider to auto-detect the address; profiles
    /// that do not support detection still accept it, and any rejection
    /// surfaces as whatever the provider's response encodes.
    ///
    /// Exactly one HTTP request is made. A timeout or connection failure
    /// becomes [`Outcome::TransportError`]; nothing is propagated as an
    /// unhandled fault.
    pub async fn update(&mut self, ip: Option<IpAddr>) -> Outcome {
        tracing::debug!(
            "updating '{}' via '{}' (ip: {:?})",
            self.hostname,
            self.profile.key,
            ip
        );

        let outcome = match self.build_request(ip).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(body) => {
                        tracing::debug!("status {}, body {:?}", status, body);
                        classify(status, &body, ip, self.profile.response_grammar())
                    }
                    Err(err) => Outcome::TransportError {
                        cause: transport_cause(&err),
                    },
                }
            }
            Err(err) => Outcome::TransportError {
                cause: transport_cause(&err),
            },
        };

        self.state.apply(&outcome);
        self.emit(ip, &outcome);
        outcome
    }

    /// Assemble the provider request from the profile
    fn build_request(&self, ip: Option<IpAddr>) -> reqwest::RequestBuilder {
        let mut params: Vec<(&str, String)> = Vec::new();

        match self.profile.hostname {
            HostnameParam::Fqdn { param } => params.push((param, self.hostname.clone())),
            HostnameParam::FirstLabel { param } => {
                let label = self.hostname.split('.').next().unwrap_or_default();
                params.push((param, label.to_string()));
            }
        }

        if let CredentialSet::Query { param, secret } = &self.credentials {
            params.push((param, secret.clone()));
        }

        match self.profile.ip {
            IpParamPolicy::OmitWhenUnknown { param } => {
                if let Some(ip) = ip {
                    params.push((param, ip.to_string()));
                }
            }
            IpParamPolicy::EmptyRequestsAutoDetect { param } => {
                params.push((param, ip.map(|ip| ip.to_string()).unwrap_or_default()));
            }
        }

        let mut request = self.client.get(&self.profile.update_url).query(&params);
        if let CredentialSet::Basic { userid, password } = &self.credentials {
            request = request.basic_auth(userid, Some(password));
        }
        request
    }

    /// Notify for user-visible outcomes; Success and NoChange stay silent
    fn emit(&self, ip: Option<IpAddr>, outcome: &Outcome) {
        let kind = outcome.kind();
        if !kind.is_user_visible() {
            return;
        }

        let ip_text = ip
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "<auto-detect>".to_string());

        let message = match outcome {
            Outcome::Abuse => format!(
                "update of '{}' to {} rejected: client flagged as abusive",
                self.hostname, ip_text
            ),
            Outcome::NoHost => format!(
                "update of '{}' to {} rejected: invalid/non-existent hostname",
                self.hostname, ip_text
            ),
            Outcome::ServiceFailure => format!(
                "update of '{}' to {} failed: service is failing (911)",
                self.hostname, ip_text
            ),
            Outcome::NotFqdn => format!(
                "update of '{}' to {} rejected: hostname is not a fully qualified domain name",
                self.hostname, ip_text
            ),
            Outcome::Unrecognized { body } => format!(
                "problem updating '{}' to {}: unrecognized response {:?}",
                self.hostname, ip_text, body
            ),
            Outcome::TransportError { cause } => format!(
                "problem updating '{}' to {}: {}",
                self.hostname, ip_text, cause
            ),
            Outcome::Success { .. } | Outcome::NoChange { .. } => return,
        };

        self.notifier.notify(kind.label(), &message);
    }
}

/// Human-readable transport cause
///
/// Deliberately coarse: reqwest error displays embed the request URL,
/// which for token-authenticated providers contains the secret.
fn transport_cause(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "connection failed".to_string()
    } else if err.is_body() || err.is_decode() {
        "failed to read response body".to_string()
    } else {
        "request failed".to_string()
    }
}
