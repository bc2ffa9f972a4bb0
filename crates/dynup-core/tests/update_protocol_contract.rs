//! Contract tests for the update orchestrator
//!
//! Each test drives a real `UpdateProtocol` against a local listener
//! serving canned provider responses, covering classification, state
//! transitions and the notification side-channel end to end.

mod common;

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use common::{RecordingNotifier, spawn_update_server};
use dynup_core::{
    AuthScheme, HostStatus, HostnameParam, IpParamPolicy, Outcome, OutcomeKind, ProtocolOptions,
    ProviderProfile, UpdateProtocol,
};

fn dyndns2_family_profile(update_url: String) -> ProviderProfile {
    ProviderProfile {
        key: "testdns",
        update_url,
        credential_fields: &["userid", "password"],
        auth: AuthScheme::Basic,
        hostname: HostnameParam::Fqdn { param: "hostname" },
        ip: IpParamPolicy::OmitWhenUnknown { param: "myip" },
        grammar: None,
    }
}

fn basic_options() -> ProtocolOptions {
    ProtocolOptions::new("host.example.com")
        .with_field("userid", "joe")
        .with_field("password", "hunter2")
}

fn test_ip() -> IpAddr {
    "203.0.113.5".parse().unwrap()
}

#[tokio::test]
async fn good_response_resets_counters_and_stays_silent() {
    let (url, server) = spawn_update_server(vec![(200, "good 203.0.113.5")]).await;
    let notifier = Arc::new(RecordingNotifier::new());
    let mut updater =
        UpdateProtocol::new(dyndns2_family_profile(url), &basic_options(), notifier.clone())
            .unwrap();

    let outcome = updater.update(Some(test_ip())).await;

    assert_eq!(
        outcome,
        Outcome::Success {
            ip: Some(test_ip())
        }
    );
    assert_eq!(updater.state().status(), HostStatus::Ok);
    assert_eq!(updater.state().fail_count(), 0);
    assert_eq!(updater.state().nochg_count(), 0);
    assert!(notifier.events().is_empty(), "success must stay silent");

    let heads = server.await.unwrap();
    assert!(
        heads[0].contains("hostname=host.example.com"),
        "{}",
        heads[0]
    );
    assert!(heads[0].contains("myip=203.0.113.5"), "{}", heads[0]);
    assert!(heads[0].contains("authorization: Basic") || heads[0].contains("Authorization: Basic"));
}

#[tokio::test]
async fn repeated_nochg_is_idempotent_and_counts() {
    let (url, server) = spawn_update_server(vec![(200, "nochg"), (200, "nochg")]).await;
    let notifier = Arc::new(RecordingNotifier::new());
    let mut updater =
        UpdateProtocol::new(dyndns2_family_profile(url), &basic_options(), notifier.clone())
            .unwrap();

    for round in 1..=2u32 {
        let outcome = updater.update(Some(test_ip())).await;
        assert_eq!(
            outcome,
            Outcome::NoChange {
                ip: Some(test_ip())
            }
        );
        assert_eq!(updater.state().status(), HostStatus::Ok);
        assert_eq!(updater.state().nochg_count(), round);
        assert_eq!(updater.state().fail_count(), 0);
    }

    assert!(notifier.events().is_empty(), "nochg must stay silent");
    server.await.unwrap();
}

#[tokio::test]
async fn service_failure_notifies_with_hostname_and_ip() {
    let (url, server) = spawn_update_server(vec![(200, "911")]).await;
    let notifier = Arc::new(RecordingNotifier::new());
    let mut updater =
        UpdateProtocol::new(dyndns2_family_profile(url), &basic_options(), notifier.clone())
            .unwrap();

    let outcome = updater.update(Some(test_ip())).await;

    assert_eq!(outcome, Outcome::ServiceFailure);
    assert_eq!(updater.state().status(), HostStatus::Failing);
    assert_eq!(updater.state().fail_count(), 1);

    let events = notifier.events();
    assert_eq!(events.len(), 1);
    let (event, message) = &events[0];
    assert_eq!(event, "911");
    assert!(message.contains("host.example.com"), "{}", message);
    assert!(message.contains("203.0.113.5"), "{}", message);

    server.await.unwrap();
}

#[tokio::test]
async fn abuse_clears_counters_and_notifies() {
    let (url, server) = spawn_update_server(vec![(200, "nochg"), (200, "abuse")]).await;
    let notifier = Arc::new(RecordingNotifier::new());
    let mut updater =
        UpdateProtocol::new(dyndns2_family_profile(url), &basic_options(), notifier.clone())
            .unwrap();

    updater.update(Some(test_ip())).await;
    let outcome = updater.update(Some(test_ip())).await;

    assert_eq!(outcome, Outcome::Abuse);
    assert_eq!(updater.state().status(), HostStatus::Failing);
    assert_eq!(updater.state().fail_count(), 0);
    assert_eq!(updater.state().nochg_count(), 0);
    assert_eq!(notifier.events().len(), 1);
    assert_eq!(notifier.events()[0].0, "abuse");

    server.await.unwrap();
}

#[tokio::test]
async fn unrecognized_body_carries_raw_text_into_notification() {
    let (url, server) = spawn_update_server(vec![(200, "badauth")]).await;
    let notifier = Arc::new(RecordingNotifier::new());
    let mut updater =
        UpdateProtocol::new(dyndns2_family_profile(url), &basic_options(), notifier.clone())
            .unwrap();

    let outcome = updater.update(Some(test_ip())).await;

    assert_eq!(
        outcome,
        Outcome::Unrecognized {
            body: "badauth".into()
        }
    );
    assert_eq!(updater.state().status(), HostStatus::Failing);
    // unrecognized responses leave the counters alone
    assert_eq!(updater.state().fail_count(), 0);

    let events = notifier.events();
    assert_eq!(events.len(), 1);
    assert!(events[0].1.contains("badauth"), "{}", events[0].1);

    server.await.unwrap();
}

#[tokio::test]
async fn non_200_status_is_a_transport_error_regardless_of_body() {
    let (url, server) = spawn_update_server(vec![(503, "good 203.0.113.5")]).await;
    let notifier = Arc::new(RecordingNotifier::new());
    let mut updater =
        UpdateProtocol::new(dyndns2_family_profile(url), &basic_options(), notifier.clone())
            .unwrap();

    let outcome = updater.update(Some(test_ip())).await;

    assert_eq!(
        outcome,
        Outcome::TransportError {
            cause: "invalid http status code: 503".into()
        }
    );
    assert_eq!(updater.state().status(), HostStatus::Failing);
    assert_eq!(updater.state().fail_count(), 0);
    assert_eq!(notifier.events().len(), 1);

    server.await.unwrap();
}

#[tokio::test]
async fn connection_failure_becomes_transport_error_not_a_fault() {
    // Bind then immediately drop a listener so the port is closed
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let notifier = Arc::new(RecordingNotifier::new());
    let profile = dyndns2_family_profile(format!("http://{}/nic/update", addr));
    let mut updater = UpdateProtocol::with_timeout(
        profile,
        &basic_options(),
        notifier.clone(),
        Duration::from_secs(5),
    )
    .unwrap();

    let ip: IpAddr = "198.51.100.9".parse().unwrap();
    let outcome = updater.update(Some(ip)).await;

    assert_eq!(outcome.kind(), OutcomeKind::TransportError);
    assert_eq!(updater.state().status(), HostStatus::Failing);

    let events = notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, "transport-error");
    assert!(events[0].1.contains("198.51.100.9"), "{}", events[0].1);
}

#[tokio::test]
async fn failure_then_success_recovers() {
    let (url, server) =
        spawn_update_server(vec![(200, "nohost"), (200, "good 203.0.113.5")]).await;
    let notifier = Arc::new(RecordingNotifier::new());
    let mut updater =
        UpdateProtocol::new(dyndns2_family_profile(url), &basic_options(), notifier.clone())
            .unwrap();

    updater.update(Some(test_ip())).await;
    assert_eq!(updater.state().status(), HostStatus::Failing);
    assert_eq!(updater.state().fail_count(), 1);
    assert_eq!(updater.state().last_outcome(), Some(OutcomeKind::NoHost));

    let outcome = updater.update(Some(test_ip())).await;
    assert_eq!(outcome.kind(), OutcomeKind::Success);
    assert_eq!(updater.state().status(), HostStatus::Ok);
    assert_eq!(updater.state().fail_count(), 0);
    assert_eq!(updater.state().nochg_count(), 0);

    server.await.unwrap();
}
