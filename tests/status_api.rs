//! Status API served by a running supervisor.

mod common;

use std::net::SocketAddr;
use std::time::Duration;

use prober::config::{ProbeConfig, ProbeKind, ProberConfig};
use prober::lifecycle::StartupError;
use prober::Supervisor;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

fn tcp_probe(name: &str, target: SocketAddr) -> ProbeConfig {
    ProbeConfig {
        name: name.to_string(),
        description: String::new(),
        kind: ProbeKind::Tcp,
        target: target.to_string(),
        method: "GET".to_string(),
        expect_status: 200,
        expect_body: None,
        interval_secs: Some(1),
        timeout_secs: None,
        failure_penalty: None,
        success_reward: None,
    }
}

struct Running {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    task: JoinHandle<Result<(), StartupError>>,
}

async fn start(config: ProberConfig) -> Running {
    let supervisor = Supervisor::bind(&config).await.unwrap();
    let addr = supervisor.admin_addr().unwrap();
    let (stop, rx) = oneshot::channel::<()>();
    let task = tokio::spawn(supervisor.run(async move {
        let _ = rx.await;
    }));
    Running { addr, stop, task }
}

fn base_config(dir: &tempfile::TempDir) -> ProberConfig {
    let mut config = ProberConfig::default();
    config.record_log.path = dir.path().join("outcomes.log");
    config.admin.bind_address = "127.0.0.1:0".to_string();
    config
}

async fn get(client: &reqwest::Client, url: String) -> (u16, Value) {
    let res = client.get(url).send().await.unwrap();
    let status = res.status().as_u16();
    let body = res.json().await.unwrap_or(Value::Null);
    (status, body)
}

/// Poll until `name` has completed at least one run.
async fn wait_for_run(client: &reqwest::Client, addr: SocketAddr, name: &str) -> Value {
    for _ in 0..100 {
        let (_, body) = get(client, format!("http://{addr}/probes/{name}")).await;
        if body["runs"].as_u64().unwrap_or(0) > 0 {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("probe {name} never ran");
}

#[tokio::test]
async fn test_status_endpoints() {
    let live = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let live_addr = live.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((socket, _)) = live.accept().await {
            drop(socket);
        }
    });

    let dir = tempfile::tempdir().unwrap();
    let mut config = base_config(&dir);
    config.probes.push(tcp_probe("db", live_addr));
    config.probes.push(tcp_probe("cache", common::closed_addr()));
    config.probes.push(tcp_probe("legacy", live_addr));
    config.selection.disabled = vec!["legacy".to_string()];

    let running = start(config).await;
    let client = reqwest::Client::new();
    let addr = running.addr;

    let db = wait_for_run(&client, addr, "db").await;
    assert_eq!(db["badness"], 0);
    assert_eq!(db["records"][0]["passed"], true);

    let cache = wait_for_run(&client, addr, "cache").await;
    assert_eq!(cache["badness"], 10);
    assert_eq!(cache["records"][0]["passed"], false);
    assert_eq!(cache["recent_failures"].as_array().unwrap().len(), 1);

    let (status, probes) = get(&client, format!("http://{addr}/probes")).await;
    assert_eq!(status, 200);
    let names: Vec<_> = probes
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["cache", "db", "legacy"]);

    let (status, summary) = get(&client, format!("http://{addr}/status")).await;
    assert_eq!(status, 200);
    assert_eq!(summary["status"], "ok");
    assert_eq!(summary["probes"], 3);
    assert_eq!(summary["disabled"], 1);

    let (status, _) = get(&client, format!("http://{addr}/probes/missing")).await;
    assert_eq!(status, 404);

    running.stop.send(()).unwrap();
    running.task.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_api_key_required_when_configured() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = base_config(&dir);
    config.admin.api_key = "s3cret".to_string();

    let running = start(config).await;
    let client = reqwest::Client::new();
    let url = format!("http://{}/status", running.addr);

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status().as_u16(), 401);

    let res = client.get(&url).bearer_auth("wrong").send().await.unwrap();
    assert_eq!(res.status().as_u16(), 401);

    let res = client.get(&url).bearer_auth("s3cret").send().await.unwrap();
    assert_eq!(res.status().as_u16(), 200);

    running.stop.send(()).unwrap();
    running.task.await.unwrap().unwrap();
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_record_log_write_failure_stops_process() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = base_config(&dir);
    // Every write to /dev/full fails with ENOSPC.
    config.record_log.path = "/dev/full".into();
    config.admin.enabled = false;
    config.probes.push(tcp_probe("db", common::closed_addr()));

    let supervisor = Supervisor::bind(&config).await.unwrap();
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        supervisor.run(std::future::pending::<()>()),
    )
    .await
    .unwrap();

    assert!(matches!(result, Err(StartupError::Runner(_))));
}
