//! End-to-end checks against a stand-in `torero` shell script.
//!
//! Everything runs inside one test function: writing an executable and then
//! spawning it while another test thread forks can fail with ETXTBSY.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use torero_api::{ToreroConfig, ToreroError, ToreroExecutor, UNKNOWN_VERSION};

const FAKE_TORERO: &str = r#"#!/bin/sh
case "$1 $2" in
  "version ")
    echo "torero version 1.3.1"
    ;;
  "get services")
    echo '[{"name":"svc1","type":"python"},{"name":"svc2","type":"ansible"}]'
    ;;
  "get decorators")
    echo '[]'
    ;;
  "get repositories")
    echo 'this is not json'
    ;;
  "get secrets")
    echo 'secret store locked' >&2
    exit 3
    ;;
  *)
    exit 64
    ;;
esac
"#;

const SLOW_TORERO: &str = "#!/bin/sh\nexec sleep 10\n";

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn config_for(binary: &Path, timeout_secs: u64) -> ToreroConfig {
    ToreroConfig {
        binary: binary.to_string_lossy().into_owned(),
        probe_timeout_secs: timeout_secs,
        fetch_timeout_secs: timeout_secs,
    }
}

#[tokio::test]
async fn test_executor_against_fake_torero_script() {
    let dir = tempfile::tempdir().unwrap();
    let fake = write_script(dir.path(), "torero", FAKE_TORERO);
    let slow = write_script(dir.path(), "torero-slow", SLOW_TORERO);

    let exec = ToreroExecutor::new(&config_for(&fake, 10));

    // availability + version
    let status = exec.probe().await;
    assert!(status.available, "probe failed: {}", status.message);
    assert_eq!(status.version, "1.3.1");
    assert_eq!(exec.version().await, "1.3.1");
    assert!(exec.check_available().await.available);

    // services: two records, in order
    let services = exec.get_services().await.unwrap();
    let names: Vec<&str> = services.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["svc1", "svc2"]);
    let svc2 = exec.get_service_by_name("svc2").await.unwrap().unwrap();
    assert_eq!(svc2.service_type, "ansible");
    assert!(exec.get_service_by_name("svc3").await.unwrap().is_none());

    // decorators: empty collection
    assert!(exec.get_decorators().await.unwrap().is_empty());

    // repositories: garbage on stdout
    assert!(matches!(
        exec.get_repositories().await,
        Err(ToreroError::Parse(_))
    ));

    // secrets: non-zero exit carries stderr
    match exec.get_secrets().await {
        Err(ToreroError::Execution {
            message, exit_code, ..
        }) => {
            assert_eq!(message, "secret store locked");
            assert_eq!(exit_code, Some(3));
        }
        other => panic!("expected execution error, got {:?}", other),
    }

    // a binary that never answers is killed at the deadline
    let slow_exec = ToreroExecutor::new(&config_for(&slow, 1));
    let start = Instant::now();
    assert!(matches!(
        slow_exec.get_services().await,
        Err(ToreroError::Timeout { timeout_secs: 1, .. })
    ));
    assert!(start.elapsed() < Duration::from_secs(5));

    let status = slow_exec.probe().await;
    assert!(!status.available);
    assert_eq!(status.message, "torero command timed out");
    assert_eq!(slow_exec.version().await, UNKNOWN_VERSION);

    // a binary that doesn't exist is reported without spawning
    let missing = ToreroExecutor::new(&config_for(&dir.path().join("nope"), 1));
    let availability = missing.check_available().await;
    assert!(!availability.available);
    assert_eq!(availability.message, "torero executable not found in PATH");
    assert_eq!(missing.version().await, UNKNOWN_VERSION);
}
