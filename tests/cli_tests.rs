//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;

/// One recorded request: header block and body.
type Recorded = (String, String);

/// Serve canned JSON-RPC response bodies in order on a local port, recording
/// each request. The thread is left to die with the test process if the
/// client stops early.
fn spawn_rpc_server(responses: Vec<String>) -> (String, Arc<Mutex<Vec<Recorded>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let recorded: Arc<Mutex<Vec<Recorded>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&recorded);

    thread::spawn(move || {
        for response in responses {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream);

            let mut head = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
                if line == "\r\n" {
                    break;
                }
                if let Some(rest) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = rest.trim().parse().unwrap_or(0);
                }
                head.push_str(&line);
            }

            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).expect("request body");
            sink.lock()
                .expect("record lock")
                .push((head, String::from_utf8_lossy(&body).into_owned()));

            let mut stream = reader.into_inner();
            let reply = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                response.len(),
                response
            );
            let _ = stream.write_all(reply.as_bytes());
        }
    });

    (format!("http://{}", addr), recorded)
}

fn write_config(dir: &Path, endpoint: &str) {
    fs::write(
        dir.join("tagsync.toml"),
        format!(
            "api_endpoint = \"{}\"\nauth_token = \"test-token\"\ncsv_file_path = \"sites.csv\"\ntimeout_secs = 5\n",
            endpoint
        ),
    )
    .expect("write config");
}

fn write_csv_with_bom(dir: &Path, rows: &str) {
    let mut data = vec![0xef, 0xbb, 0xbf];
    data.extend_from_slice(b"groupname;site_country;site_name;site_id;park_id;technology\n");
    data.extend_from_slice(rows.as_bytes());
    fs::write(dir.join("sites.csv"), data).expect("write csv");
}

fn tagsync() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tagsync"));
    cmd.env_remove("TAGSYNC_AUTH_TOKEN");
    cmd
}

#[test]
fn test_cli_version() {
    let mut cmd = tagsync();
    cmd.arg("--version");
    cmd.assert().success().stdout(predicate::str::contains("tagsync"));
}

#[test]
fn test_cli_help() {
    let mut cmd = tagsync();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Batch-synchronize"))
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_sync_fails_without_config() {
    let tmp = TempDir::new().expect("tmp");
    let mut cmd = tagsync();
    cmd.arg("sync").current_dir(tmp.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no config file found"));
}

#[test]
fn test_check_reports_rows_and_groups() {
    let tmp = TempDir::new().expect("tmp");
    write_config(tmp.path(), "https://zabbix.example.com/api_jsonrpc.php");
    write_csv_with_bom(
        tmp.path(),
        "EU-Sites;France;Paris1;P001;PK9;5G\nDE-Sites;Germany;Berlin2;B002;PK3;4G\n",
    );

    let mut cmd = tagsync();
    cmd.arg("check").current_dir(tmp.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2 rows"))
        .stdout(predicate::str::contains("2 distinct groups"))
        .stdout(predicate::str::contains("EU-Sites"))
        .stdout(predicate::str::contains("DE-Sites"));
}

#[test]
fn test_check_rejects_csv_with_missing_column() {
    let tmp = TempDir::new().expect("tmp");
    write_config(tmp.path(), "https://zabbix.example.com/api_jsonrpc.php");
    fs::write(
        tmp.path().join("sites.csv"),
        "groupname;site_country;site_name\nEU-Sites;France;Paris1\n",
    )
    .expect("write csv");

    let mut cmd = tagsync();
    cmd.arg("check").current_dir(tmp.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid CSV file"));
}

#[test]
fn test_sync_updates_host_with_merged_tags() {
    let (endpoint, recorded) = spawn_rpc_server(vec![
        json!({"jsonrpc": "2.0", "result": [{"groupid": "12", "name": "EU-Sites"}], "id": 1})
            .to_string(),
        json!({"jsonrpc": "2.0", "result": [
            {"hostid": "55", "name": "host-55", "tags": [{"tag": "OWNER", "value": "ops"}]}
        ], "id": 1})
        .to_string(),
        json!({"jsonrpc": "2.0", "result": {"hostids": ["55"]}, "id": 1}).to_string(),
    ]);

    let tmp = TempDir::new().expect("tmp");
    write_config(tmp.path(), &endpoint);
    write_csv_with_bom(tmp.path(), "EU-Sites;France;Paris1;P001;PK9;5G\n");

    let mut cmd = tagsync();
    cmd.arg("sync").current_dir(tmp.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("hosts: 1 updated, 0 failed"));

    let requests = recorded.lock().expect("requests");
    assert_eq!(requests.len(), 3);

    // Bearer auth on every request
    assert!(requests[0].0.to_ascii_lowercase().contains("authorization: bearer test-token"));

    let lookup: serde_json::Value = serde_json::from_str(&requests[0].1).expect("lookup body");
    assert_eq!(lookup["method"], "hostgroup.get");
    assert_eq!(lookup["params"]["filter"]["name"], "EU-Sites");

    let list: serde_json::Value = serde_json::from_str(&requests[1].1).expect("list body");
    assert_eq!(list["method"], "host.get");
    assert_eq!(list["params"]["groupids"], "12");
    assert_eq!(list["params"]["selectTags"], json!(["tag", "value"]));

    let update: serde_json::Value = serde_json::from_str(&requests[2].1).expect("update body");
    assert_eq!(update["method"], "host.update");
    assert_eq!(update["params"]["hostid"], "55");
    assert_eq!(
        update["params"]["tags"],
        json!([
            {"tag": "OWNER", "value": "ops"},
            {"tag": "COUNTRY", "value": "France"},
            {"tag": "SITE_NAME", "value": "Paris1"},
            {"tag": "SITE_ID", "value": "P001"},
            {"tag": "PARKID", "value": "PK9"},
            {"tag": "TECHNOLOGY", "value": "5G"}
        ])
    );
}

#[test]
fn test_sync_skips_row_when_group_not_found() {
    let (endpoint, recorded) = spawn_rpc_server(vec![
        json!({"jsonrpc": "2.0", "result": [], "id": 1}).to_string(),
    ]);

    let tmp = TempDir::new().expect("tmp");
    write_config(tmp.path(), &endpoint);
    write_csv_with_bom(tmp.path(), "Ghost-Group;France;Paris1;P001;PK9;5G\n");

    let mut cmd = tagsync();
    cmd.arg("sync").current_dir(tmp.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("rows: 0 processed, 1 skipped, 0 failed"));

    // Only the group lookup went out; no host.get, no host.update.
    assert_eq!(recorded.lock().expect("requests").len(), 1);
}

#[test]
fn test_sync_dry_run_sends_no_update() {
    let (endpoint, recorded) = spawn_rpc_server(vec![
        json!({"jsonrpc": "2.0", "result": [{"groupid": "12", "name": "EU-Sites"}], "id": 1})
            .to_string(),
        json!({"jsonrpc": "2.0", "result": [{"hostid": "55", "tags": []}], "id": 1}).to_string(),
    ]);

    let tmp = TempDir::new().expect("tmp");
    write_config(tmp.path(), &endpoint);
    write_csv_with_bom(tmp.path(), "EU-Sites;France;Paris1;P001;PK9;5G\n");

    let mut cmd = tagsync();
    cmd.args(["sync", "--dry-run"]).current_dir(tmp.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("hosts: 1 updated, 0 failed"));

    let requests = recorded.lock().expect("requests");
    assert_eq!(requests.len(), 2, "dry run stops after host.get");
}

#[test]
fn test_sync_exits_zero_when_transport_fails() {
    // Grab a free port, then close the listener so connections are refused.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };

    let tmp = TempDir::new().expect("tmp");
    write_config(tmp.path(), &format!("http://127.0.0.1:{}", port));
    write_csv_with_bom(
        tmp.path(),
        "EU-Sites;France;Paris1;P001;PK9;5G\nDE-Sites;Germany;Berlin2;B002;PK3;4G\n",
    );

    let mut cmd = tagsync();
    cmd.arg("sync").current_dir(tmp.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("rows: 0 processed, 0 skipped, 2 failed"));
}
