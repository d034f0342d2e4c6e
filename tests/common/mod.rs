//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::io::Write;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tempfile::TempDir;
use testnet_cycler::blockchain::ChainClient;
use testnet_cycler::config::{AppConfig, ChainConfig};
use testnet_cycler::{Shutdown, TaskContext};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: String,
    /// Path including the query string.
    pub target: String,
    pub body: String,
}

impl MockRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }

    /// Value of a query parameter, if present.
    pub fn query(&self, key: &str) -> Option<String> {
        let query = self.target.split_once('?')?.1;
        query.split('&').find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            (k == key).then(|| v.to_string())
        })
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<MockRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body_end = (header_end + content_length).min(buf.len());
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();
    Some(MockRequest { method, target, body })
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        400 => "400 Bad Request",
        404 => "404 Not Found",
        429 => "429 Too Many Requests",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

/// Start a programmable mock backend on an ephemeral port.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(MockRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, body) = f(request).await;
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text(status),
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a simple mock backend that returns a fixed JSON body.
pub async fn start_mock_backend(status: u16, body: &'static str) -> SocketAddr {
    start_programmable_backend(move |_| async move { (status, body.to_string()) }).await
}

fn rpc_reply<H>(request: &MockRequest, handler: &H) -> String
where
    H: Fn(&str, &Value) -> Option<Value>,
{
    let call = request.json();
    let id = call.get("id").cloned().unwrap_or(json!(1));
    let method = call.get("method").and_then(Value::as_str).unwrap_or_default();
    let params = call.get("params").cloned().unwrap_or(Value::Null);

    let response = match handler(method, &params) {
        Some(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
        None => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": -32601, "message": format!("method {} not mocked", method)}
        }),
    };
    response.to_string()
}

/// Start a JSON-RPC node answering with `handler(method, params)`.
///
/// A `None` result is reported as a JSON-RPC error.
pub async fn start_rpc_node<H>(handler: H) -> SocketAddr
where
    H: Fn(&str, &Value) -> Option<Value> + Send + Sync + 'static,
{
    let handler = Arc::new(handler);
    start_programmable_backend(move |request| {
        let body = rpc_reply(&request, handler.as_ref());
        async move { (200, body) }
    })
    .await
}

/// A node on chain 31337 where every address holds 1 MON.
pub async fn start_funded_node() -> SocketAddr {
    start_rpc_node(|method, _| match method {
        "eth_chainId" => Some(json!("0x7a69")),
        "eth_blockNumber" => Some(json!("0x10")),
        "eth_getBalance" => Some(json!("0xde0b6b3a7640000")),
        _ => None,
    })
    .await
}

/// A node that accepts signed transactions and mines them at once.
pub struct ChainNode {
    pub addr: SocketAddr,
    /// Raw transactions in submission order.
    pub sent: Arc<Mutex<Vec<String>>>,
}

impl ChainNode {
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

fn receipt(hash: &Value) -> Value {
    json!({
        "transactionHash": hash,
        "transactionIndex": "0x0",
        "blockHash": word(0x11),
        "blockNumber": "0x11",
        "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
        "to": "0x70997970c51812dc3a010c7d01b50e0d17dc79c8",
        "cumulativeGasUsed": "0x5208",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "contractAddress": null,
        "logs": [],
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "type": "0x2",
        "status": "0x1"
    })
}

fn word(n: u64) -> String {
    format!("0x{:064x}", n)
}

fn latest_block() -> Value {
    json!({
        "hash": word(0x11),
        "parentHash": word(0x10),
        "sha3Uncles": "0x1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347",
        "miner": "0x0000000000000000000000000000000000000000",
        "stateRoot": word(0),
        "transactionsRoot": "0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421",
        "receiptsRoot": "0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421",
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "difficulty": "0x0",
        "number": "0x11",
        "gasLimit": "0x1c9c380",
        "gasUsed": "0x0",
        "timestamp": "0x6553f100",
        "extraData": "0x",
        "mixHash": word(0),
        "nonce": "0x0000000000000000",
        "baseFeePerGas": "0x3b9aca00",
        "size": "0x220",
        "uncles": [],
        "transactions": []
    })
}

fn chain_result(method: &str, params: &Value, sent: &Mutex<Vec<String>>) -> Option<Value> {
    match method {
        "eth_chainId" => Some(json!("0x7a69")),
        "eth_blockNumber" => Some(json!("0x11")),
        "eth_getBalance" => Some(json!("0xde0b6b3a7640000")),
        "eth_getTransactionCount" => Some(json!("0x0")),
        "eth_gasPrice" | "eth_maxPriorityFeePerGas" => Some(json!("0x3b9aca00")),
        "eth_estimateGas" => Some(json!("0x5208")),
        "eth_feeHistory" => Some(json!({
            "oldestBlock": "0x10",
            "baseFeePerGas": ["0x3b9aca00", "0x3b9aca00"],
            "gasUsedRatio": [0.5],
            "reward": [["0x3b9aca00"]]
        })),
        "eth_sendRawTransaction" => {
            let raw = params[0].as_str().unwrap_or_default().to_string();
            let mut sent = sent.lock().unwrap();
            sent.push(raw);
            Some(json!(word(sent.len() as u64)))
        }
        "eth_getTransactionReceipt" => Some(receipt(&params[0])),
        "eth_getBlockByNumber" => Some(latest_block()),
        _ => None,
    }
}

pub async fn start_chain_node() -> ChainNode {
    start_flaky_chain_node(0).await
}

/// Chain node whose first `outages` transaction submissions get HTTP 503.
pub async fn start_flaky_chain_node(outages: usize) -> ChainNode {
    let sent: Arc<Mutex<Vec<String>>> = Arc::default();
    let recorder = sent.clone();
    let remaining = Arc::new(Mutex::new(outages));

    let addr = start_programmable_backend(move |request| {
        let is_send = request.json()["method"] == "eth_sendRawTransaction";
        let outage = is_send && {
            let mut remaining = remaining.lock().unwrap();
            let down = *remaining > 0;
            *remaining = remaining.saturating_sub(1);
            down
        };
        let reply = if outage {
            (503, "service unavailable".to_string())
        } else {
            let body = rpc_reply(&request, &|method: &str, params: &Value| {
                chain_result(method, params, &recorder)
            });
            (200, body)
        };
        async move { reply }
    })
    .await;

    ChainNode { addr, sent }
}

pub fn http_url(addr: SocketAddr) -> String {
    format!("http://{}", addr)
}

/// Anvil's first three development keys.
pub const TEST_KEYS: [&str; 3] = [
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    "5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
];

/// A task context over scratch files; keeps the directory alive.
pub struct Fixture {
    _dir: TempDir,
    pub ctx: TaskContext,
}

fn write_keys(dir: &TempDir, keys: &[&str]) -> String {
    let path = dir.path().join("private_keys.txt");
    let mut file = std::fs::File::create(&path).unwrap();
    for key in keys {
        writeln!(file, "{}", key).unwrap();
        // Blank lines are ignored
        writeln!(file).unwrap();
    }
    path.to_string_lossy().to_string()
}

/// Context with zero delays whose primary RPC is dead and `rpc_url` is the failover.
pub async fn fixture_with(
    rpc_url: String,
    keys: &[&str],
    configure: impl FnOnce(&mut AppConfig),
) -> Fixture {
    let dir = TempDir::new().unwrap();

    let mut config = AppConfig::default();
    config.chain = ChainConfig {
        rpc_url: "http://127.0.0.1:1".to_string(),
        failover_urls: vec![rpc_url],
        chain_id: 31337,
        rpc_timeout_secs: 2,
        receipt_timeout_secs: 10,
        ..ChainConfig::default()
    };
    config.files.private_keys = write_keys(&dir, keys);
    config.files.faucet_status = dir.path().join("faucet_status.json").to_string_lossy().to_string();
    config.delays.cycle_min_secs = 0;
    config.delays.cycle_max_secs = 0;
    config.delays.account_switch_secs = 0;
    config.delays.task_gap_secs = 0;
    config.delays.claim_wait_secs = 0;
    config.retries.delay_ms = 0;
    configure(&mut config);

    let client = ChainClient::new(config.chain.clone()).await.unwrap();
    let ctx = TaskContext::new(Arc::new(config), client, Shutdown::new()).unwrap();
    Fixture { _dir: dir, ctx }
}
