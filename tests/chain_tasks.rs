//! Task flows against a mock node that mines every transaction.

mod common;

use std::collections::HashMap;
use std::sync::Mutex;

use alloy::consensus::{Transaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{address, Bytes, U256};
use common::{
    fixture_with, http_url, start_chain_node, start_flaky_chain_node, start_mock_backend, Fixture, TEST_KEYS,
};
use testnet_cycler::blockchain::units::parse_amount;
use testnet_cycler::blockchain::wallet::MAIN_KEY_ENV_VAR;
use testnet_cycler::blockchain::{Wallet, WalletEntry};
use testnet_cycler::runner::{Account, Task, TaskError, TaskResult};
use testnet_cycler::tasks::pair_cycle::{run_pair_cycle, PairRouter};
use testnet_cycler::tasks::tokens::{Token, MON, WMON};
use testnet_cycler::tasks::monorail::{self, Monorail};
use testnet_cycler::tasks::{run_send, StakeProtocol, StakeTask};
use testnet_cycler::TaskContext;

const TKA: Token = Token::erc20("TKA", address!("00000000000000000000000000000000000000a1"), 18);
const TKB: Token = Token::erc20("TKB", address!("00000000000000000000000000000000000000b2"), 18);

static MON_TKA: [Token; 2] = [MON, TKA];
static MON_TKA_TKB: [Token; 3] = [MON, TKA, TKB];

type Swap = (&'static str, &'static str, U256);

/// Router with fixed balances that fails chosen swap calls.
struct ScriptedRouter {
    tokens: &'static [Token],
    balances: HashMap<&'static str, U256>,
    /// Symbol whose balance lookup errors.
    unreadable: Option<&'static str>,
    /// 1-based swap calls that fail.
    failing_calls: Vec<usize>,
    swaps: Mutex<Vec<Swap>>,
}

impl ScriptedRouter {
    fn new(tokens: &'static [Token]) -> Self {
        let one = parse_amount("1", 18).unwrap();
        Self {
            tokens,
            balances: tokens.iter().map(|t| (t.symbol, one)).collect(),
            unreadable: None,
            failing_calls: Vec::new(),
            swaps: Mutex::new(Vec::new()),
        }
    }

    fn swaps(&self) -> Vec<Swap> {
        self.swaps.lock().unwrap().clone()
    }
}

impl PairRouter for ScriptedRouter {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn tokens(&self) -> &'static [Token] {
        self.tokens
    }

    async fn balance(&self, _ctx: &TaskContext, _account: &Account, token: &Token) -> TaskResult<U256> {
        if self.unreadable == Some(token.symbol) {
            return Err(TaskError::Skipped("balance unavailable".to_string()));
        }
        Ok(self.balances.get(token.symbol).copied().unwrap_or_default())
    }

    async fn swap(
        &self,
        _ctx: &TaskContext,
        _account: &Account,
        from: &Token,
        to: &Token,
        amount: U256,
    ) -> TaskResult<()> {
        let mut swaps = self.swaps.lock().unwrap();
        swaps.push((from.symbol, to.symbol, amount));
        if self.failing_calls.contains(&swaps.len()) {
            return Err(TaskError::Skipped("route unavailable".to_string()));
        }
        Ok(())
    }
}

async fn account(f: &Fixture, key: &str) -> Account {
    let entry = WalletEntry {
        id: 1,
        wallet: Wallet::from_private_key(key, 31337).unwrap(),
    };
    f.ctx.connect(&entry).await.unwrap()
}

async fn pair_fixture() -> (Fixture, Account) {
    let node = start_chain_node().await;
    let f = fixture_with(http_url(node.addr), &TEST_KEYS[..1], |_| {}).await;
    let account = account(&f, TEST_KEYS[0]).await;
    (f, account)
}

#[tokio::test]
async fn test_failed_reverse_swap_still_completes_cycle() {
    let (f, account) = pair_fixture().await;
    let mut router = ScriptedRouter::new(&MON_TKA);
    router.failing_calls = vec![2];

    run_pair_cycle(&router, &f.ctx, &account).await.unwrap();

    let swaps = router.swaps();
    assert_eq!(swaps.len(), 2);
    assert_eq!((swaps[1].0, swaps[1].1), (swaps[0].1, swaps[0].0));
}

#[tokio::test]
async fn test_failed_first_swap_retries_pair_without_source_token() {
    let (f, account) = pair_fixture().await;
    let mut router = ScriptedRouter::new(&MON_TKA_TKB);
    router.failing_calls = vec![1];

    run_pair_cycle(&router, &f.ctx, &account).await.unwrap();

    let swaps = router.swaps();
    assert_eq!(swaps.len(), 2);
    let excluded = swaps[0].0;
    assert_ne!(swaps[1].0, excluded);
    assert_ne!(swaps[1].1, excluded);
}

#[tokio::test]
async fn test_empty_token_is_bought_with_mon() {
    let (f, account) = pair_fixture().await;
    let mut router = ScriptedRouter::new(&MON_TKA);
    router.balances.insert("TKA", U256::ZERO);

    run_pair_cycle(&router, &f.ctx, &account).await.unwrap();

    let swaps = router.swaps();
    assert_eq!(swaps.len(), 3);
    let buys: Vec<&Swap> = swaps.iter().filter(|s| s.0 == "MON" && s.1 == "TKA").collect();
    assert_eq!(buys.len(), 2);
    // 1-5% of the 1 MON balance
    let (lo, hi) = (parse_amount("0.01", 18).unwrap(), parse_amount("0.05", 18).unwrap());
    assert!(buys.iter().all(|s| s.2 >= lo && s.2 <= hi));
}

#[tokio::test]
async fn test_unreadable_balance_counts_as_empty() {
    let (f, account) = pair_fixture().await;
    let mut router = ScriptedRouter::new(&MON_TKA);
    router.unreadable = Some("TKA");

    run_pair_cycle(&router, &f.ctx, &account).await.unwrap();

    let swaps = router.swaps();
    assert_eq!(swaps.len(), 3);
    assert_eq!(swaps.iter().filter(|s| s.0 == "MON" && s.1 == "TKA").count(), 2);
}

#[tokio::test]
async fn test_apriori_cycle_skips_claim_when_api_errors() {
    let node = start_chain_node().await;
    let api = start_mock_backend(500, r#"{"error":"unavailable"}"#).await;
    let f = fixture_with(http_url(node.addr), &TEST_KEYS[..1], |config| {
        config.apis.apriori_api_url = http_url(api);
    })
    .await;
    let account = account(&f, TEST_KEYS[0]).await;

    StakeTask::new(StakeProtocol::Apriori)
        .run_cycle(&f.ctx, &account, 1, 1)
        .await
        .unwrap();

    // deposit and redeem request only
    assert_eq!(node.sent_count(), 2);
}

#[tokio::test]
async fn test_apriori_cycle_claims_ready_request() {
    let node = start_chain_node().await;
    let api = start_mock_backend(
        200,
        r#"[{"id": 5, "claimed": false, "is_claimable": true}]"#,
    )
    .await;
    let f = fixture_with(http_url(node.addr), &TEST_KEYS[..1], |config| {
        config.apis.apriori_api_url = http_url(api);
    })
    .await;
    let account = account(&f, TEST_KEYS[0]).await;

    StakeTask::new(StakeProtocol::Apriori)
        .run_cycle(&f.ctx, &account, 1, 1)
        .await
        .unwrap();

    assert_eq!(node.sent_count(), 3);
}

#[tokio::test]
async fn test_send_skips_main_wallet() {
    let node = start_chain_node().await;
    let f = fixture_with(http_url(node.addr), &TEST_KEYS, |_| {}).await;
    std::env::set_var(MAIN_KEY_ENV_VAR, TEST_KEYS[0]);

    let summary = run_send(&f.ctx).await.unwrap();

    assert_eq!(summary.accounts, 2);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(node.sent_count(), 2);
}

#[tokio::test]
async fn test_monorail_native_swap_pays_swap_amount() {
    let node = start_chain_node().await;
    // The quoted value deliberately differs from the swap amount
    let pathfinder = start_mock_backend(
        200,
        r#"{"quote":{"transaction":{"to":"0xC995498c22a012353FAE7eCC701810D673E25794","data":"0xabcdef01","value":"0x1"}}}"#,
    )
    .await;
    let f = fixture_with(http_url(node.addr), &TEST_KEYS[..1], |config| {
        config.apis.pathfinder_url = http_url(pathfinder);
    })
    .await;
    let account = account(&f, TEST_KEYS[0]).await;
    let usdc = monorail::TOKENS[2];
    let amount = parse_amount("0.02", 18).unwrap();

    Monorail.swap(&f.ctx, &account, &MON, &usdc, amount).await.unwrap();

    let raw: Bytes = node.sent.lock().unwrap()[0].parse().unwrap();
    let tx = TxEnvelope::decode_2718(&mut raw.as_ref()).unwrap();
    assert_eq!(tx.value(), amount);
    assert_eq!(tx.to(), Some(monorail::MONORAIL_ROUTER));
    assert_eq!(tx.gas_limit(), 500_000);
}

#[tokio::test]
async fn test_monorail_wrap_retries_server_error() {
    let node = start_flaky_chain_node(1).await;
    let f = fixture_with(http_url(node.addr), &TEST_KEYS[..1], |_| {}).await;
    let account = account(&f, TEST_KEYS[0]).await;
    let amount = parse_amount("0.01", 18).unwrap();

    Monorail.swap(&f.ctx, &account, &MON, &WMON, amount).await.unwrap();

    assert_eq!(node.sent_count(), 1);
    let raw: Bytes = node.sent.lock().unwrap()[0].parse().unwrap();
    let tx = TxEnvelope::decode_2718(&mut raw.as_ref()).unwrap();
    assert_eq!(tx.to(), WMON.address);
    assert_eq!(tx.value(), amount);
}
