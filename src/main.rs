//! Order Swap - demo binary
//!
//! Deploys a ledger from `ORDER_SWAP_*` environment variables (see
//! `order_swap::config`), then runs one order through creation and
//! confirmation against two in-memory 18-decimal tokens.

use anyhow::{anyhow, Context};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use order_swap::types::units::{from_base_units_trimmed, to_base_units, DEFAULT_DECIMALS};
use order_swap::types::bps;
use order_swap::{AccountId, AssetId, AssetRegistry, InMemoryToken, LedgerConfig, OrderLedger};

const DEPOSITOR: AccountId = 2;
const CONFIRMER: AccountId = 3;
const GUZ: AssetId = 1;
const W3B: AssetId = 2;

fn units(s: &str) -> anyhow::Result<u128> {
    to_base_units(s, DEFAULT_DECIMALS).ok_or_else(|| anyhow!("invalid amount: {s}"))
}

fn human(value: u128) -> String {
    from_base_units_trimmed(value, DEFAULT_DECIMALS).unwrap_or_else(|| value.to_string())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_swap=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = match LedgerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "no usable ORDER_SWAP_* environment, using demo defaults");
            LedgerConfig::new(1, 1_000).with_vault_account(1_000)
        }
    };
    let vault = config.vault_account;

    let guz = InMemoryToken::with_supply("GuzToken", "GUZ", DEFAULT_DECIMALS, DEPOSITOR, units("1000")?);
    let w3b = InMemoryToken::with_supply("Web3Bridge", "W3B", DEFAULT_DECIMALS, CONFIRMER, units("1000")?);
    let assets = AssetRegistry::new().with_asset(GUZ, guz).with_asset(W3B, w3b);

    let mut ledger = OrderLedger::new(config, assets).context("deploy ledger")?;
    info!(
        owner = ledger.owner(),
        fee_percent = %bps::to_percent(ledger.fee_percentage()),
        "ledger ready"
    );

    let deposit = units("100")?;
    let desired = units("10")?;

    ledger.assets_mut().approve(GUZ, DEPOSITOR, vault, deposit)?;
    let order_id = ledger
        .create_order(DEPOSITOR, GUZ, deposit, W3B, desired, 500)
        .context("create order")?;

    ledger.assets_mut().approve(W3B, CONFIRMER, vault, desired)?;
    let receipt = ledger
        .confirm_order(CONFIRMER, order_id)
        .context("confirm order")?;

    info!(
        order_id,
        payout = %human(receipt.payout),
        fee = %human(receipt.fee),
        delivered = %human(receipt.delivered),
        digest = %receipt.digest_hex().context("receipt digest")?,
        "settled"
    );

    let assets = ledger.assets();
    for (account, label) in [(DEPOSITOR, "depositor"), (CONFIRMER, "confirmer"), (ledger.owner(), "owner")] {
        info!(
            account = label,
            guz = %human(assets.balance_of(GUZ, account)?),
            w3b = %human(assets.balance_of(W3B, account)?),
            "balance"
        );
    }

    for event in ledger.events() {
        let bytes = event.encode().context("encode event")?;
        info!(
            tag = event.tag(),
            order_id = ?event.order_id(),
            encoded = %hex::encode(bytes),
            "event"
        );
    }
    let root = ledger.state_root_hex().context("state root")?;
    info!(state_root = %root, "final state");
    Ok(())
}
