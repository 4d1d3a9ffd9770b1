//! Koruna demo bank walkthrough.
//!
//! Seeds a small in-memory bank, pulls the daily CNB rates (falling back
//! to fixed quotes when offline), and runs a scripted session: deposits,
//! an overdraft withdrawal, transfers along both funding paths, and the
//! transaction history at the end.
//!
//! Usage: cargo run --bin koruna

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal_macros::dec;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use koruna_core::currency::ExchangeRate;
use koruna_shared::AppConfig;
use koruna_shared::types::{BankAccountId, CurrencyCode, Money};
use koruna_store::{AccountStore, BankService, Ledger, RateTable};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "koruna=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");
    let base = CurrencyCode::new(&config.bank.base_currency)?;
    let eur = CurrencyCode::new("EUR")?;
    let usd = CurrencyCode::new("USD")?;

    let rates = Arc::new(RateTable::new(
        base,
        config.rates.feed_url.clone(),
        Duration::from_secs(config.rates.http_timeout_secs),
    )?);
    let bank = BankService::new(
        Arc::new(AccountStore::new()),
        Arc::new(Ledger::new()),
        Arc::clone(&rates),
    );

    // Pull today's rates; the demo still works offline.
    match bank.refresh_rates().await {
        Ok(count) => info!(count, "loaded daily rates from the CNB feed"),
        Err(e) => {
            warn!(code = e.error_code(), error = %e, "rate feed unavailable, using fixed quotes");
            seed_fallback_rates(&rates).await;
        }
    }

    let quotes = bank.exchange_rates().await;
    println!("== Exchange rates ({} currencies, base {base}) ==", quotes.len());
    for rate in quotes.iter().filter(|rate| rate.currency != base).take(6) {
        println!("  1 {} = {} {base}", rate.currency, rate.rate);
    }
    let converted = bank.convert(Money::new(dec!(100.00), eur), usd).await?;
    println!("  100.00 EUR converts to {converted}");

    println!("\n== Opening accounts ==");
    let store = bank.accounts();
    let alena = store.register_user("alena", "alena@example.cz").await?;
    let alena_czk = store.open_account(alena.id, base).await?;
    let alena_eur = store.open_account(alena.id, eur).await?;
    let bedrich = store.register_user("bedrich", "bedrich@example.cz").await?;
    let bedrich_eur = store.open_account(bedrich.id, eur).await?;
    let bedrich_usd = store.open_account(bedrich.id, usd).await?;
    println!("  alena:   {} ({base}, primary), {} (EUR)", alena_czk.number, alena_eur.number);
    println!("  bedrich: {} (EUR, primary), {} (USD)", bedrich_eur.number, bedrich_usd.number);

    println!("\n== Deposits ==");
    bank.deposit(alena_czk.id, Money::new(dec!(2500.00), base)).await?;
    bank.deposit(alena_eur.id, Money::new(dec!(150.00), eur)).await?;
    bank.deposit(bedrich_usd.id, Money::new(dec!(100.00), usd)).await?;
    show_balance(&bank, "alena", alena_czk.id).await?;
    show_balance(&bank, "alena", alena_eur.id).await?;
    show_balance(&bank, "bedrich", bedrich_usd.id).await?;

    println!("\n== Overdraft withdrawal ==");
    // Balance 100.00: the limit is 110.00, so 111.00 is refused outright.
    if let Err(e) = bank
        .withdraw(bedrich_usd.id, Money::new(dec!(111.00), usd))
        .await
    {
        println!("  111.00 USD against 100.00: refused ({})", e.error_code());
    }
    let record = bank
        .withdraw(bedrich_usd.id, Money::new(dec!(110.00), usd))
        .await?;
    println!(
        "  110.00 USD against 100.00: allowed, overdraft fee {}",
        record.overdraft_fee
    );
    show_balance(&bank, "bedrich", bedrich_usd.id).await?;

    println!("\n== Transfers ==");
    // The EUR account holds 150, so it funds this one outright.
    let record = bank
        .transfer(alena.id, &bedrich_eur.number, Money::new(dec!(100.00), eur))
        .await?;
    println!(
        "  100.00 EUR to bedrich: funded from the matching EUR account, fee {}",
        record.overdraft_fee
    );

    // Only 50 EUR left, so the CZK primary converts and covers this one.
    let record = bank
        .transfer(alena.id, &bedrich_eur.number, Money::new(dec!(100.00), eur))
        .await?;
    println!(
        "  100.00 EUR more: funded from the {base} primary, fee {}",
        record.overdraft_fee
    );

    // Cross-currency destination: bedrich's USD account is credited in USD,
    // pulling it back up from the overdraft.
    bank.transfer(alena.id, &bedrich_usd.number, Money::new(dec!(10.00), eur))
        .await?;
    println!("  10.00 EUR to bedrich's USD account, credited after conversion");
    show_balance(&bank, "alena", alena_czk.id).await?;
    show_balance(&bank, "alena", alena_eur.id).await?;
    show_balance(&bank, "bedrich", bedrich_eur.id).await?;
    show_balance(&bank, "bedrich", bedrich_usd.id).await?;

    println!("\n== Recent activity (alena's {base} account) ==");
    for record in bank.recent_activity(alena_czk.id, 10).await {
        println!("  {}", serde_json::to_string(&record)?);
    }

    println!("\n== Recent activity (bedrich's USD account) ==");
    for record in bank.recent_activity(bedrich_usd.id, 10).await {
        println!("  {}", serde_json::to_string(&record)?);
    }

    Ok(())
}

/// Fixed quotes for running the walkthrough without network access.
async fn seed_fallback_rates(rates: &RateTable) {
    let quotes = [
        ("EUR", dec!(24.50)),
        ("USD", dec!(22.80)),
        ("GBP", dec!(28.95)),
    ];
    for (currency, quote) in quotes {
        let code = CurrencyCode::new(currency).expect("fallback code is valid");
        let rate = ExchangeRate::new(code, quote, Utc::now()).expect("fallback rate is positive");
        rates.upsert(rate).await;
    }
}

async fn show_balance(
    bank: &BankService,
    owner: &str,
    account: BankAccountId,
) -> anyhow::Result<()> {
    let account = bank.accounts().account(account).await?;
    println!("  {owner}: {} {} ({})", account.balance, account.currency, account.number);
    Ok(())
}
