use colored::Colorize;
use serde::Serialize;

use crate::api::{Account, Bank, PaymentCreated, SessionStatus, Transaction};
use crate::auth::TokenPair;
use crate::error::NeoError;
use crate::sca::{Consent, Sca};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Pretty,
    Json,
}

impl OutputMode {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Pretty
        }
    }
}

/// Print any response as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn heading(text: &str, is_tty: bool) -> String {
    if is_tty {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn dim(text: &str, is_tty: bool) -> String {
    if is_tty {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}

pub fn format_bank(bank: &Bank, is_tty: bool) -> String {
    let mut line = format!(
        "{}  {} ({})",
        bank.id,
        heading(&bank.bank_display_name, is_tty),
        bank.country_code
    );
    if bank.identification_required {
        line.push_str(&format!("  {}", dim("[PSU id required]", is_tty)));
    }
    line
}

pub fn format_account(account: &Account, is_tty: bool) -> String {
    let number = [&account.iban, &account.bban, &account.sort_code_account_number]
        .into_iter()
        .find(|n| !n.is_empty())
        .map(String::as_str)
        .unwrap_or("-");
    let name = if account.display_name.is_empty() {
        &account.account_name
    } else {
        &account.display_name
    };
    let mut out = format!("{}  {}  {}", account.id, number, heading(name, is_tty));
    for balance in &account.balances {
        out.push_str(&format!(
            "\n    {} {} {}",
            dim(&balance.r#type, is_tty),
            balance.amount,
            balance.currency
        ));
    }
    out
}

pub fn format_transaction(tx: &Transaction, is_tty: bool) -> String {
    let date = tx
        .booking_date
        .or(tx.value_date)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".into());
    let (amount, currency) = tx
        .transaction_amount
        .as_ref()
        .map(|m| (m.value.as_str(), m.currency.as_str()))
        .unwrap_or(("", ""));
    let amount = match (tx.credit_debit_indicator.as_str(), is_tty) {
        ("DBIT", true) => format!("-{amount}").red().to_string(),
        ("DBIT", false) => format!("-{amount}"),
        (_, true) => amount.green().to_string(),
        _ => amount.to_string(),
    };
    format!(
        "{date}  {amount} {currency}  {}",
        if tx.counterparty_name.is_empty() {
            &tx.transaction_reference
        } else {
            &tx.counterparty_name
        }
    )
}

pub fn print_banks(banks: &[Bank], mode: OutputMode, is_tty: bool) {
    match mode {
        OutputMode::Json => print_json(&banks),
        OutputMode::Pretty => {
            if banks.is_empty() {
                println!("No available banks.");
            }
            for bank in banks {
                println!("{}", format_bank(bank, is_tty));
            }
        }
    }
}

pub fn print_accounts(accounts: &[Account], mode: OutputMode, is_tty: bool) {
    match mode {
        OutputMode::Json => print_json(&accounts),
        OutputMode::Pretty => {
            for account in accounts {
                println!("{}", format_account(account, is_tty));
            }
        }
    }
}

pub fn print_transactions(txs: &[Transaction], mode: OutputMode, is_tty: bool) {
    match mode {
        OutputMode::Json => print_json(&txs),
        OutputMode::Pretty => {
            if txs.is_empty() {
                println!("No transactions.");
            }
            for tx in txs {
                println!("{}", format_transaction(tx, is_tty));
            }
        }
    }
}

pub fn print_session_status(status: &SessionStatus, mode: OutputMode, is_tty: bool) {
    match mode {
        OutputMode::Json => print_json(status),
        OutputMode::Pretty => {
            println!("{}", heading(&status.bank_name, is_tty));
            println!("  bank:     {}", status.bank_id);
            println!("  created:  {}", status.created_at);
            println!("  provider: {}", status.provider_id);
        }
    }
}

pub fn print_consent(consent: &Consent, mode: OutputMode, is_tty: bool) {
    match mode {
        OutputMode::Json => print_json(consent),
        OutputMode::Pretty => {
            println!("{}", consent.message);
            for link in &consent.links {
                let href = if is_tty {
                    link.href.underline().to_string()
                } else {
                    link.href.clone()
                };
                println!("  {} {}", dim(&link.rel, is_tty), href);
            }
        }
    }
}

pub fn print_payment(payment: &PaymentCreated, mode: OutputMode, is_tty: bool) {
    match mode {
        OutputMode::Json => print_json(payment),
        OutputMode::Pretty => {
            let mut line = format!("Payment {} {}", heading(&payment.id, is_tty), payment.status);
            if let Some(created) = payment.created_at {
                line.push_str(&format!(" at {}", created.to_rfc3339()));
            }
            println!("{line}");
        }
    }
}

pub fn print_token(token: &TokenPair, mode: OutputMode) {
    match mode {
        OutputMode::Json => print_json(token),
        OutputMode::Pretty => {
            println!("{}", token.access_token);
            eprintln!(
                "expires in {}s, refresh token expires in {}s",
                token.expires_in, token.refresh_expires_in
            );
        }
    }
}

/// Tell the user where to complete a step-up. Always on stderr so stdout
/// stays machine-readable in JSON mode.
pub fn print_sca_prompt(sca: &Sca, is_tty: bool) {
    let label = if is_tty {
        "Authorization required".yellow().bold().to_string()
    } else {
        "Authorization required".to_string()
    };
    eprintln!("{label}: open the following URL and complete the steps");
    eprintln!("  {}", sca.url);
    eprintln!("Press Enter when done.");
}

pub fn print_error(err: &NeoError, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&err.to_json()).unwrap_or_default());
    } else {
        eprintln!("Error: {err}");
    }
}
