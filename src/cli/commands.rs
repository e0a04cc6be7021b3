use std::io::IsTerminal;
use std::path::Path;

use crate::api::{PaymentRequest, PaymentType};
use crate::client::{Api, Client};
use crate::config::load_config;
use crate::error::NeoError;
use crate::headers::RequestOption;

use super::output::{
    print_accounts, print_banks, print_consent, print_json, print_payment, print_session_status,
    print_token, print_transactions, OutputMode,
};
use super::step_up::{complete, TerminalPrompt};

/// Settings shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub config_path: Option<String>,
    pub mode: OutputMode,
    pub open_browser: bool,
}

impl Context {
    fn prompt(&self) -> TerminalPrompt {
        TerminalPrompt {
            open_browser: self.open_browser,
        }
    }

    async fn connect(&self) -> Result<Api, NeoError> {
        crate::connect(self.config_path.as_deref()).await
    }
}

/// End-user context headers forwarded on bank-facing calls.
#[derive(Debug, Clone, Default)]
pub struct PsuOptions {
    pub redirect_url: Option<String>,
    pub psu_id: Option<String>,
    pub psu_ip: Option<String>,
}

impl PsuOptions {
    pub fn into_options(self) -> Vec<RequestOption> {
        let mut options = Vec::new();
        if let Some(url) = self.redirect_url {
            options.push(RequestOption::RedirectUrl(url));
        }
        if let Some(id) = self.psu_id {
            options.push(RequestOption::PsuId(id));
        }
        if let Some(ip) = self.psu_ip {
            options.push(RequestOption::PsuIp(ip));
        }
        options
    }
}

fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

pub async fn run_token(ctx: &Context) -> Result<(), NeoError> {
    let config = load_config(ctx.config_path.as_deref())?;
    let token = Client::from_config(&config)?.access_token().await?;
    print_token(&token, ctx.mode);
    Ok(())
}

pub async fn run_banks(
    ctx: &Context,
    country: Option<&str>,
    name: Option<&str>,
) -> Result<(), NeoError> {
    let api = ctx.connect().await?;
    let banks = match (country, name) {
        (Some(country), _) => api.banks_by_country(country).await?,
        (None, Some(name)) => api.banks_by_name(name).await?,
        (None, None) => api.banks().await?,
    };
    print_banks(&banks, ctx.mode, is_tty());
    Ok(())
}

pub async fn run_bank(ctx: &Context, bank_id: &str) -> Result<(), NeoError> {
    let bank = ctx.connect().await?.bank_by_id(bank_id).await?;
    print_json(&bank);
    Ok(())
}

pub async fn run_session_new(ctx: &Context, bank_id: &str) -> Result<(), NeoError> {
    let session = ctx.connect().await?.new_session(bank_id).await?;
    match ctx.mode {
        OutputMode::Json => print_json(&session),
        OutputMode::Pretty => println!("{}", session.id),
    }
    Ok(())
}

pub async fn run_session_status(ctx: &Context, session_id: &str) -> Result<(), NeoError> {
    let status = ctx.connect().await?.session_status(session_id).await?;
    print_session_status(&status, ctx.mode, is_tty());
    Ok(())
}

pub async fn run_session_delete(ctx: &Context, session_id: &str) -> Result<(), NeoError> {
    ctx.connect().await?.delete_session(session_id).await?;
    if ctx.mode == OutputMode::Pretty {
        println!("Session {session_id} deleted");
    }
    Ok(())
}

pub async fn run_consent(
    ctx: &Context,
    session_id: &str,
    psu: PsuOptions,
) -> Result<(), NeoError> {
    let consent = ctx
        .connect()
        .await?
        .consent(session_id, psu.into_options())
        .await?;
    print_consent(&consent, ctx.mode, is_tty());
    Ok(())
}

pub async fn run_accounts(
    ctx: &Context,
    session_id: &str,
    psu: PsuOptions,
) -> Result<(), NeoError> {
    let api = ctx.connect().await?;
    let outcome = api.accounts(session_id, psu.into_options()).await?;
    let accounts = complete(&api, outcome, &mut ctx.prompt()).await?;
    print_accounts(&accounts, ctx.mode, is_tty());
    Ok(())
}

pub async fn run_account(
    ctx: &Context,
    session_id: &str,
    account_id: &str,
    psu: PsuOptions,
) -> Result<(), NeoError> {
    let api = ctx.connect().await?;
    let outcome = api
        .account_by_id(session_id, account_id, psu.into_options())
        .await?;
    let account = complete(&api, outcome, &mut ctx.prompt()).await?;
    print_accounts(std::slice::from_ref(&account), ctx.mode, is_tty());
    Ok(())
}

pub async fn run_transactions(
    ctx: &Context,
    session_id: &str,
    account_id: &str,
    psu: PsuOptions,
) -> Result<(), NeoError> {
    let api = ctx.connect().await?;
    let outcome = api
        .transactions(session_id, account_id, psu.into_options())
        .await?;
    let txs = complete(&api, outcome, &mut ctx.prompt()).await?;
    print_transactions(&txs, ctx.mode, is_tty());
    Ok(())
}

/// Read a payment request from a JSON/JSONC file.
pub fn read_payment_request(path: &Path) -> Result<PaymentRequest, NeoError> {
    let content = std::fs::read_to_string(path)?;
    let stripped = crate::config::loader::strip_jsonc_comments(&content);
    serde_json::from_str(&stripped).map_err(|e| NeoError::InvalidPaymentRequest(e.to_string()))
}

pub async fn run_pay(
    ctx: &Context,
    payment_type: &str,
    session_id: &str,
    request_file: &Path,
    psu: PsuOptions,
) -> Result<(), NeoError> {
    let payment_type: PaymentType = payment_type.parse()?;
    let request = read_payment_request(request_file)?;
    request.validate()?;

    let api = ctx.connect().await?;
    let outcome = api
        .create_payment(session_id, payment_type, &request, psu.into_options())
        .await?;
    let payment = complete(&api, outcome, &mut ctx.prompt()).await?;
    print_payment(&payment, ctx.mode, is_tty());
    Ok(())
}
