use serde::{Deserialize, Serialize};

use crate::client::Api;
use crate::error::NeoError;
use crate::headers::RequestOption;
use crate::request::PreparedRequest;
use crate::sca::Outcome;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub bban: String,
    #[serde(default)]
    pub iban: String,
    #[serde(default)]
    pub sort_code_account_number: String,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub account_type: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub balances: Vec<Balance>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default, rename = "type")]
    pub r#type: String,
}

impl Api {
    /// All accounts available in the session. May require consent first.
    pub async fn accounts(
        &self,
        session_id: &str,
        options: impl IntoIterator<Item = RequestOption>,
    ) -> Result<Outcome<Vec<Account>>, NeoError> {
        if session_id.is_empty() {
            return Err(NeoError::InvalidSessionId);
        }
        let req = PreparedRequest::get("/ics/v3/accounts")
            .with_options(options)
            .with_option(RequestOption::SessionId(session_id.to_string()));
        self.execute(&req, 200).await
    }

    pub async fn account_by_id(
        &self,
        session_id: &str,
        account_id: &str,
        options: impl IntoIterator<Item = RequestOption>,
    ) -> Result<Outcome<Account>, NeoError> {
        if session_id.is_empty() {
            return Err(NeoError::InvalidSessionId);
        }
        if account_id.is_empty() {
            return Err(NeoError::InvalidAccountId);
        }
        let req = PreparedRequest::get(format!("/ics/v3/accounts/{account_id}"))
            .with_options(options)
            .with_option(RequestOption::SessionId(session_id.to_string()));
        self.execute(&req, 200).await
    }
}
