use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Api;
use crate::error::NeoError;
use crate::headers::RequestOption;
use crate::request::PreparedRequest;
use crate::sca::Outcome;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub transaction_reference: String,
    #[serde(default)]
    pub transaction_amount: Option<Money>,
    #[serde(default)]
    pub credit_debit_indicator: String,
    #[serde(default)]
    pub booking_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub value_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub counterparty_account: String,
    #[serde(default)]
    pub counterparty_name: String,
    #[serde(default)]
    pub counterparty_agent: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub currency: String,
    pub value: String,
}

impl Api {
    /// Transactions on the given account. May require consent first.
    pub async fn transactions(
        &self,
        session_id: &str,
        account_id: &str,
        options: impl IntoIterator<Item = RequestOption>,
    ) -> Result<Outcome<Vec<Transaction>>, NeoError> {
        if session_id.is_empty() {
            return Err(NeoError::InvalidSessionId);
        }
        if account_id.is_empty() {
            return Err(NeoError::InvalidAccountId);
        }
        let req = PreparedRequest::get(format!("/ics/v3/accounts/{account_id}/transactions"))
            .with_options(options)
            .with_option(RequestOption::SessionId(session_id.to_string()));
        self.execute(&req, 200).await
    }
}
