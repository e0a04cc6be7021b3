use serde::{Deserialize, Deserializer, Serialize};

use crate::client::Api;
use crate::error::NeoError;
use crate::request::PreparedRequest;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub banking_group_name: String,
    #[serde(
        default,
        rename = "personalIdentificationRequired",
        deserialize_with = "lenient_bool"
    )]
    pub identification_required: bool,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub bank_display_name: String,
    #[serde(default)]
    pub supported_services: Vec<String>,
    #[serde(default)]
    pub bic: String,
    #[serde(default)]
    pub bank_official_name: String,
    #[serde(default)]
    pub status: String,
}

impl Bank {
    pub fn is_available(&self) -> bool {
        self.status == "AVAILABLE"
    }
}

/// The platform sends this flag both as a JSON bool and as a string.
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "1" | "t" => Ok(true),
            "false" | "0" | "f" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "unable to unmarshal {other:?} as bool"
            ))),
        },
    }
}

impl Api {
    /// All available banks.
    pub async fn banks(&self) -> Result<Vec<Bank>, NeoError> {
        self.list_banks(PreparedRequest::get("/ics/v3/banks")).await
    }

    /// Available banks in the given country.
    pub async fn banks_by_country(&self, country_code: &str) -> Result<Vec<Bank>, NeoError> {
        let req = self.banks_query("countryCode", country_code)?;
        self.list_banks(req).await
    }

    /// Available banks matching the given name.
    pub async fn banks_by_name(&self, name: &str) -> Result<Vec<Bank>, NeoError> {
        let req = self.banks_query("name", name)?;
        self.list_banks(req).await
    }

    pub async fn bank_by_id(&self, bank_id: &str) -> Result<Bank, NeoError> {
        if bank_id.is_empty() {
            return Err(NeoError::InvalidBankId);
        }
        let req = PreparedRequest::get(format!("/ics/v3/banks/{bank_id}"));
        self.execute(&req, 200).await?.done_or_err()
    }

    fn banks_query(&self, key: &str, value: &str) -> Result<PreparedRequest, NeoError> {
        let base = format!("{}/ics/v3/banks", self.client().base_url());
        let mut url = reqwest::Url::parse(&base).map_err(|e| NeoError::Transport {
            method: "GET".into(),
            url: base.clone(),
            source: Box::new(e),
        })?;
        url.query_pairs_mut().append_pair(key, value);
        Ok(PreparedRequest::get(url.to_string()))
    }

    async fn list_banks(&self, req: PreparedRequest) -> Result<Vec<Bank>, NeoError> {
        let banks: Vec<Bank> = self.execute(&req, 200).await?.done_or_err()?;
        Ok(banks.into_iter().filter(Bank::is_available).collect())
    }
}
