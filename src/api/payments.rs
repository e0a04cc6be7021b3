use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Api;
use crate::error::NeoError;
use crate::headers::RequestOption;
use crate::request::PreparedRequest;
use crate::sca::{ContinuationKind, Outcome, PaymentContext, Sca};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentType {
    #[serde(rename = "domestic-transfer")]
    Domestic,
    #[serde(rename = "domestic-scheduled-transfer")]
    DomesticScheduled,
    #[serde(rename = "sepa-credit")]
    Sepa,
    #[serde(rename = "sepa-scheduled-credit")]
    SepaScheduled,
}

impl PaymentType {
    pub const ALL: [PaymentType; 4] = [
        PaymentType::Domestic,
        PaymentType::DomesticScheduled,
        PaymentType::Sepa,
        PaymentType::SepaScheduled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Domestic => "domestic-transfer",
            PaymentType::DomesticScheduled => "domestic-scheduled-transfer",
            PaymentType::Sepa => "sepa-credit",
            PaymentType::SepaScheduled => "sepa-scheduled-credit",
        }
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, PaymentType::DomesticScheduled | PaymentType::SepaScheduled)
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentType {
    type Err = NeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(t) = PaymentType::ALL.iter().find(|t| t.as_str() == s) {
            return Ok(*t);
        }
        Err(NeoError::InvalidPaymentType {
            input: s.to_string(),
            suggestion: suggest_payment_type(s),
        })
    }
}

/// Closest known payment type within a Levenshtein distance of 3, unless
/// two are equally close.
fn suggest_payment_type(input: &str) -> Option<String> {
    let mut best_dist = usize::MAX;
    let mut best: Option<&str> = None;
    let mut ambiguous = false;

    for t in PaymentType::ALL {
        let dist = strsim::levenshtein(input, t.as_str());
        if dist < best_dist {
            best_dist = dist;
            best = Some(t.as_str());
            ambiguous = false;
        } else if dist == best_dist {
            ambiguous = true;
        }
    }

    if best_dist <= 3 && !ambiguous {
        best.map(str::to_string)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentCode {
    #[serde(rename = "GDDS")]
    Commercial,
    #[serde(rename = "IVPT")]
    Invoice,
    #[serde(rename = "MP2P")]
    P2P,
    #[serde(rename = "OTHR")]
    Other,
    #[serde(rename = "SCVE")]
    Electronic,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bban: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub iban: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sort_code_account_number: String,
}

impl AccountInfo {
    pub fn iban(iban: impl Into<String>) -> Self {
        Self {
            iban: iban.into(),
            ..Default::default()
        }
    }

    pub fn bban(bban: impl Into<String>) -> Self {
        Self {
            bban: bban.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), NeoError> {
        if self.bban.is_empty() && self.iban.is_empty() && self.sort_code_account_number.is_empty()
        {
            return Err(NeoError::InvalidAccountInfo);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemittanceInfoStructured {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, rename = "referenceIssuer", skip_serializing_if = "String::is_empty")]
    pub issuer: String,
    #[serde(default, rename = "referenceType", skip_serializing_if = "String::is_empty")]
    pub r#type: String,
}

impl RemittanceInfoStructured {
    pub fn validate(&self) -> Result<(), NeoError> {
        if self.reference.is_empty() && self.issuer.is_empty() && self.r#type.is_empty() {
            return Err(NeoError::InvalidRemittanceInfo);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street_name: String,
    pub building_number: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(rename = "identification")]
    pub id: String,
    #[serde(rename = "identificationType")]
    pub id_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMetadata {
    #[serde(rename = "creditorAddress", skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(rename = "creditorAgent", skip_serializing_if = "Option::is_none")]
    pub agent: Option<Agent>,
    #[serde(rename = "paymentContextCode", skip_serializing_if = "Option::is_none")]
    pub code: Option<PaymentCode>,
    #[serde(
        default,
        rename = "merchantCategoryCode",
        skip_serializing_if = "String::is_empty"
    )]
    pub merchant_category_code: String,
    #[serde(
        default,
        rename = "merchantCustomerIdentification",
        skip_serializing_if = "String::is_empty"
    )]
    pub merchant_customer_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub debtor_account: AccountInfo,
    pub debtor_name: String,
    pub creditor_account: AccountInfo,
    pub creditor_name: String,
    #[serde(
        default,
        rename = "remittanceInformationUnstructured",
        skip_serializing_if = "String::is_empty"
    )]
    pub remittance_info_unstructured: String,
    #[serde(
        default,
        rename = "remittanceInformationStructured",
        skip_serializing_if = "Option::is_none"
    )]
    pub remittance_info_structured: Option<RemittanceInfoStructured>,
    pub instrumented_amount: String,
    pub currency: String,
    pub end_to_end_identification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_metadata: Option<PaymentMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_execution_date: Option<DateTime<Utc>>,
}

impl PaymentRequest {
    /// Reject requests the platform would refuse, before any network call.
    pub fn validate(&self) -> Result<(), NeoError> {
        for (field, value) in [
            ("debtorName", &self.debtor_name),
            ("creditorName", &self.creditor_name),
            ("instrumentedAmount", &self.instrumented_amount),
            ("currency", &self.currency),
            ("endToEndIdentification", &self.end_to_end_identification),
        ] {
            if value.is_empty() {
                return Err(NeoError::InvalidPaymentRequest(format!("missing {field}")));
            }
        }
        match (&self.remittance_info_unstructured, &self.remittance_info_structured) {
            (u, Some(_)) if !u.is_empty() => {
                return Err(NeoError::InvalidPaymentRequest(
                    "both structured and unstructured remittance info given".into(),
                ));
            }
            (u, Some(s)) if u.is_empty() => s.validate()?,
            (u, None) if u.is_empty() => return Err(NeoError::InvalidRemittanceInfo),
            _ => {}
        }
        self.debtor_account.validate()?;
        self.creditor_account.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCreated {
    #[serde(rename = "paymentId")]
    pub id: String,
    pub status: String,
    #[serde(default, rename = "creationDateTime", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The request that finalizes an authorized payment.
pub fn complete_payment_request(
    session_id: &str,
    payment_type: PaymentType,
    payment_id: &str,
    options: impl IntoIterator<Item = RequestOption>,
) -> Result<PreparedRequest, NeoError> {
    if session_id.is_empty() {
        return Err(NeoError::InvalidSessionId);
    }
    if payment_id.is_empty() {
        return Err(NeoError::InvalidPaymentId);
    }
    Ok(PreparedRequest::post(format!(
        "/ics/v3/payments/{payment_type}/{payment_id}/complete"
    ))
    .with_options(options)
    .with_option(RequestOption::SessionId(session_id.to_string())))
}

/// Route a payment's step-up handles through the two-stage protocol.
///
/// A payment-authorization step-up resumes into the completion endpoint,
/// using the step-up id as payment id. Any other step-up keeps re-sending
/// the creation request and stays on this path for the next round.
pub(crate) fn chain_payment<T>(outcome: Outcome<T>, ctx: PaymentContext) -> Outcome<T> {
    match outcome {
        Outcome::Done(v) => Outcome::Done(v),
        Outcome::Sca(mut handle) => {
            let awaiting_completion = handle
                .error()
                .is_some_and(|e| e.is_payment_auth_error());
            handle.continuation.kind = if awaiting_completion {
                ContinuationKind::AwaitingPaymentCompletion
            } else {
                ContinuationKind::Initial
            };
            handle.continuation.payment = Some(ctx);
            Outcome::Sca(handle)
        }
    }
}

impl Api {
    async fn payment(
        &self,
        session_id: &str,
        payment_type: PaymentType,
        request: &PaymentRequest,
        options: Vec<RequestOption>,
    ) -> Result<Outcome<PaymentCreated>, NeoError> {
        if session_id.is_empty() {
            return Err(NeoError::InvalidSessionId);
        }
        if payment_type.is_scheduled() && request.requested_execution_date.is_none() {
            return Err(NeoError::InvalidPaymentRequest(
                "scheduled payments need requestedExecutionDate".into(),
            ));
        }
        request.validate()?;

        let body = serde_json::to_value(request).map_err(|e| NeoError::Decode {
            what: "payment request",
            source: e,
        })?;
        let req = PreparedRequest::post(format!("/ics/v3/payments/{payment_type}"))
            .with_body(body)
            .with_options(options.iter().cloned())
            .with_option(RequestOption::SessionId(session_id.to_string()));

        let outcome = self.execute(&req, 201).await?;
        Ok(chain_payment(
            outcome,
            PaymentContext {
                session_id: session_id.to_string(),
                payment_type,
                options,
            },
        ))
    }

    /// Create a payment of any type. Resume a returned handle with
    /// [`Api::resume`]; a payment may need two step-ups before it completes.
    pub async fn create_payment(
        &self,
        session_id: &str,
        payment_type: PaymentType,
        request: &PaymentRequest,
        options: impl IntoIterator<Item = RequestOption>,
    ) -> Result<Outcome<PaymentCreated>, NeoError> {
        self.payment(session_id, payment_type, request, options.into_iter().collect())
            .await
    }

    pub async fn sepa_payment(
        &self,
        session_id: &str,
        request: &PaymentRequest,
        options: impl IntoIterator<Item = RequestOption>,
    ) -> Result<Outcome<PaymentCreated>, NeoError> {
        self.create_payment(session_id, PaymentType::Sepa, request, options)
            .await
    }

    pub async fn sepa_scheduled_payment(
        &self,
        session_id: &str,
        request: &PaymentRequest,
        options: impl IntoIterator<Item = RequestOption>,
    ) -> Result<Outcome<PaymentCreated>, NeoError> {
        self.create_payment(session_id, PaymentType::SepaScheduled, request, options)
            .await
    }

    pub async fn domestic_payment(
        &self,
        session_id: &str,
        request: &PaymentRequest,
        options: impl IntoIterator<Item = RequestOption>,
    ) -> Result<Outcome<PaymentCreated>, NeoError> {
        self.create_payment(session_id, PaymentType::Domestic, request, options)
            .await
    }

    pub async fn domestic_scheduled_payment(
        &self,
        session_id: &str,
        request: &PaymentRequest,
        options: impl IntoIterator<Item = RequestOption>,
    ) -> Result<Outcome<PaymentCreated>, NeoError> {
        self.create_payment(session_id, PaymentType::DomesticScheduled, request, options)
            .await
    }

    /// Finalize an authorized payment.
    pub async fn complete_payment(
        &self,
        session_id: &str,
        payment_type: PaymentType,
        payment_id: &str,
        options: impl IntoIterator<Item = RequestOption>,
    ) -> Result<Outcome<PaymentCreated>, NeoError> {
        let req = complete_payment_request(session_id, payment_type, payment_id, options)?;
        self.execute(&req, 201).await
    }

    /// Where the end user authorizes an existing payment.
    pub async fn authorize_payment(
        &self,
        session_id: &str,
        payment_type: PaymentType,
        payment_id: &str,
        options: impl IntoIterator<Item = RequestOption>,
    ) -> Result<Sca, NeoError> {
        if session_id.is_empty() {
            return Err(NeoError::InvalidSessionId);
        }
        if payment_id.is_empty() {
            return Err(NeoError::InvalidPaymentId);
        }
        let req = PreparedRequest::get(format!(
            "/ics/v3/payments/{payment_type}/{payment_id}/authorize"
        ))
        .with_options(options)
        .with_option(RequestOption::SessionId(session_id.to_string()));

        let consent: crate::sca::Consent = self.execute(&req, 200).await?.done_or_err()?;
        let link = consent.links.first().ok_or(NeoError::InvalidConsent)?;
        Ok(Sca {
            url: link.href.clone(),
            id: consent.payment_id.clone(),
            error: None,
        })
    }
}
