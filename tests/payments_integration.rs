mod common;

use neo::api::AccountInfo;
use neo::sca::ContinuationKind;
use neo::{NeoError, Outcome, PaymentRequest, PaymentType, RequestOption};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sepa_request() -> PaymentRequest {
    PaymentRequest {
        debtor_account: AccountInfo::iban("NO7013086520592"),
        debtor_name: "Ola Nordmann".into(),
        creditor_account: AccountInfo::iban("DE89370400440532013000"),
        creditor_name: "Erika Mustermann".into(),
        remittance_info_unstructured: "invoice 42".into(),
        instrumented_amount: "100.00".into(),
        currency: "EUR".into(),
        end_to_end_identification: "e2e-42".into(),
        ..Default::default()
    }
}

fn created(id: &str) -> serde_json::Value {
    serde_json::json!({
        "paymentId": id,
        "status": "ACSC",
        "creationDateTime": "2024-05-01T10:00:00Z"
    })
}

#[tokio::test]
async fn payment_needs_consent_then_authorization_then_completes() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server, "first", "second").await;

    Mock::given(method("POST"))
        .and(path("/ics/v3/payments/sepa-credit"))
        .and(body_partial_json(serde_json::json!({"endToEndIdentification": "e2e-42"})))
        .respond_with(ResponseTemplate::new(510).set_body_json(common::step_up_body(
            "1426",
            "https://bank.example.com/consent",
            "s1",
        )))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ics/v3/payments/sepa-credit"))
        .respond_with(ResponseTemplate::new(510).set_body_json(common::step_up_body(
            "1428",
            "https://bank.example.com/authorize",
            "pay-1",
        )))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ics/v3/payments/sepa-credit/pay-1/complete"))
        .and(header("x-session-id", "s1"))
        .and(header("x-redirect-url", "https://app.example.com/done"))
        .respond_with(ResponseTemplate::new(201).set_body_json(created("pay-1")))
        .expect(1)
        .mount(&server)
        .await;

    let api = common::client_for(&server).api("device-1").await.unwrap();
    let options = [RequestOption::RedirectUrl("https://app.example.com/done".into())];

    let consent = match api.sepa_payment("s1", &sepa_request(), options).await.unwrap() {
        Outcome::Sca(handle) => handle,
        Outcome::Done(_) => panic!("expected consent step-up"),
    };
    assert_eq!(consent.url(), "https://bank.example.com/consent");
    assert_eq!(consent.kind(), ContinuationKind::Initial);

    let authorization = match api.resume(consent).await.unwrap() {
        Outcome::Sca(handle) => handle,
        Outcome::Done(_) => panic!("expected authorization step-up"),
    };
    assert_eq!(authorization.url(), "https://bank.example.com/authorize");
    assert_eq!(authorization.id(), "pay-1");
    assert_eq!(authorization.kind(), ContinuationKind::AwaitingPaymentCompletion);

    let payment = api.resume(authorization).await.unwrap().done().unwrap();
    assert_eq!(payment.id, "pay-1");
    assert_eq!(payment.status, "ACSC");
    assert_eq!(
        payment.created_at.map(|t| t.to_rfc3339()).as_deref(),
        Some("2024-05-01T10:00:00+00:00")
    );
}

#[tokio::test]
async fn authorization_on_first_response_goes_straight_to_completion() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server, "first", "second").await;
    Mock::given(method("POST"))
        .and(path("/ics/v3/payments/domestic-transfer"))
        .respond_with(ResponseTemplate::new(510).set_body_json(common::step_up_body(
            "1428",
            "https://bank.example.com/authorize",
            "pay-7",
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ics/v3/payments/domestic-transfer/pay-7/complete"))
        .respond_with(ResponseTemplate::new(201).set_body_json(created("pay-7")))
        .expect(1)
        .mount(&server)
        .await;

    let api = common::client_for(&server).api("device-1").await.unwrap();
    let mut request = sepa_request();
    request.debtor_account = AccountInfo::bban("12345678903");
    request.creditor_account = AccountInfo::bban("98765432109");

    let handle = match api.domestic_payment("s1", &request, []).await.unwrap() {
        Outcome::Sca(handle) => handle,
        Outcome::Done(_) => panic!("expected authorization step-up"),
    };
    assert_eq!(handle.kind(), ContinuationKind::AwaitingPaymentCompletion);

    let payment = api.resume(handle).await.unwrap().done().unwrap();
    assert_eq!(payment.id, "pay-7");
}

#[tokio::test]
async fn scheduled_payment_without_date_is_rejected_locally() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server, "first", "second").await;
    Mock::given(method("POST"))
        .and(path("/ics/v3/payments/sepa-scheduled-credit"))
        .respond_with(ResponseTemplate::new(201).set_body_json(created("never")))
        .expect(0)
        .mount(&server)
        .await;

    let api = common::client_for(&server).api("device-1").await.unwrap();
    let err = api
        .sepa_scheduled_payment("s1", &sepa_request(), [])
        .await
        .unwrap_err();
    assert!(matches!(err, NeoError::InvalidPaymentRequest(_)));
}

#[tokio::test]
async fn authorize_payment_returns_bank_url() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server, "first", "second").await;
    Mock::given(method("GET"))
        .and(path("/ics/v3/payments/sepa-credit/pay-1/authorize"))
        .and(header("x-session-id", "s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Authorize the payment",
            "paymentId": "pay-1",
            "links": [{"type": "GET", "rel": "authorize", "href": "https://bank.example.com/pay-1", "meta": {"id": "pay-1"}}]
        })))
        .mount(&server)
        .await;

    let api = common::client_for(&server).api("device-1").await.unwrap();
    let sca = api
        .authorize_payment("s1", PaymentType::Sepa, "pay-1", [])
        .await
        .unwrap();
    assert_eq!(sca.url, "https://bank.example.com/pay-1");
    assert_eq!(sca.id, "pay-1");
}
