use crate::client::Api;
use crate::error::NeoError;
use crate::headers::RequestOption;
use crate::request::PreparedRequest;
use crate::sca::Consent;

impl Api {
    /// What the end user has to do to consent to the session's pending action.
    pub async fn consent(
        &self,
        session_id: &str,
        options: impl IntoIterator<Item = RequestOption>,
    ) -> Result<Consent, NeoError> {
        if session_id.is_empty() {
            return Err(NeoError::InvalidSessionId);
        }
        let req = PreparedRequest::get(format!("/ics/v3/consent/{session_id}"))
            .with_options(options);
        self.execute(&req, 200).await?.done_or_err()
    }
}
