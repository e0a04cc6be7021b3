use std::io::IsTerminal;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::client::Api;
use crate::error::NeoError;
use crate::sca::{Outcome, Sca};

use super::output::print_sca_prompt;

/// Waits for the end user to finish a step-up out of band.
#[async_trait]
pub trait ScaPrompt: Send {
    async fn wait(&mut self, sca: &Sca) -> Result<(), NeoError>;
}

/// Prints the visit URL, optionally opens it in a browser, and blocks until
/// the user presses Enter.
#[derive(Debug, Default)]
pub struct TerminalPrompt {
    pub open_browser: bool,
}

#[async_trait]
impl ScaPrompt for TerminalPrompt {
    async fn wait(&mut self, sca: &Sca) -> Result<(), NeoError> {
        print_sca_prompt(sca, std::io::stderr().is_terminal());
        if self.open_browser {
            if let Err(e) = webbrowser::open(&sca.url) {
                tracing::warn!("could not open browser: {e}");
            }
        }
        tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).map(|_| ())
        })
        .await
        .map_err(|e| NeoError::IoError(std::io::Error::other(e)))??;
        Ok(())
    }
}

/// Drive an outcome to completion, prompting for every step-up along the way.
pub async fn complete<T: DeserializeOwned>(
    api: &Api,
    mut outcome: Outcome<T>,
    prompt: &mut dyn ScaPrompt,
) -> Result<T, NeoError> {
    loop {
        match outcome {
            Outcome::Done(value) => return Ok(value),
            Outcome::Sca(handle) => {
                tracing::info!(id = %handle.id(), kind = ?handle.kind(), "waiting for step-up");
                prompt.wait(&handle.sca).await?;
                outcome = api.resume(handle).await?;
            }
        }
    }
}
