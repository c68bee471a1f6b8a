//! Pending sends

use tokio::task::JoinHandle;

use crate::domain::communication::mailer::MailerError;

/// A message accepted for background submission.
///
/// This does not mean the message was delivered. Dropping the handle leaves
/// the submission running; its failure is then only logged.
#[derive(Debug)]
pub struct PendingSend {
    handle: JoinHandle<Result<(), MailerError>>,
}

impl PendingSend {
    pub(super) fn new(handle: JoinHandle<Result<(), MailerError>>) -> Self {
        Self { handle }
    }

    /// Whether the background submission has completed
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the background submission and returns the transport's result
    pub async fn outcome(self) -> Result<(), MailerError> {
        match self.handle.await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => Err(MailerError::Aborted),
            Err(err) => Err(MailerError::UnknownError(err.into())),
        }
    }
}
