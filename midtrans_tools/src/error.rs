use thiserror::Error;

#[derive(Debug, Error)]
pub enum MidtransApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid response from the Midtrans API: {0}")]
    ResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Midtrans does not know transaction {0}")]
    TransactionNotFound(String),
    #[error("Status query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("The Midtrans API could not be reached: {0}")]
    Unavailable(String),
}

impl MidtransApiError {
    /// Transient transport failures, worth exactly one retry before the notification is bounced back to the
    /// provider's own retry mechanism.
    pub fn is_transient(&self) -> bool {
        matches!(self, MidtransApiError::Unavailable(_))
    }
}
