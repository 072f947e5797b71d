//! Provider-specific glue: tolerant payload parsers and the translation of each provider's status vocabulary
//! into the engine's normalized [`warung_payment_engine::reconciliation::ProviderStatus`].
pub mod doku;
pub mod midtrans;
