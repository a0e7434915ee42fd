use thiserror::Error;

/// Form problems surfaced to the user as inline text. State is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Informe {0}.")]
    MissingField(&'static str),
    #[error("Informe um e-mail ou telefone, ou entre com uma rede social.")]
    MissingIdentity,
    #[error("Preencha todos os campos obrigatórios e confirme as diretrizes de segurança.")]
    IncompleteOrder,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("local storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write key {key}: {reason}")]
    Write { key: String, reason: String },
    #[error("invalid session payload: {0}")]
    Serialization(#[from] serde_json::Error),
}
