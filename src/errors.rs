use crate::consent::DecodeError;

#[derive(Debug, thiserror::Error)]
pub enum ConsentError {
    #[error("Malformed consent envelope: {0}")]
    Decode(#[from] DecodeError),

    #[error("Cannot write consent cookie: {0}")]
    StorageWrite(String),
}
