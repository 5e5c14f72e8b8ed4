/// Errors that can occur while decoding a pasted or uploaded payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The input is a recognizable tracker web link, not exportable JSON.
    #[error("cannot read this link format; export the data as JSON and import that instead")]
    UnsupportedLink,

    /// No decode strategy produced parseable JSON.
    #[error("unreadable data: expected JSON, a data= payload, or a base64 export")]
    Unreadable,
}
