//! Export payload handling: decoding, format detection, and encoding.
//!
//! This crate owns the wire side of the import pipeline: turning raw
//! user-supplied text into JSON, recognizing the native export schema or
//! converting a third-party tracker dump into canonical datasets, and
//! producing the native export (plain JSON or the URL-carried form).

pub mod convert;
pub mod decode;
pub mod encode;
pub mod error;
pub mod schema;

pub use convert::{detect_datasets, Detected};
pub use decode::decode_payload;
pub use encode::{build_export, encode_share_payload, share_url};
pub use error::DecodeError;
pub use schema::{
    ExportDataset, ExportExtension, ExportMatch, ExportPlayer, ExportResult, EXPORT_TYPE,
    EXPORT_VERSION,
};
