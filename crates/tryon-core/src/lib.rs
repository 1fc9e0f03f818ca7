pub mod catalog;
pub mod encode;
pub mod error;
pub mod input;
pub mod outcome;
pub mod payload;
pub mod response;
pub mod upload;

pub use catalog::{CatalogItem, Collection, GarmentCategory};
pub use error::{FailureKind, TryOnError};
pub use input::{BinaryResource, GarmentInput};
pub use outcome::{ProcessingOutcome, ResultImage};
pub use payload::TransportPayload;
pub use response::{ContentKind, RawResponse};
