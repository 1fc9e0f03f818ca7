use serde::Serialize;

use crate::encode::{encode_as_base64, encode_as_data_uri};
use crate::error::TryOnError;
use crate::input::{BinaryResource, GarmentInput};

/// JSON body expected by the try-on endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransportPayload {
    /// Bare base64, the endpoint needs the person's actual pixels.
    pub human_image: String,
    /// Catalog URL or full data URI.
    pub garment_image: String,
}

impl TransportPayload {
    pub async fn build(person: &BinaryResource, garment: &GarmentInput) -> Result<Self, TryOnError> {
        let human_image = encode_as_base64(person).await?;
        let garment_image = match garment {
            GarmentInput::Url(url) => url.clone(),
            GarmentInput::File(resource) => encode_as_data_uri(resource).await?,
        };

        Ok(Self {
            human_image,
            garment_image,
        })
    }
}
