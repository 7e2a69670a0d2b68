use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        FromRequest, Multipart, Request,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::core::error::AppError;

/// Multipart extractor that reports rejections through [`AppError`]
pub struct AppMultipart(pub Multipart);

impl<S> FromRequest<S> for AppMultipart
where
    S: Send + Sync,
{
    type Rejection = AppMultipartRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Multipart::from_request(req, state).await {
            Ok(multipart) => Ok(Self(multipart)),
            Err(rejection) => Err(AppMultipartRejection(rejection)),
        }
    }
}

pub struct AppMultipartRejection(MultipartRejection);

impl IntoResponse for AppMultipartRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            MultipartRejection::InvalidBoundary(err) => {
                format!("Invalid multipart request: {}", err)
            }
            _ => "Expected a multipart/form-data request".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

/// Map an error raised while reading multipart fields
///
/// Body limit violations surface as 413, everything else as a malformed request.
pub fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload exceeds the allowed size: {}", err.body_text()))
    } else {
        AppError::BadRequest(format!("Failed to read multipart data: {}", err.body_text()))
    }
}
