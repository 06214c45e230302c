//! Method dispatch: validates arguments, runs the engine, and encodes results.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::Limits;
use serde_json::{Map, Value};
use tonal_core::{Adjustment, AdjustmentSet, EngineOptions, TransformEngine, TransformError};

use crate::codec::{self, CodecError};
use crate::ipc::{CONNECTION_OK, ErrorCode, Method, MethodCall, MethodResponse, MethodResult};

/// Errors raised while servicing `applyAdjustments`.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("invalid argument types: {0}")]
    Type(String),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl HandlerError {
    /// Protocol error code for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArguments(_) => ErrorCode::InvalidArguments,
            Self::Type(_) => ErrorCode::TypeError,
            Self::Codec(CodecError::Decode(_) | CodecError::Layout(_)) => {
                ErrorCode::InvalidArguments
            }
            Self::Codec(CodecError::TooLarge(_)) => ErrorCode::OutOfMemory,
            Self::Codec(CodecError::Encode(_) | CodecError::Io(_)) => ErrorCode::ProcessingError,
            Self::Transform(TransformError::ResourceExhausted { .. }) => ErrorCode::OutOfMemory,
            Self::Transform(TransformError::DimensionMismatch { .. }) => {
                ErrorCode::ProcessingError
            }
        }
    }

    fn into_result(self) -> MethodResult {
        let code = self.code();
        match (code, self) {
            (ErrorCode::OutOfMemory, err) => MethodResult::Error {
                code,
                message: "Image too large to process".to_string(),
                details: Some(err.to_string()),
            },
            (ErrorCode::InvalidArguments, HandlerError::Codec(err)) => MethodResult::Error {
                code,
                message: "Failed to decode image bytes".to_string(),
                details: Some(err.to_string()),
            },
            (_, err) => MethodResult::error(code, err.to_string()),
        }
    }
}

/// Stateless dispatcher for [`MethodCall`]s.
#[derive(Debug, Clone, Default)]
pub struct MethodHandler {
    options: EngineOptions,
    limits: Limits,
}

impl MethodHandler {
    /// Create a handler whose transforms use `options`.
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            limits: Limits::default(),
        }
    }

    /// Decode incoming images under `limits`.
    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Service one parsed call.
    pub fn handle(&self, call: &MethodCall) -> MethodResponse {
        tracing::debug!("method call received: {}", call.method);

        let result = match call.method.parse::<Method>() {
            Ok(Method::ApplyAdjustments) => match self.apply_adjustments(&call.arguments) {
                Ok(png) => MethodResult::success(BASE64.encode(png)),
                Err(e) => {
                    tracing::error!("applyAdjustments failed: {e}");
                    e.into_result()
                }
            },
            Ok(Method::GetSupportedAdjustments) => {
                MethodResult::success(Adjustment::supported_names())
            }
            Ok(Method::IsAvailable) => MethodResult::success(true),
            Ok(Method::TestConnection) => MethodResult::success(CONNECTION_OK),
            Err(()) => {
                tracing::warn!("method not implemented: {}", call.method);
                MethodResult::NotImplemented
            }
        };

        MethodResponse {
            id: call.id,
            result,
        }
    }

    /// Service one raw JSON request, always producing a JSON reply.
    pub fn handle_json(&self, text: &str) -> String {
        let response = match serde_json::from_str::<MethodCall>(text) {
            Ok(call) => self.handle(&call),
            Err(e) => {
                tracing::warn!("failed to parse method call: {e}");
                MethodResponse {
                    id: None,
                    result: MethodResult::Error {
                        code: ErrorCode::UnexpectedError,
                        message: format!("An unexpected error occurred: {e}"),
                        details: None,
                    },
                }
            }
        };
        // A response is plain data and always serializes.
        serde_json::to_string(&response).unwrap_or_else(|e| {
            tracing::error!("failed to serialize response: {e}");
            String::from(r#"{"status":"error","code":"UNEXPECTED_ERROR","message":"serialization failed"}"#)
        })
    }

    /// Decode, adjust and re-encode an image, returning PNG bytes.
    pub fn apply_adjustments(&self, arguments: &Value) -> Result<Vec<u8>, HandlerError> {
        let args = arguments
            .as_object()
            .ok_or_else(|| HandlerError::InvalidArguments("Arguments must be a Map".into()))?;
        let image_bytes = image_bytes(args)?;
        let adjustments = args
            .get("adjustments")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                HandlerError::InvalidArguments("adjustments is required and must be Map".into())
            })?;

        tracing::debug!("image bytes size: {}", image_bytes.len());
        let set = AdjustmentSet::from_json_map(adjustments);
        tracing::debug!(?set, "adjustments");

        let source = codec::decode_with_limits(&image_bytes, self.limits.clone())?;
        tracing::debug!("original image: {}x{}", source.width, source.height);

        let engine = TransformEngine::with_options(&set, self.options);
        let adjusted = engine.apply(&source)?;
        let png = codec::encode_png(&adjusted)?;

        tracing::info!(
            "adjustment complete: {}x{}, {} bytes",
            adjusted.width,
            adjusted.height,
            png.len()
        );
        Ok(png)
    }
}

/// Extract `imageBytes`, given either as a base64 string or a byte array.
///
/// A missing value or one of the wrong JSON kind is `INVALID_ARGUMENTS`, like
/// a missing `adjustments` map. An array whose elements are not bytes is
/// `TYPE_ERROR`.
fn image_bytes(args: &Map<String, Value>) -> Result<Vec<u8>, HandlerError> {
    match args.get("imageBytes") {
        Some(Value::String(encoded)) => BASE64.decode(encoded.as_bytes()).map_err(|e| {
            HandlerError::InvalidArguments(format!("imageBytes is not valid base64: {e}"))
        }),
        Some(raw @ Value::Array(_)) => serde_json::from_value::<Vec<u8>>(raw.clone())
            .map_err(|e| HandlerError::Type(format!("imageBytes: {e}"))),
        _ => Err(HandlerError::InvalidArguments(
            "imageBytes is required and must be ByteArray".into(),
        )),
    }
}
