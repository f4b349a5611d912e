//! # Constants
//!
//! Shared constants used throughout the provider.
//!
//! These values represent reasonable defaults and can be overridden via
//! environment variables where applicable (see [`crate::config`]).

/// Object type used when a secret object does not set `objectType`
pub const OBJECT_TYPE_KMS: &str = "kms";

/// Object type for OOS secret parameters
pub const OBJECT_TYPE_OOS: &str = "oos";

/// Path translation character used when `pathTranslation` is empty
pub const DEFAULT_PATH_TRANSLATION: char = '_';

/// Separator translated or stripped when deriving file names
pub const PATH_SEPARATOR: char = '/';

/// Value of `pathTranslation` (case-insensitive) that disables translation
pub const PATH_TRANSLATION_DISABLED: &str = "false";

/// Prefix identifying a fully-qualified resource name (ARN)
pub const ARN_PREFIX: &str = "acs:";

/// The only service an ARN object name may reference
pub const ARN_SUPPORTED_SERVICE: &str = "kms";

/// Error code returned when the backend throttles a request
pub const ERROR_CODE_REJECTED_THROTTLING: &str = "Rejected.Throttling";

/// Error code returned when the backend is temporarily unavailable
pub const ERROR_CODE_SERVICE_UNAVAILABLE_TEMPORARY: &str = "ServiceUnavailableTemporary";

/// Error code returned on an internal backend failure
pub const ERROR_CODE_INTERNAL_FAILURE: &str = "InternalFailure";

/// Data type tag for binary payloads, which are not supported
pub const BINARY_DATA_TYPE: &str = "binary";

/// Version recorded for OOS secret parameters (the API exposes no version id)
pub const OOS_PLACEHOLDER_VERSION: &str = "v1";

/// Default base interval for retry backoff (milliseconds)
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 1000;

/// Default ceiling for retry backoff (milliseconds)
pub const DEFAULT_BACKOFF_MAX_MS: u64 = 10_000;

/// Attempt number passed to the backoff policy before the single retry
pub const RETRY_BACKOFF_ATTEMPT: u32 = 1;

/// Default maximum time to wait for a rate-limit token (seconds)
pub const DEFAULT_RATE_LIMIT_WAIT_TIMEOUT_SECS: u64 = 300;

/// Default KMS request rate (tokens per second)
pub const DEFAULT_KMS_RATE_LIMIT_QPS: f64 = 10.0;

/// Default KMS bucket size
pub const DEFAULT_KMS_RATE_LIMIT_BURST: u32 = 10;

/// Default OOS request rate (tokens per second)
pub const DEFAULT_OOS_RATE_LIMIT_QPS: f64 = 10.0;

/// Default OOS bucket size
pub const DEFAULT_OOS_RATE_LIMIT_BURST: u32 = 10;

/// Default mode for materialized secret files
pub const DEFAULT_FILE_PERMISSION: u32 = 0o644;

/// Mount attribute holding the secret object specification
pub const ATTRIBUTE_OBJECTS: &str = "objects";

/// Mount attribute holding the path translation setting
pub const ATTRIBUTE_PATH_TRANSLATION: &str = "pathTranslation";
