//! Unified error codes for the bookstore API
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Account errors
//! - 4xxx: Cart and order errors
//! - 6xxx: Catalog and upload errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Codes travel as plain `u16` values in every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Document was soft-deleted before
    AlreadyRemoved = 9,

    // ==================== 1xxx: Auth ====================
    /// No usable Authorization header
    NotAuthenticated = 1001,
    /// Password does not match
    IncorrectPassword = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Authorization scheme is not Bearer
    InvalidAuthScheme = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Account ====================
    /// User not found
    UserNotFound = 3001,
    /// Phone number is taken by an active user
    PhoneNumberExists = 3002,
    /// Email is taken by an active user
    EmailExists = 3003,
    /// Phone number cannot be normalized
    InvalidPhoneNumber = 3004,

    // ==================== 4xxx: Cart / Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Cart not found
    CartNotFound = 4002,
    /// Cart item not found
    CartItemNotFound = 4003,
    /// Order has no items
    OrderEmpty = 4004,
    /// Delivery, country and payment combination is not supported
    InvalidDeliveryOption = 4005,
    /// Guest order uses contact info of a registered user
    ContactBelongsToUser = 4006,
    /// Unknown order status
    InvalidOrderStatus = 4007,
    /// Delivery type not found
    DeliveryTypeNotFound = 4101,
    /// Payment type not found
    PaymentTypeNotFound = 4102,
    /// Country not found
    CountryNotFound = 4103,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product key already used
    ProductKeyExists = 6002,
    /// Product type not found
    ProductTypeNotFound = 6003,
    /// Product type cannot carry this payload
    ProductTypeMismatch = 6004,
    /// Publisher still owns books
    PublisherHasBooks = 6101,
    /// Section still owns products
    SectionHasProducts = 6201,
    /// Section cannot be its own ancestor
    SectionCycle = 6202,
    /// Review not found
    ReviewNotFound = 6301,

    // File Upload
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// Invalid image file
    InvalidImageFile = 6503,
    /// No file provided
    NoFileProvided = 6504,
    /// Empty file
    EmptyFile = 6505,
    /// No filename
    NoFilename = 6506,
    /// Invalid file extension
    InvalidFileExtension = 6507,
    /// Image processing failed
    ImageProcessingFailed = 6508,
    /// File storage failed
    FileStorageFailed = 6509,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
    /// Email or SMS dispatch failed
    NotificationFailed = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::AlreadyRemoved => "Document already removed",

            // Auth
            ErrorCode::NotAuthenticated => "Authorization header is missing",
            ErrorCode::IncorrectPassword => "Incorrect password",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",
            ErrorCode::InvalidAuthScheme => "Authorization scheme must be Bearer",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Role required",
            ErrorCode::AdminRequired => "Admin role required",

            // Account
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::PhoneNumberExists => "Phone number already in use",
            ErrorCode::EmailExists => "Email already in use",
            ErrorCode::InvalidPhoneNumber => "Invalid phone number",

            // Cart / Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::CartNotFound => "Cart not found",
            ErrorCode::CartItemNotFound => "Cart item not found",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::InvalidDeliveryOption => "Delivery option is not available",
            ErrorCode::ContactBelongsToUser => {
                "Contact info belongs to a registered user, please log in"
            }
            ErrorCode::InvalidOrderStatus => "Invalid order status",
            ErrorCode::DeliveryTypeNotFound => "Delivery type not found",
            ErrorCode::PaymentTypeNotFound => "Payment type not found",
            ErrorCode::CountryNotFound => "Country not found",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductKeyExists => "Product key already exists",
            ErrorCode::ProductTypeNotFound => "Product type not found",
            ErrorCode::ProductTypeMismatch => "Product type does not match the payload",
            ErrorCode::PublisherHasBooks => "Publisher still has books",
            ErrorCode::SectionHasProducts => "Section still has products",
            ErrorCode::SectionCycle => "Section cannot be nested into itself",
            ErrorCode::ReviewNotFound => "Review not found",

            // File Upload
            ErrorCode::FileTooLarge => "File is too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "File is empty",
            ErrorCode::NoFilename => "Filename is missing",
            ErrorCode::InvalidFileExtension => "Invalid file extension",
            ErrorCode::ImageProcessingFailed => "Image processing failed",
            ErrorCode::FileStorageFailed => "Failed to store file",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::NotificationFailed => "Failed to deliver notification",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::AlreadyRemoved),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::IncorrectPassword),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::InvalidAuthScheme),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),

            // Account
            3001 => Ok(ErrorCode::UserNotFound),
            3002 => Ok(ErrorCode::PhoneNumberExists),
            3003 => Ok(ErrorCode::EmailExists),
            3004 => Ok(ErrorCode::InvalidPhoneNumber),

            // Cart / Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::CartNotFound),
            4003 => Ok(ErrorCode::CartItemNotFound),
            4004 => Ok(ErrorCode::OrderEmpty),
            4005 => Ok(ErrorCode::InvalidDeliveryOption),
            4006 => Ok(ErrorCode::ContactBelongsToUser),
            4007 => Ok(ErrorCode::InvalidOrderStatus),
            4101 => Ok(ErrorCode::DeliveryTypeNotFound),
            4102 => Ok(ErrorCode::PaymentTypeNotFound),
            4103 => Ok(ErrorCode::CountryNotFound),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductKeyExists),
            6003 => Ok(ErrorCode::ProductTypeNotFound),
            6004 => Ok(ErrorCode::ProductTypeMismatch),
            6101 => Ok(ErrorCode::PublisherHasBooks),
            6201 => Ok(ErrorCode::SectionHasProducts),
            6202 => Ok(ErrorCode::SectionCycle),
            6301 => Ok(ErrorCode::ReviewNotFound),

            // File Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidImageFile),
            6504 => Ok(ErrorCode::NoFileProvided),
            6505 => Ok(ErrorCode::EmptyFile),
            6506 => Ok(ErrorCode::NoFilename),
            6507 => Ok(ErrorCode::InvalidFileExtension),
            6508 => Ok(ErrorCode::ImageProcessingFailed),
            6509 => Ok(ErrorCode::FileStorageFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::NotificationFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
