//! Gemini status codes and their categories.
//!
//! A status code is two digits. The first digit selects the [`StatusCategory`], the second
//! refines it. Only a handful of codes get a named constant; any code whose leading digit
//! falls into a known category can be built with [`StatusCode::from_u8`].

use std::fmt;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// A validated Gemini status code in the range `10..=69`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusCode(u8);

/// Coarse classification of a status code by its leading digit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    /// 1x: the client should prompt for input and retry
    Input,
    /// 2x: the meta is a media type and a body follows
    Success,
    /// 3x: the meta is the new location
    Redirect,
    /// 4x: the request may succeed if retried later
    TemporaryFailure,
    /// 5x: the request will not succeed if retried
    PermanentFailure,
    /// 6x: the resource requires a client certificate
    ClientCertificateRequired,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid gemini status code: {0}")]
pub struct InvalidStatusCode(pub u8);

impl StatusCode {
    pub const INPUT: StatusCode = StatusCode(10);
    pub const SENSITIVE_INPUT: StatusCode = StatusCode(11);
    pub const SUCCESS: StatusCode = StatusCode(20);
    pub const REDIRECT: StatusCode = StatusCode(30);
    pub const PERMANENT_REDIRECT: StatusCode = StatusCode(31);
    pub const TEMPORARY_FAILURE: StatusCode = StatusCode(40);
    pub const PERMANENT_FAILURE: StatusCode = StatusCode(50);
    pub const NOT_FOUND: StatusCode = StatusCode(51);
    pub const BAD_REQUEST: StatusCode = StatusCode(59);
    pub const CLIENT_CERTIFICATE_REQUIRED: StatusCode = StatusCode(60);

    /// Builds a status code, rejecting values outside `10..=69`.
    pub const fn from_u8(code: u8) -> Result<Self, InvalidStatusCode> {
        if code >= 10 && code <= 69 { Ok(StatusCode(code)) } else { Err(InvalidStatusCode(code)) }
    }

    #[inline]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    pub const fn category(&self) -> StatusCategory {
        match self.0 / 10 {
            1 => StatusCategory::Input,
            2 => StatusCategory::Success,
            3 => StatusCategory::Redirect,
            4 => StatusCategory::TemporaryFailure,
            5 => StatusCategory::PermanentFailure,
            // construction guarantees 10..=69
            _ => StatusCategory::ClientCertificateRequired,
        }
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self.category(), StatusCategory::Success)
    }

    #[inline]
    pub const fn is_failure(&self) -> bool {
        matches!(self.category(), StatusCategory::TemporaryFailure | StatusCategory::PermanentFailure)
    }
}

impl TryFrom<u8> for StatusCode {
    type Error = InvalidStatusCode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        StatusCode::from_u8(value)
    }
}

impl From<StatusCode> for u8 {
    fn from(code: StatusCode) -> Self {
        code.0
    }
}

impl Display for StatusCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
