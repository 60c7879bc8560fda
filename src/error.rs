//! Driver result codes and the facade error taxonomy.
//!
//! Every driver primitive returns a [`ResultCode`] (`esp_err_t` on the
//! device). The facades never translate or swallow these codes; callers
//! that want `?` propagation convert with [`ResultCode::check`].

use core::fmt;

// ---------------------------------------------------------------------------
// Sentinels for calls that return a value instead of a code
// ---------------------------------------------------------------------------

/// Returned by the I2C slave read/write calls when parameters are invalid.
pub const BYTES_FAIL: i32 = -1;

/// Returned by `PwmFacade::duty` when the duty register cannot be read.
pub const DUTY_ERROR: i32 = -1;

/// Returned by `PwmFacade::frequency` when the timer frequency cannot be read.
pub const FREQ_ERROR: u32 = 0;

// ---------------------------------------------------------------------------
// Result code
// ---------------------------------------------------------------------------

/// Opaque driver result code. Only equality is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use]
#[repr(transparent)]
pub struct ResultCode(i32);

impl ResultCode {
    /// The reserved success value (`ESP_OK`).
    pub const OK: Self = Self(0);
    /// Generic driver failure (`ESP_FAIL`).
    pub const FAIL: Self = Self(-1);
    /// Out of memory (`ESP_ERR_NO_MEM`).
    pub const NO_MEM: Self = Self(0x101);
    /// Malformed handle or configuration (`ESP_ERR_INVALID_ARG`).
    pub const INVALID_ARG: Self = Self(0x102);
    /// Operation attempted out of sequence (`ESP_ERR_INVALID_STATE`).
    pub const INVALID_STATE: Self = Self(0x103);
    /// Operation timed out (`ESP_ERR_TIMEOUT`).
    pub const TIMEOUT: Self = Self(0x107);

    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }

    pub const fn is_ok(self) -> bool {
        self.0 == Self::OK.0
    }

    /// Classify the code into the shared error taxonomy.
    pub fn kind(self) -> ErrorKind {
        match self {
            Self::OK => ErrorKind::Success,
            Self::INVALID_ARG => ErrorKind::InvalidArgument,
            Self::INVALID_STATE => ErrorKind::InvalidState,
            Self::FAIL => ErrorKind::DriverFailure,
            other => ErrorKind::Other(other.0),
        }
    }

    /// `Ok(())` for [`ResultCode::OK`], otherwise the matching [`FacadeError`].
    pub fn check(self) -> Result<()> {
        match self.kind() {
            ErrorKind::Success => Ok(()),
            ErrorKind::InvalidArgument => Err(FacadeError::InvalidArgument),
            ErrorKind::InvalidState => Err(FacadeError::InvalidState),
            ErrorKind::DriverFailure => Err(FacadeError::DriverFailure),
            ErrorKind::Other(_) => Err(FacadeError::Other(self)),
        }
    }

    fn name(self) -> Option<&'static str> {
        match self {
            Self::OK => Some("ESP_OK"),
            Self::FAIL => Some("ESP_FAIL"),
            Self::NO_MEM => Some("ESP_ERR_NO_MEM"),
            Self::INVALID_ARG => Some("ESP_ERR_INVALID_ARG"),
            Self::INVALID_STATE => Some("ESP_ERR_INVALID_STATE"),
            Self::TIMEOUT => Some("ESP_ERR_TIMEOUT"),
            _ => None,
        }
    }
}

impl From<i32> for ResultCode {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl From<ResultCode> for i32 {
    fn from(code: ResultCode) -> Self {
        code.0
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "0x{:x}", self.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

/// Meaning of a [`ResultCode`], shared by the bus and PWM facades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Success,
    /// Malformed handle or configuration.
    InvalidArgument,
    /// Operation attempted out of the required sequence.
    InvalidState,
    /// Generic internal driver failure, e.g. no valid pre-divider.
    DriverFailure,
    /// Any other driver code, carried raw.
    Other(i32),
}

// ---------------------------------------------------------------------------
// Error type for `?` propagation
// ---------------------------------------------------------------------------

/// Failure produced by [`ResultCode::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacadeError {
    InvalidArgument,
    InvalidState,
    DriverFailure,
    Other(ResultCode),
}

impl FacadeError {
    /// The driver code this error was produced from.
    pub fn code(self) -> ResultCode {
        match self {
            Self::InvalidArgument => ResultCode::INVALID_ARG,
            Self::InvalidState => ResultCode::INVALID_STATE,
            Self::DriverFailure => ResultCode::FAIL,
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for FacadeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::InvalidState => write!(f, "invalid state"),
            Self::DriverFailure => write!(f, "driver failure"),
            Self::Other(code) => write!(f, "driver error {code}"),
        }
    }
}

impl std::error::Error for FacadeError {}

impl embedded_hal::pwm::Error for FacadeError {
    fn kind(&self) -> embedded_hal::pwm::ErrorKind {
        embedded_hal::pwm::ErrorKind::Other
    }
}

/// Facade-wide `Result` alias.
pub type Result<T, E = FacadeError> = core::result::Result<T, E>;
