use hex::FromHexError;

/// Standard Result used in the library
pub type Result<T> = std::result::Result<T, Error>;

/// Standard error type used in the library
#[derive(Debug)]
pub enum Error {
    /// The data provided is too small to perform the operation.
    DataTooSmall,
    /// The data provided is too large to perform the operation.
    DataTooLarge,
    /// Push onto a full stack
    StackOverflow,
    /// Pop from an empty stack
    StackUnderflow,
    /// Unrecognized Opcode
    UnrecognizedOpCode,
    /// OP_PUSH operand missing or extending past the end of the program
    TruncatedPush,
    /// Compressed public key does not start with 0x02 or 0x03
    BadPublicKeyFormat,
    /// Stack-popped signature frame does not start with the DER SEQUENCE marker
    SignatureNotDer,
    /// Stack-popped signature frame declares a body longer than the DER limit
    SignatureTooLong,
    /// Multisig key or signature counts are zero or inconsistent
    BadMultisigCounts,
    /// DER sequence or integer tag or length is malformed
    BadDerEncoding,
    /// DER integer exceeds 32 bytes after stripping the leading zero
    DerIntegerTooLarge,
    /// Envelope is shorter than its prefix
    EnvelopeTooSmall,
    /// Envelope prefix does not match the expected tag
    BadEnvelopePrefix,
    /// OP_DEVICEID evaluated without a device context
    MissingDeviceContext,
    /// Device identifier is not exactly 32 bytes
    BadDeviceIdLength,
    /// Hex string could not be decoded
    FromHexError(FromHexError),
}

/// The violation classes of the machine, used by tests and differential fuzzing.
///
/// Every class maps to rejection at the machine001 boundary; the distinction is
/// internal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Stack underflow or overflow
    Stack,
    /// Unknown opcode, truncated operand, or malformed stack-popped object
    Decode,
    /// Malformed DER signature body
    Der,
    /// Wrong envelope prefix or short envelope
    Envelope,
    /// Absent or wrongly-sized device identifier
    Context,
    /// Everything outside the evaluation contracts
    Other,
}

impl Error {
    /// The violation class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::StackOverflow | Error::StackUnderflow => ErrorKind::Stack,
            Error::UnrecognizedOpCode
            | Error::TruncatedPush
            | Error::BadPublicKeyFormat
            | Error::SignatureNotDer
            | Error::SignatureTooLong
            | Error::BadMultisigCounts
            | Error::DataTooSmall => ErrorKind::Decode,
            Error::BadDerEncoding | Error::DerIntegerTooLarge => ErrorKind::Der,
            Error::EnvelopeTooSmall | Error::BadEnvelopePrefix => ErrorKind::Envelope,
            Error::MissingDeviceContext | Error::BadDeviceIdLength => ErrorKind::Context,
            Error::DataTooLarge | Error::FromHexError(_) => ErrorKind::Other,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::DataTooSmall => f.write_str("data too small"),
            Error::DataTooLarge => f.write_str("data too large"),
            Error::StackOverflow => f.write_str("stack overflow"),
            Error::StackUnderflow => f.write_str("stack underflow"),
            Error::UnrecognizedOpCode => f.write_str("unrecognized opcode"),
            Error::TruncatedPush => f.write_str("push operand extends past end of program"),
            Error::BadPublicKeyFormat => f.write_str("unknown public key format"),
            Error::SignatureNotDer => f.write_str("signature is not valid DER encoding"),
            Error::SignatureTooLong => f.write_str("DER signature too long"),
            Error::BadMultisigCounts => f.write_str("invalid multisig counts"),
            Error::BadDerEncoding => f.write_str("malformed DER encoding"),
            Error::DerIntegerTooLarge => f.write_str("DER integer too large"),
            Error::EnvelopeTooSmall => f.write_str("envelope too small"),
            Error::BadEnvelopePrefix => f.write_str("bad envelope prefix"),
            Error::MissingDeviceContext => f.write_str("no device context set"),
            Error::BadDeviceIdLength => f.write_str("device id must be exactly 32 bytes"),
            Error::FromHexError(e) => f.write_str(&format!("Hex decoding error: {}", e)),
        }
    }
}

impl std::error::Error for Error {}

impl From<FromHexError> for Error {
    fn from(e: FromHexError) -> Self {
        Error::FromHexError(e)
    }
}
