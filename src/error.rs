//! Errors reported by the driver.

/// Everything that can go wrong talking to an ST7565.
///
/// Errors from the underlying HAL are not carried along; the bus is treated as reliable, so a
/// failure is reported as its kind and the in-flight operation is abandoned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The transport or one of the control lines was never connected to the driver.
    #[error("display resource unavailable")]
    ResourceUnavailable,
    /// A write to the serial transport failed.
    #[error("display transport write failed")]
    Transport,
    /// The command/data select or reset line could not be driven.
    #[error("display control line could not be driven")]
    ControlLine,
    /// The controller cannot do what was asked.
    #[error("operation not supported by the display")]
    NotSupported,
    /// A parameter, region or configuration is out of range.
    #[error("invalid argument")]
    InvalidArgument,
}
