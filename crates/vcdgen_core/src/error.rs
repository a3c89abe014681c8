//! Error types for building a signal hierarchy and emitting VCD documents.
//!
//! Misuse is reported at the offending call. Only rendering failures are
//! discovered during emission, and those carry the signal and time that
//! triggered them.

use std::io;

/// Errors that can occur while building, recording, or emitting a waveform.
#[derive(Debug, thiserror::Error)]
pub enum VcdError {
    /// A signal was declared twice under the same hierarchical path, or
    /// attached to more than one module.
    #[error("signal '{path}' is already registered")]
    DuplicateSignalRegistration {
        /// Fully-qualified path of the signal (`top.sub.name`).
        path: String,
    },

    /// A value was recorded for a signal that no module declares, or the
    /// handle does not belong to this session.
    #[error("signal {signal} is not declared by any module")]
    UnregisteredSignalReference {
        /// Name or handle of the offending signal.
        signal: String,
    },

    /// A declared width is zero or does not fit the 64-bit value register.
    #[error("unsupported width {width} for signal '{signal}' (supported: 1..=63)")]
    UnsupportedWidth {
        /// Name of the offending signal.
        signal: String,
        /// The declared width.
        width: u32,
    },

    /// A recorded value has bits set above the signal's declared width.
    #[error("value {value} does not fit in {width} bit(s) of signal '{signal}'")]
    ValueOverflow {
        /// Path of the offending signal.
        signal: String,
        /// The rejected value.
        value: u64,
        /// The declared width.
        width: u32,
    },

    /// No usable output destination was configured.
    #[error("invalid output sink: {reason}")]
    InvalidSink {
        /// Why the sink cannot be used.
        reason: String,
    },

    /// A value change could not be rendered during emission.
    #[error("cannot render '{signal}' at time {time}: {reason}")]
    Render {
        /// Path of the signal being rendered.
        signal: String,
        /// Timestamp of the observation being rendered.
        time: u64,
        /// What went wrong.
        reason: String,
    },

    /// A signal or module was given an empty name.
    #[error("{kind} name must not be empty")]
    EmptyName {
        /// `"signal"` or `"module"`.
        kind: &'static str,
    },

    /// A streamed scope or signal name contains the `.` path separator.
    #[error("{kind} name '{name}' must not contain '.'")]
    DottedName {
        /// `"signal"` or `"scope"`.
        kind: &'static str,
        /// The rejected name.
        name: String,
    },

    /// A module handle does not belong to this session.
    #[error("module {0} not found in session")]
    UnknownModule(u32),

    /// A submodule attachment would break the tree shape.
    #[error("invalid hierarchy: {reason}")]
    InvalidHierarchy {
        /// Why the attachment was refused.
        reason: String,
    },

    /// A streaming call arrived in the wrong phase of the document.
    #[error("out of order: {reason}")]
    OutOfOrder {
        /// Which call was made and why it is not allowed now.
        reason: String,
    },

    /// A streaming timestamp moved backwards.
    #[error("time went backwards from {previous} to {time}")]
    TimeWentBackwards {
        /// The last timestamp written.
        previous: u64,
        /// The rejected timestamp.
        time: u64,
    },

    /// A binary string contained something other than `0`/`1`, or was too long.
    #[error("invalid binary value '{bits}' for a {width}-bit signal")]
    InvalidBits {
        /// The rejected digits.
        bits: String,
        /// Width of the target signal.
        width: u32,
    },

    /// Writing to the sink failed.
    #[error("waveform I/O error: {0}")]
    Io(#[from] io::Error),
}
