//! Port and port range types.
//!
//! This module provides the validated port number type and the half-open
//! range of ports an authority hands assignments out of.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A valid network port number (1-65535).
///
/// Port 0 is rejected since it has special meaning in networking contexts.
///
/// # Examples
///
/// ```
/// use warden::Port;
///
/// let port = Port::try_from(30000).unwrap();
/// assert_eq!(port.value(), 30000);
///
/// assert!(Port::try_from(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// The minimum valid port number.
    pub const MIN: u16 = 1;

    /// The maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Returns the underlying port number.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Parses a port from the textual form the store keeps set members and
    /// map values in.
    ///
    /// # Errors
    ///
    /// Returns an error when the text is not a valid port number. Callers
    /// treat this as evidence of a corrupted store, not caller error.
    pub fn from_store_member(text: &str) -> Result<Self, InvalidPortError> {
        let value: u16 = text.parse().map_err(|_| InvalidPortError {
            value: 0,
            reason: format!("store member '{text}' is not a port number"),
        })?;
        Self::try_from(value)
    }
}

impl TryFrom<u16> for Port {
    type Error = InvalidPortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(InvalidPortError {
                value,
                reason: "port 0 is invalid".into(),
            })
        } else {
            Ok(Self(value))
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for invalid port numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPortError {
    /// The invalid port value.
    pub value: u16,
    /// The reason the port is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidPortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid port {}: {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidPortError {}

/// A half-open range of ports, `[start, end)`.
///
/// The range is established once at initialization time and never changes
/// for the lifetime of a pool; growing capacity means initializing a fresh
/// store with a wider range.
///
/// # Examples
///
/// ```
/// use warden::{Port, PortRange};
///
/// let range = PortRange::new(30000, 30003).unwrap();
/// assert_eq!(range.len(), 3);
/// assert!(range.contains(Port::try_from(30002).unwrap()));
/// assert!(!range.contains(Port::try_from(30003).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    /// Creates a new half-open port range `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is not a valid port or if the range is
    /// empty (`end <= start`).
    pub fn new(start: u16, end: u16) -> Result<Self, InvalidPortRangeError> {
        if start < Port::MIN {
            return Err(InvalidPortRangeError {
                start,
                end,
                reason: "start must be a valid port".into(),
            });
        }
        if end <= start {
            return Err(InvalidPortRangeError {
                start,
                end,
                reason: "end must be greater than start".into(),
            });
        }
        Ok(Self { start, end })
    }

    /// Returns the first port in the range.
    #[must_use]
    pub const fn start(&self) -> u16 {
        self.start
    }

    /// Returns the exclusive upper bound of the range.
    #[must_use]
    pub const fn end(&self) -> u16 {
        self.end
    }

    /// Returns `true` if the range contains the given port.
    #[must_use]
    pub const fn contains(&self, port: Port) -> bool {
        port.value() >= self.start && port.value() < self.end
    }

    /// Returns the number of ports in the range.
    #[must_use]
    pub const fn len(&self) -> u16 {
        self.end - self.start
    }

    /// Returns `true` if the range contains no ports.
    ///
    /// Never true for a constructed `PortRange`; provided for completeness.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over every port in the range.
    ///
    /// # Examples
    ///
    /// ```
    /// use warden::PortRange;
    ///
    /// let range = PortRange::new(30000, 30003).unwrap();
    /// let ports: Vec<u16> = range.iter().map(|p| p.value()).collect();
    /// assert_eq!(ports, vec![30000, 30001, 30002]);
    /// ```
    #[must_use]
    pub fn iter(self) -> PortRangeIter {
        PortRangeIter {
            range: self,
            current: u32::from(self.start),
        }
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl IntoIterator for PortRange {
    type Item = Port;
    type IntoIter = PortRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over ports in a `PortRange`.
// Tracks the cursor as u32 so a range ending at 65535 cannot overflow.
#[derive(Debug)]
pub struct PortRangeIter {
    range: PortRange,
    current: u32,
}

impl Iterator for PortRangeIter {
    type Item = Port;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current < u32::from(self.range.end) {
            #[allow(clippy::cast_possible_truncation)]
            let port = Port(self.current as u16);
            self.current += 1;
            Some(port)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = u32::from(self.range.end).saturating_sub(self.current) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PortRangeIter {
    fn len(&self) -> usize {
        self.size_hint().0
    }
}

/// Error type for invalid port ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPortRangeError {
    /// The requested start of the range.
    pub start: u16,
    /// The requested exclusive end of the range.
    pub end: u16,
    /// The reason the range is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidPortRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid port range {}..{}: {}",
            self.start, self.end, self.reason
        )
    }
}

impl std::error::Error for InvalidPortRangeError {}
