// 48-bit hardware addresses as carried in capture payloads

use crate::core::constants::MAC_ADDRESS_SIZE;
use crate::core::error::PnmError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A MAC address. Displays and serializes as lower-case colon-hex
/// (`aa:bb:cc:dd:ee:ff`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MacAddress([u8; MAC_ADDRESS_SIZE]);

impl MacAddress {
    pub const fn new(octets: [u8; MAC_ADDRESS_SIZE]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; MAC_ADDRESS_SIZE] {
        self.0
    }

    /// All-zero addresses are what a modem writes when the field was never populated.
    pub fn is_unset(&self) -> bool {
        self.0 == [0u8; MAC_ADDRESS_SIZE]
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            a, b, c, d, e, g
        )
    }
}

impl FromStr for MacAddress {
    type Err = PnmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PnmError::InvalidMacAddress(s.to_string());

        // Accept ':' or '-' separated, or a bare 12-digit hex string
        let digits: String = s
            .trim()
            .chars()
            .filter(|c| *c != ':' && *c != '-')
            .collect();
        if digits.len() != MAC_ADDRESS_SIZE * 2
            || !digits.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(invalid());
        }

        let mut octets = [0u8; MAC_ADDRESS_SIZE];
        for (i, octet) in octets.iter_mut().enumerate() {
            *octet = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Self(octets))
    }
}

impl From<[u8; MAC_ADDRESS_SIZE]> for MacAddress {
    fn from(octets: [u8; MAC_ADDRESS_SIZE]) -> Self {
        Self(octets)
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
