//! Proof-of-work algorithm selection and per-algorithm defaults.

use core::str::FromStr;

use crate::error::GenesisError;

/// Default compact bits for double-SHA256 chains (difficulty 1).
pub const SHA256D_DEFAULT_BITS: u32 = 0x1d00ffff;

/// Default compact bits for scrypt and the X-family.
pub const MEMORY_HARD_DEFAULT_BITS: u32 = 0x1e0ffff0;

/// Proof-of-work algorithm used to hash the block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// SHA256(SHA256(header))
    #[default]
    Sha256d,
    /// scrypt with N=1024, r=1, p=1
    Scrypt,
    /// X11 chained hash (external backend)
    X11,
    /// X13 chained hash (external backend)
    X13,
    /// X15 chained hash (external backend)
    X15,
}

impl Algorithm {
    /// All supported algorithms.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Sha256d,
        Algorithm::Scrypt,
        Algorithm::X11,
        Algorithm::X13,
        Algorithm::X15,
    ];

    /// Compact bits used when the configuration does not supply any.
    pub fn default_bits(&self) -> u32 {
        match self {
            Algorithm::Sha256d => SHA256D_DEFAULT_BITS,
            Algorithm::Scrypt | Algorithm::X11 | Algorithm::X13 | Algorithm::X15 => {
                MEMORY_HARD_DEFAULT_BITS
            }
        }
    }

    /// Get the algorithm name as used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Sha256d => "SHA256",
            Algorithm::Scrypt => "scrypt",
            Algorithm::X11 => "X11",
            Algorithm::X13 => "X13",
            Algorithm::X15 => "X15",
        }
    }
}

impl FromStr for Algorithm {
    type Err = GenesisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sha256" | "sha256d" => Ok(Algorithm::Sha256d),
            "scrypt" => Ok(Algorithm::Scrypt),
            "x11" => Ok(Algorithm::X11),
            "x13" => Ok(Algorithm::X13),
            "x15" => Ok(Algorithm::X15),
            _ => Err(GenesisError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl core::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bits() {
        assert_eq!(Algorithm::Sha256d.default_bits(), 0x1d00ffff);
        for algorithm in [Algorithm::Scrypt, Algorithm::X11, Algorithm::X13, Algorithm::X15] {
            assert_eq!(algorithm.default_bits(), 0x1e0ffff0, "{algorithm}");
        }
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("SHA256".parse::<Algorithm>().unwrap(), Algorithm::Sha256d);
        assert_eq!("sha256d".parse::<Algorithm>().unwrap(), Algorithm::Sha256d);
        assert_eq!("scrypt".parse::<Algorithm>().unwrap(), Algorithm::Scrypt);
        assert_eq!("x13".parse::<Algorithm>().unwrap(), Algorithm::X13);
        assert!(matches!(
            "blake2".parse::<Algorithm>(),
            Err(GenesisError::UnsupportedAlgorithm(name)) if name == "blake2"
        ));
    }

    #[test]
    fn test_name_roundtrip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
        }
    }
}
