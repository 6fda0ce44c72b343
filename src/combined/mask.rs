use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaskError {
    #[error("unknown operation `{0}` in type mask (expected any of C, R, D)")]
    UnknownOperation(char),
}

/// Which phases of a combined run are requested.
///
/// Parsed from a string of single-character tokens (`C`reate, `R`eaddir,
/// `D`elete), case-insensitive and in any order. Repeats are harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationMask {
    pub create: bool,
    pub readdir: bool,
    pub delete: bool,
}

impl OperationMask {
    pub const ALL: OperationMask = OperationMask {
        create: true,
        readdir: true,
        delete: true,
    };

    pub const NONE: OperationMask = OperationMask {
        create: false,
        readdir: false,
        delete: false,
    };

    pub fn parse(raw: &str) -> Result<Self, MaskError> {
        let mut mask = OperationMask::NONE;
        for c in raw.chars().filter(|c| !c.is_whitespace() && *c != ',') {
            match c.to_ascii_uppercase() {
                'C' => mask.create = true,
                'R' => mask.readdir = true,
                'D' => mask.delete = true,
                _ => return Err(MaskError::UnknownOperation(c)),
            }
        }
        Ok(mask)
    }
}

impl Default for OperationMask {
    fn default() -> Self {
        OperationMask::ALL
    }
}

impl FromStr for OperationMask {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationMask::parse(s)
    }
}

/// Canonical `CRD` ordering, omitting phases that are off.
impl fmt::Display for OperationMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.create {
            f.write_str("C")?;
        }
        if self.readdir {
            f.write_str("R")?;
        }
        if self.delete {
            f.write_str("D")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_and_case_do_not_matter() {
        assert_eq!(OperationMask::parse("dRc").unwrap(), OperationMask::ALL);
        assert_eq!(OperationMask::parse("C,R,D").unwrap(), OperationMask::ALL);
        let r = OperationMask::parse("r").unwrap();
        assert!(r.readdir && !r.create && !r.delete);
        assert_eq!(r.to_string(), "R");
    }

    #[test]
    fn empty_mask_requests_nothing() {
        assert_eq!(OperationMask::parse("").unwrap(), OperationMask::NONE);
    }

    #[test]
    fn unknown_token_is_rejected() {
        assert_eq!(
            "CX".parse::<OperationMask>(),
            Err(MaskError::UnknownOperation('X'))
        );
    }
}
