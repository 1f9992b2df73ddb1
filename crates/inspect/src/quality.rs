use crate::error::{Error, ErrorKind};
use std::fmt;
use std::str::FromStr;

/// Encode quality, validated to `0..=100`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(u8);
impl Quality {
    pub const MAX: Self = Self(100);

    pub fn get(&self) -> u8 {
        self.0
    }
}
impl Default for Quality {
    fn default() -> Self {
        Self::MAX
    }
}
impl TryFrom<i64> for Quality {
    type Error = Error;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(q) if q <= 100 => Ok(Self(q)),
            _ => exn::bail!(ErrorKind::InvalidQuality(value.to_string())),
        }
    }
}
impl FromStr for Quality {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s.trim().parse().map_err(|_| Error::from(ErrorKind::InvalidQuality(s.to_string())))?;
        Self::try_from(value)
    }
}
impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", 0)]
    #[case("85", 85)]
    #[case(" 100 ", 100)]
    fn test_from_str(#[case] test: &str, #[case] expected: u8) {
        assert_eq!(test.parse::<Quality>().unwrap().get(), expected);
    }

    #[rstest]
    #[case("101")]
    #[case("-1")]
    #[case("high")]
    #[case("85%")]
    #[case("")]
    fn test_from_str_invalid(#[case] test: &str) {
        let err = test.parse::<Quality>().unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidQuality(_)));
    }

    #[test]
    fn test_default_is_max() {
        assert_eq!(Quality::default(), Quality::MAX);
        assert!(Quality::try_from(256).is_err());
    }
}
