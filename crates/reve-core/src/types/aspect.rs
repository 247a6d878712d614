//! Output aspect ratios

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::validator::ValidationError;

/// Aspect ratio of a generated image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Ratio16x9,
    #[serde(rename = "9:16")]
    Ratio9x16,
    #[serde(rename = "3:2")]
    Ratio3x2,
    #[serde(rename = "2:3")]
    Ratio2x3,
    #[serde(rename = "4:3")]
    Ratio4x3,
    #[serde(rename = "3:4")]
    Ratio3x4,
    #[serde(rename = "1:1")]
    Ratio1x1,
    #[serde(rename = "auto")]
    Auto,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 8] = [
        AspectRatio::Ratio16x9,
        AspectRatio::Ratio9x16,
        AspectRatio::Ratio3x2,
        AspectRatio::Ratio2x3,
        AspectRatio::Ratio4x3,
        AspectRatio::Ratio3x4,
        AspectRatio::Ratio1x1,
        AspectRatio::Auto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Ratio16x9 => "16:9",
            AspectRatio::Ratio9x16 => "9:16",
            AspectRatio::Ratio3x2 => "3:2",
            AspectRatio::Ratio2x3 => "2:3",
            AspectRatio::Ratio4x3 => "4:3",
            AspectRatio::Ratio3x4 => "3:4",
            AspectRatio::Ratio1x1 => "1:1",
            AspectRatio::Auto => "auto",
        }
    }

    /// Width and height units; `(0, 0)` for [`AspectRatio::Auto`]
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            AspectRatio::Ratio16x9 => (16, 9),
            AspectRatio::Ratio9x16 => (9, 16),
            AspectRatio::Ratio3x2 => (3, 2),
            AspectRatio::Ratio2x3 => (2, 3),
            AspectRatio::Ratio4x3 => (4, 3),
            AspectRatio::Ratio3x4 => (3, 4),
            AspectRatio::Ratio1x1 => (1, 1),
            AspectRatio::Auto => (0, 0),
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == s)
            .ok_or(ValidationError::InvalidAspectRatio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for ratio in AspectRatio::ALL {
            assert_eq!(ratio.to_string().parse::<AspectRatio>().unwrap(), ratio);
        }
        assert_eq!("16:10".parse::<AspectRatio>(), Err(ValidationError::InvalidAspectRatio));
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(AspectRatio::Ratio16x9.dimensions(), (16, 9));
        assert_eq!(AspectRatio::Ratio3x4.dimensions(), (3, 4));
        assert_eq!(AspectRatio::Auto.dimensions(), (0, 0));
    }

    #[test]
    fn test_serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&AspectRatio::Ratio1x1).unwrap(), "\"1:1\"");
        let ratio: AspectRatio = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(ratio, AspectRatio::Auto);
    }
}
