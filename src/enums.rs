use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Sample storage type used when encoding a volume to disk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PixelType {
    Uint8,
    Uint16,
    Float,
    #[default]
    Double,
}

#[derive(Debug, Error)]
#[error("unrecognized pixel type tag: {0:?}")]
pub struct UnknownPixelType(pub String);

impl FromStr for PixelType {
    type Err = UnknownPixelType;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "uint8" => Ok(PixelType::Uint8),
            "uint16" => Ok(PixelType::Uint16),
            "float" => Ok(PixelType::Float),
            "double" => Ok(PixelType::Double),
            other => Err(UnknownPixelType(other.to_string())),
        }
    }
}

impl fmt::Display for PixelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            PixelType::Uint8 => "uint8",
            PixelType::Uint16 => "uint16",
            PixelType::Float => "float",
            PixelType::Double => "double",
        };
        write!(f, "{tag}")
    }
}
