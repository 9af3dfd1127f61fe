//! Audio quality selection.
//!
//! Bugs! offers up to five encodings of a track, identified by the keys it
//! lists in a track's `bitrates`. The host asks for an abstract
//! [`QualityTier`]; [`resolve`] picks the best encoding at or below that tier
//! that the track actually has.
//!
//! | Key      | Codec | kbps | Bit depth |
//! |----------|-------|------|-----------|
//! | `flac24` | FLAC  | 2116 | 24        |
//! | `flac`   | FLAC  | 1411 | 16        |
//! | `aac256` | AAC   | 320  |           |
//! | `320k`   | MP3   | 320  |           |
//! | `aac`    | AAC   | 128  |           |
//!
//! The vendor reports `aac256` as 320 kbps, and so do we.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    host::{Codec, QualityTier},
};

/// A concrete encoding offered by Bugs!.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize,
)]
pub enum Bitrate {
    #[serde(rename = "flac24")]
    Flac24,
    #[serde(rename = "flac")]
    Flac,
    #[serde(rename = "aac256")]
    Aac256,
    #[serde(rename = "320k")]
    Mp3_320,
    #[serde(rename = "aac")]
    Aac,
}

/// Sample rate reported for every encoding, in kHz.
///
/// The vendor does not expose the real rate of hi-res sources.
pub const SAMPLE_RATE: f32 = 44.1;

impl Bitrate {
    /// All encodings, best first.
    pub const ORDER: [Bitrate; 5] = [
        Bitrate::Flac24,
        Bitrate::Flac,
        Bitrate::Aac256,
        Bitrate::Mp3_320,
        Bitrate::Aac,
    ];

    /// The vendor's key for this encoding.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flac24 => "flac24",
            Self::Flac => "flac",
            Self::Aac256 => "aac256",
            Self::Mp3_320 => "320k",
            Self::Aac => "aac",
        }
    }

    /// Nominal bitrate in kbps.
    #[must_use]
    pub fn kbps(self) -> u32 {
        match self {
            Self::Flac24 => 2116,
            Self::Flac => 1411,
            Self::Aac256 | Self::Mp3_320 => 320,
            Self::Aac => 128,
        }
    }

    #[must_use]
    pub fn codec(self) -> Codec {
        match self {
            Self::Flac24 | Self::Flac => Codec::Flac,
            Self::Aac256 | Self::Aac => Codec::Aac,
            Self::Mp3_320 => Codec::Mp3,
        }
    }

    /// Bit depth of lossless encodings; lossy ones have none.
    #[must_use]
    pub fn bit_depth(self) -> Option<u8> {
        match self {
            Self::Flac24 => Some(24),
            Self::Flac => Some(16),
            _ => None,
        }
    }

    fn position(self) -> usize {
        Self::ORDER
            .iter()
            .position(|bitrate| *bitrate == self)
            .unwrap_or(Self::ORDER.len() - 1)
    }
}

impl From<QualityTier> for Bitrate {
    /// The best encoding a tier allows.
    fn from(tier: QualityTier) -> Self {
        match tier {
            QualityTier::Minimum | QualityTier::Low => Self::Aac,
            QualityTier::Medium => Self::Mp3_320,
            QualityTier::High => Self::Aac256,
            QualityTier::Lossless => Self::Flac,
            QualityTier::Hifi => Self::Flac24,
        }
    }
}

impl fmt::Display for Bitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bitrate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .into_iter()
            .find(|bitrate| bitrate.as_str() == s)
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "bitrate \"{s}\" must be one of flac24, flac, aac256, 320k, aac"
                ))
            })
    }
}

/// Picks the encoding to download for `tier`.
///
/// Scans [`Bitrate::ORDER`] from the tier's best encoding downwards and
/// returns the first one in `available`. Falls back to [`Bitrate::Aac`] when
/// nothing matches.
#[must_use]
pub fn resolve(tier: QualityTier, available: &[Bitrate]) -> Bitrate {
    let start = Bitrate::from(tier).position();
    Bitrate::ORDER[start..]
        .iter()
        .copied()
        .find(|bitrate| available.contains(bitrate))
        .unwrap_or(Bitrate::Aac)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIERS: [QualityTier; 6] = [
        QualityTier::Minimum,
        QualityTier::Low,
        QualityTier::Medium,
        QualityTier::High,
        QualityTier::Lossless,
        QualityTier::Hifi,
    ];

    #[test]
    fn everything_available_gives_tier_maximum() {
        let expected = [
            Bitrate::Aac,
            Bitrate::Aac,
            Bitrate::Mp3_320,
            Bitrate::Aac256,
            Bitrate::Flac,
            Bitrate::Flac24,
        ];
        for (tier, expected) in TIERS.into_iter().zip(expected) {
            assert_eq!(resolve(tier, &Bitrate::ORDER), expected, "{tier:?}");
        }
    }

    #[test]
    fn falls_back_to_next_lower_encoding() {
        let available = [Bitrate::Flac, Bitrate::Mp3_320, Bitrate::Aac];
        assert_eq!(resolve(QualityTier::Hifi, &available), Bitrate::Flac);
        assert_eq!(resolve(QualityTier::High, &available), Bitrate::Mp3_320);
        assert_eq!(resolve(QualityTier::Medium, &available), Bitrate::Mp3_320);
    }

    #[test]
    fn never_picks_above_the_tier() {
        let available = [Bitrate::Flac24];
        for tier in TIERS.into_iter().filter(|tier| *tier != QualityTier::Hifi) {
            assert_eq!(resolve(tier, &available), Bitrate::Aac, "{tier:?}");
        }
    }

    #[test]
    fn defaults_to_aac_when_nothing_is_listed() {
        for tier in TIERS {
            assert_eq!(resolve(tier, &[]), Bitrate::Aac);
        }
    }

    #[test]
    fn lookup_tables() {
        assert_eq!(Bitrate::Flac24.kbps(), 2116);
        assert_eq!(Bitrate::Flac.kbps(), 1411);
        assert_eq!(Bitrate::Aac256.kbps(), 320);
        assert_eq!(Bitrate::Mp3_320.kbps(), 320);
        assert_eq!(Bitrate::Aac.kbps(), 128);

        assert_eq!(Bitrate::Flac24.bit_depth(), Some(24));
        assert_eq!(Bitrate::Flac.bit_depth(), Some(16));
        assert_eq!(Bitrate::Aac256.bit_depth(), None);
        assert_eq!(Bitrate::Mp3_320.bit_depth(), None);
        assert_eq!(Bitrate::Aac.bit_depth(), None);

        assert_eq!(Bitrate::Aac256.codec(), Codec::Aac);
        assert_eq!(Bitrate::Mp3_320.codec(), Codec::Mp3);
        assert_eq!(Bitrate::Flac24.codec(), Codec::Flac);
    }

    #[test]
    fn vendor_keys_round_trip() {
        for bitrate in Bitrate::ORDER {
            assert_eq!(bitrate.as_str().parse::<Bitrate>().unwrap(), bitrate);
        }
        assert!("mp3".parse::<Bitrate>().is_err());
        let parsed: Vec<Bitrate> = serde_json::from_str(r#"["320k","flac24"]"#).unwrap();
        assert_eq!(parsed, vec![Bitrate::Mp3_320, Bitrate::Flac24]);
    }
}
