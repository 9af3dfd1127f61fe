//! Cover art URLs.
//!
//! The image host serves covers in a fixed set of square sizes, plus the
//! uncompressed original. Requested resolutions are snapped to the closest
//! size on offer.

/// Sizes served by the image host, ascending.
///
/// `3001` is not a real size. It stands in for the original upload, which
/// is at least that large.
pub const SUPPORTED_SIZES: [u32; 10] = [75, 140, 200, 350, 500, 1000, 1280, 1400, 2000, 3001];

/// Largest numeric size; anything above is served as the original.
pub const MAX_SIZE: u32 = 3000;

const IMAGE_URL: &str = "https://image.bugsm.co.kr/album/images";

/// Size segment of a cover URL.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArtworkSize {
    Pixels(u32),
    Original,
}

impl std::fmt::Display for ArtworkSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pixels(size) => write!(f, "{size}"),
            Self::Original => f.write_str("original"),
        }
    }
}

/// Snaps `size` to the closest supported size.
///
/// Ties go to the smaller size.
#[must_use]
pub fn snap(size: u32) -> ArtworkSize {
    let mut best = SUPPORTED_SIZES[0];
    for candidate in SUPPORTED_SIZES {
        if candidate.abs_diff(size) < best.abs_diff(size) {
            best = candidate;
        }
    }

    if best > MAX_SIZE {
        ArtworkSize::Original
    } else {
        ArtworkSize::Pixels(best)
    }
}

/// Builds the URL of the cover at `path`, as reported in an album's
/// `image.path`, for a requested resolution.
#[must_use]
pub fn url(path: &str, size: u32) -> String {
    format!("{IMAGE_URL}/{}{path}", snap(size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_to_closest_size() {
        assert_eq!(snap(0), ArtworkSize::Pixels(75));
        assert_eq!(snap(100), ArtworkSize::Pixels(75));
        assert_eq!(snap(600), ArtworkSize::Pixels(500));
        assert_eq!(snap(1200), ArtworkSize::Pixels(1280));
        assert_eq!(snap(1400), ArtworkSize::Pixels(1400));
        assert_eq!(snap(2400), ArtworkSize::Pixels(2000));
    }

    #[test]
    fn ties_go_to_first_listed() {
        // 1140 is 140 away from both 1000 and 1280.
        assert_eq!(snap(1140), ArtworkSize::Pixels(1000));
        assert_eq!(snap(425), ArtworkSize::Pixels(350));
    }

    #[test]
    fn above_max_is_original() {
        assert_eq!(snap(2500), ArtworkSize::Pixels(2000));
        assert_eq!(snap(3000), ArtworkSize::Original);
        assert_eq!(snap(3001), ArtworkSize::Original);
        assert_eq!(snap(10_000), ArtworkSize::Original);
    }

    #[test]
    fn builds_urls() {
        assert_eq!(
            url("/203/20343816.jpg", 1400),
            "https://image.bugsm.co.kr/album/images/1400/203/20343816.jpg"
        );
        assert_eq!(
            url("/203/20343816.jpg", 5000),
            "https://image.bugsm.co.kr/album/images/original/203/20343816.jpg"
        );
    }
}
