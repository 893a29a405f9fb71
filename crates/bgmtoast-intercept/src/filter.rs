/// A three-letter file extension, stored lowercase.
///
/// A path is watched when it is longer than four units and its last four
/// units are a `.` followed by the extension, compared ASCII
/// case-insensitively. Anything else that happens to end that way is treated
/// the same; only the suffix is inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchedExtension([u8; 3]);

impl WatchedExtension {
    pub const OGG: Self = Self(*b"ogg");

    /// Accepts exactly three ASCII letters, with or without a leading dot.
    pub fn new(extension: &str) -> Option<Self> {
        let extension = extension.strip_prefix('.').unwrap_or(extension);
        let letters: [u8; 3] = extension.as_bytes().try_into().ok()?;
        if !letters.iter().all(u8::is_ascii_alphabetic) {
            return None;
        }
        Some(Self(letters.map(|letter| letter.to_ascii_lowercase())))
    }

    /// Checks a byte path (the narrow file-open variant).
    pub fn matches_narrow(&self, path: &[u8]) -> bool {
        let Some(tail) = tail(path) else {
            return false;
        };
        tail[0] == b'.' && tail[1..].eq_ignore_ascii_case(&self.0)
    }

    /// Checks a UTF-16 path (the wide file-open variant).
    pub fn matches_wide(&self, path: &[u16]) -> bool {
        let Some(tail) = tail(path) else {
            return false;
        };
        tail[0] == u16::from(b'.')
            && tail[1..].iter().zip(self.0).all(|(&unit, expected)| {
                u8::try_from(unit).is_ok_and(|byte| byte.to_ascii_lowercase() == expected)
            })
    }
}

impl Default for WatchedExtension {
    fn default() -> Self {
        Self::OGG
    }
}

impl std::fmt::Display for WatchedExtension {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c] = self.0;
        write!(formatter, ".{}{}{}", a as char, b as char, c as char)
    }
}

/// Last four units of `path`, if it is strictly longer than four.
fn tail<T>(path: &[T]) -> Option<&[T]> {
    if path.len() <= 4 {
        return None;
    }
    Some(&path[path.len() - 4..])
}
