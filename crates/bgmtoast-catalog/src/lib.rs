//! Static lookup table from asset path fragments to track metadata.
//!
//! The catalog is loaded once at startup from a key/value source (see
//! [`source::CatalogSource`]) and never mutated afterwards, so it can be
//! shared read-only with the worker thread behind an `Arc`.
//!
//! Keys are relative path suffixes such as `bgm/town.ogg`, while the host
//! reports absolute paths with either separator. Matching therefore treats
//! `/` and `\` as the same character and only ever compares suffixes.

pub mod source;

use std::collections::BTreeMap;

use bgmtoast_bridge::notification::TrackInfo;

use crate::source::CatalogSource;

/// Separator between the song name, disc and track fields of a raw value.
pub const FIELD_SEPARATOR: char = '|';

/// A catalog record: the path fragment it matches and the metadata to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Path fragment as written in the source, separators untouched.
    pub key: String,
    pub info: TrackInfo,
}

impl CatalogEntry {
    /// Parses a `"Name|Disc|Track"` value.
    ///
    /// With fewer than two separators the whole value becomes the display
    /// name. Anything after the second separator belongs to the track label.
    pub fn parse(key: impl Into<String>, raw_value: &str) -> Self {
        let mut fields = raw_value.splitn(3, FIELD_SEPARATOR);
        let info = match (fields.next(), fields.next(), fields.next()) {
            (Some(name), Some(disc), Some(track)) => TrackInfo {
                display_name: name.to_string(),
                disc_label: disc.to_string(),
                track_label: track.to_string(),
            },
            _ => TrackInfo {
                display_name: raw_value.to_string(),
                ..TrackInfo::default()
            },
        };

        Self {
            key: key.into(),
            info,
        }
    }
}

/// Immutable mapping from path fragment to [`CatalogEntry`].
///
/// Entries are kept in ascending key order, which is also the order
/// [`Catalog::find_suffix`] tries them in.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    /// Builds a catalog from raw `(key, value)` records. Later duplicates of a
    /// key replace earlier ones.
    pub fn from_records<K, V>(records: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: AsRef<str>,
    {
        let entries = records
            .into_iter()
            .map(|(key, value)| {
                let entry = CatalogEntry::parse(key, value.as_ref());
                (entry.key.clone(), entry)
            })
            .collect();
        Self { entries }
    }

    /// Loads the catalog from `source`. A source that cannot be read yields an
    /// empty catalog; detection simply never matches in that case.
    pub fn load(source: &impl CatalogSource) -> Self {
        match source.read_records() {
            Ok(records) => {
                let catalog = Self::from_records(records);
                log::info!(
                    "Catalog loaded from {} with {} entries.",
                    source.describe(),
                    catalog.len()
                );
                catalog
            }
            Err(err) => {
                log::error!(
                    "Failed to load catalog from {}: {err}. Continuing with an empty catalog.",
                    source.describe()
                );
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.get(key)
    }

    /// Returns the first entry whose key is a suffix of `path`, comparing
    /// both with separators normalized. Empty keys never match.
    ///
    /// A well-formed catalog has at most one key matching a realistic path,
    /// so when several do, the first one in key order wins.
    pub fn find_suffix(&self, path: &str) -> Option<&CatalogEntry> {
        self.entries
            .values()
            .find(|entry| !entry.key.is_empty() && ends_with_normalized(path, &entry.key))
    }
}

fn canonical_separator(byte: u8) -> u8 {
    if byte == b'\\' { b'/' } else { byte }
}

/// `path.ends_with(suffix)` with `\` and `/` considered equal.
pub fn ends_with_normalized(path: &str, suffix: &str) -> bool {
    let (path, suffix) = (path.as_bytes(), suffix.as_bytes());
    if suffix.len() > path.len() {
        return false;
    }

    path[path.len() - suffix.len()..]
        .iter()
        .zip(suffix)
        .all(|(&left, &right)| canonical_separator(left) == canonical_separator(right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::CatalogError;

    struct FailingSource;

    impl CatalogSource for FailingSource {
        fn read_records(&self) -> Result<Vec<(String, String)>, CatalogError> {
            Err(CatalogError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such file",
            )))
        }

        fn describe(&self) -> String {
            "nowhere".to_string()
        }
    }

    #[test]
    fn parses_full_triple() {
        let entry = CatalogEntry::parse("bgm/town.ogg", "Town of Hope|1|12");
        assert_eq!(entry.info.display_name, "Town of Hope");
        assert_eq!(entry.info.disc_label, "1");
        assert_eq!(entry.info.track_label, "12");
    }

    #[test]
    fn empty_disc_and_track_are_kept_empty() {
        let entry = CatalogEntry::parse("areaA/title.ogg", "Title Theme||");
        assert_eq!(entry.info.display_name, "Title Theme");
        assert!(entry.info.disc_label.is_empty());
        assert!(entry.info.track_label.is_empty());
    }

    #[test]
    fn fewer_than_two_separators_fall_back_to_name_only() {
        let entry = CatalogEntry::parse("bgm/a.ogg", "Just a name");
        assert_eq!(entry.info.display_name, "Just a name");
        assert!(entry.info.disc_label.is_empty());

        let entry = CatalogEntry::parse("bgm/b.ogg", "Half|2");
        assert_eq!(entry.info.display_name, "Half|2");
        assert!(entry.info.disc_label.is_empty());
        assert!(entry.info.track_label.is_empty());
    }

    #[test]
    fn extra_separators_stay_in_the_track_label() {
        let entry = CatalogEntry::parse("bgm/c.ogg", "Song|1|2|bonus");
        assert_eq!(entry.info.track_label, "2|bonus");
    }

    #[test]
    fn suffix_match_ignores_separator_style() {
        let catalog = Catalog::from_records([("bgm/town.ogg", "Town|1|2")]);

        let backslashes = catalog.find_suffix("C:\\game\\bgm\\town.ogg");
        let slashes = catalog.find_suffix("C:/game/bgm/town.ogg");
        assert_eq!(backslashes.map(|entry| entry.key.as_str()), Some("bgm/town.ogg"));
        assert_eq!(backslashes, slashes);

        let stored_with_backslash = Catalog::from_records([("bgm\\town.ogg", "Town|1|2")]);
        assert!(stored_with_backslash.find_suffix("C:/game/bgm/town.ogg").is_some());
    }

    #[test]
    fn only_suffixes_match() {
        let catalog = Catalog::from_records([("bgm/town.ogg", "Town||")]);
        assert!(catalog.find_suffix("C:/game/bgm/town.ogg.bak").is_none());
        assert!(catalog.find_suffix("town.ogg").is_none());
        assert!(catalog.find_suffix("C:/game/bgm/TOWN.ogg").is_none());
        assert!(catalog.find_suffix("C:/game/bgm/town.ogg").is_some());
    }

    #[test]
    fn empty_key_never_matches() {
        let catalog = Catalog::from_records([("", "Everything||")]);
        assert!(catalog.find_suffix("C:/game/bgm/town.ogg").is_none());
    }

    #[test]
    fn ambiguous_keys_resolve_in_key_order() {
        let catalog = Catalog::from_records([("town.ogg", "Short||"), ("bgm/town.ogg", "Long||")]);
        let entry = catalog.find_suffix("C:/game/bgm/town.ogg").unwrap();
        assert_eq!(entry.info.display_name, "Long");
    }

    #[test]
    fn unreadable_source_yields_empty_catalog() {
        let catalog = Catalog::load(&FailingSource);
        assert!(catalog.is_empty());
        assert!(catalog.find_suffix("C:/game/bgm/town.ogg").is_none());
    }
}
