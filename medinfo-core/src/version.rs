//! Library version detection and version-gated behaviour.
//!
//! MediaInfo reports its version through the `Info_Version` option as
//! `"MediaInfoLib - v<dotted-version>"`. The parsed version is compared
//! against a small table of minimum versions that decides which options
//! the acquisition engine may use.

use std::fmt;

/// Option key used to query the library version.
pub const VERSION_OPTION: &str = "Info_Version";

/// Fixed prefix of the version string returned by the library.
pub const VERSION_PREFIX: &str = "MediaInfoLib - v";

/// Inform keyword for the complete XML output before 17.10.
pub const LEGACY_XML_KEYWORD: &str = "XML";

/// Inform keyword for the complete XML output from 17.10 on.
pub const XML_KEYWORD: &str = "OLDXML";

/// A dotted library version, compared component by component.
///
/// `17.10` sorts before `17.10.1`, which sorts before `18.3`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LibraryVersion(Vec<u32>);

impl LibraryVersion {
    pub fn new(components: impl Into<Vec<u32>>) -> Self {
        Self(components.into())
    }

    pub fn components(&self) -> &[u32] {
        &self.0
    }

    /// True when this version is at or after `minimum`.
    pub fn at_least(&self, minimum: &[u32]) -> bool {
        self.0.as_slice() >= minimum
    }

    /// True when the library supports the given feature.
    pub fn supports(&self, feature: Feature) -> bool {
        self.at_least(feature.minimum_version())
    }

    /// Evaluates the feature table once for this version.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            xml_keyword: if self.supports(Feature::OldXmlKeyword) {
                XML_KEYWORD
            } else {
                LEGACY_XML_KEYWORD
            },
            cover_data_option: self.supports(Feature::CoverDataOption),
            reset_option: self.supports(Feature::ResetOption),
            json_output: self.supports(Feature::JsonOutput),
            thread_safe: self.supports(Feature::ThreadSafe),
        }
    }
}

impl fmt::Display for LibraryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u32::to_string).collect();
        f.write_str(&parts.join("."))
    }
}

/// Behaviour that depends on the library version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// The complete XML output is selected with `OLDXML` instead of `XML`.
    OldXmlKeyword,
    /// The `Cover_Data` option exists; cover data is no longer extracted by default.
    CoverDataOption,
    /// The `Reset` option restores every option to its default.
    ResetOption,
    /// `JSON` is a valid Inform format.
    JsonOutput,
    /// Concurrent handles from one loaded library are safe.
    ThreadSafe,
}

/// Minimum versions, in ascending order.
pub const FEATURE_TABLE: &[(Feature, &[u32])] = &[
    (Feature::OldXmlKeyword, &[17, 10]),
    (Feature::CoverDataOption, &[18, 3]),
    (Feature::JsonOutput, &[18, 3]),
    (Feature::ResetOption, &[19, 9]),
    (Feature::ThreadSafe, &[20, 3]),
];

impl Feature {
    pub fn minimum_version(self) -> &'static [u32] {
        FEATURE_TABLE
            .iter()
            .find(|(feature, _)| *feature == self)
            .map(|(_, version)| *version)
            .unwrap_or(&[])
    }
}

/// Result of evaluating [`FEATURE_TABLE`] against one detected version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub xml_keyword: &'static str,
    pub cover_data_option: bool,
    pub reset_option: bool,
    pub json_output: bool,
    pub thread_safe: bool,
}

/// Extracts the dotted version from an `Info_Version` answer.
///
/// Returns the raw version text and its parsed form, or `None` when the
/// string lacks the expected prefix or contains a non-numeric component.
pub fn parse_version_string(info: &str) -> Option<(String, LibraryVersion)> {
    let rest = info.strip_prefix(VERSION_PREFIX)?;
    let raw: &str = rest.split_whitespace().next()?;
    if !rest.starts_with(raw) {
        return None;
    }
    let components = raw
        .split('.')
        .map(|part| part.parse::<u32>().ok())
        .collect::<Option<Vec<u32>>>()?;
    Some((raw.to_string(), LibraryVersion(components)))
}
