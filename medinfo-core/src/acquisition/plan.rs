//! The ordered option calls applied to a handle before acquisition.
//!
//! Building the plan is a pure function of the detected capabilities and
//! the caller's options, so the version matrix can be tested without a
//! library.

use crate::config::ParseOptions;
use crate::version::Capabilities;

/// Option key that restores every option to its default.
pub const RESET_OPTION: &str = "Reset";

/// One `MediaInfo_Option` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionCall {
    pub key: String,
    pub value: String,
}

impl OptionCall {
    fn new(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

fn flag(enabled: bool) -> &'static str {
    if enabled { "1" } else { "" }
}

/// Decimal form with at least one fractional digit, e.g. `1.0` or `0.5`.
fn speed_value(speed: f64) -> String {
    format!("{:?}", speed)
}

/// Option calls in the order they must be applied.
///
/// `CharSet`, `Inform`, `Complete`, `ParseSpeed` and `LegacyStreamDisplay`
/// are always set. `Cover_Data` is only set when the library knows it.
/// Extra options follow, verbatim and in the caller's order.
pub fn configuration_plan(capabilities: &Capabilities, options: &ParseOptions) -> Vec<OptionCall> {
    let inform = options
        .output
        .clone()
        .unwrap_or_else(|| capabilities.xml_keyword.to_string());

    let mut plan = vec![
        OptionCall::new("CharSet", "UTF-8"),
        OptionCall::new("Inform", inform),
        OptionCall::new("Complete", flag(options.full)),
        OptionCall::new("ParseSpeed", speed_value(options.parse_speed)),
        OptionCall::new("LegacyStreamDisplay", flag(options.legacy_stream_display)),
    ];

    if capabilities.cover_data_option {
        plan.push(OptionCall::new(
            "Cover_Data",
            if options.cover_data { "base64" } else { "" },
        ));
    }

    plan.extend(
        options
            .extra_options
            .iter()
            .flatten()
            .map(|(key, value)| OptionCall::new(key, value.clone())),
    );
    plan
}

/// Whether the handle must be reset after the report was produced.
///
/// Only done when extra options were supplied, even an empty set: an
/// unconditional reset disturbs other handles of the same library.
pub fn needs_reset(capabilities: &Capabilities, options: &ParseOptions) -> bool {
    options.extra_options.is_some() && capabilities.reset_option
}

/// Advisory message when extra options cannot be undone afterwards.
pub fn compatibility_warning(
    version_string: &str,
    capabilities: &Capabilities,
    options: &ParseOptions,
) -> Option<String> {
    if options.extra_options.is_none() || capabilities.reset_option {
        return None;
    }
    Some(format!(
        "This version of MediaInfo (v{}) does not support resetting all options to their \
         default values, passing it custom options is not recommended and may result in \
         unpredictable behavior",
        version_string
    ))
}
