// Runs with `--features test-mocks`.
#![cfg(feature = "test-mocks")]

use medinfo_core::external::mocks::{MockCall, MockLoader, MockNativeApi};
use medinfo_core::*;
use std::io::Cursor;
use std::sync::Arc;

const REPORT: &str = r#"<Mediainfo><File>
<track type="General"><Format>Matroska</Format><Cover_Data>AAAA</Cover_Data></track>
<track type="Video"><ID>1</ID></track>
</File></Mediainfo>"#;

// --- Test Helper Functions ---

fn binding_for(api: &MockNativeApi) -> Binding {
    Binding::new(
        CandidateResolver::new(Platform::Unix, None),
        Arc::new(MockLoader::new().with_library("libmediainfo.so.0", api.clone())),
    )
}

fn cover_data_calls(api: &MockNativeApi) -> usize {
    api.option_calls()
        .iter()
        .filter(|(key, _)| key == "Cover_Data")
        .count()
}

// --- Tests ---

#[test]
fn test_stream_parse_builds_model() {
    let api = MockNativeApi::new("MediaInfoLib - v24.06").with_report(REPORT);
    let mut stream = Cursor::new(vec![0u8; 200_000]);

    let info = MediaInfo::parse_with(&binding_for(&api), Source::stream(&mut stream), &ParseOptions::default())
        .unwrap()
        .into_model()
        .unwrap();

    assert_eq!(info.tracks.len(), 2);
    assert_eq!(api.fed_bytes().len(), 200_000);
    // 64 KiB chunks: three full ones and a remainder.
    let chunks = api
        .calls()
        .iter()
        .filter(|c| matches!(c, MockCall::BufferContinue(_)))
        .count();
    assert_eq!(chunks, 4);
    assert_eq!(api.live_handles(), 0);
}

#[test]
fn test_cover_data_gate() {
    let options = ParseOptions::builder().cover_data(true).build().unwrap();

    let old = MockNativeApi::new("MediaInfoLib - v18.02").with_report(REPORT);
    let mut stream = Cursor::new(vec![1u8; 16]);
    MediaInfo::parse_with(&binding_for(&old), Source::stream(&mut stream), &options).unwrap();
    assert_eq!(cover_data_calls(&old), 0);

    let new = MockNativeApi::new("MediaInfoLib - v18.03").with_report(REPORT);
    let mut stream = Cursor::new(vec![1u8; 16]);
    MediaInfo::parse_with(&binding_for(&new), Source::stream(&mut stream), &options).unwrap();
    assert_eq!(
        new.option_calls().iter().find(|(key, _)| key == "Cover_Data"),
        Some(&("Cover_Data".to_string(), "base64".to_string()))
    );
}

#[test]
fn test_legacy_keyword_selected_for_old_library() {
    let api = MockNativeApi::new("MediaInfoLib - v17.09").with_report(REPORT);
    let mut stream = Cursor::new(vec![1u8; 16]);
    MediaInfo::parse_with(&binding_for(&api), Source::stream(&mut stream), &ParseOptions::default())
        .unwrap();

    let inform = api
        .option_calls()
        .into_iter()
        .find(|(key, _)| key == "Inform")
        .unwrap();
    assert_eq!(inform.1, "XML");
}

#[test]
fn test_acquire_reports_warning_and_version() {
    let api = MockNativeApi::new("MediaInfoLib - v19.08").with_report(REPORT);
    let options = ParseOptions::builder().option("Language", "raw").build().unwrap();
    let mut stream = Cursor::new(vec![1u8; 16]);

    let report = acquire(&binding_for(&api), Source::stream(&mut stream), &options).unwrap();
    assert_eq!(report.version, LibraryVersion::new(vec![19, 8]));
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(
        api.option_calls().last(),
        Some(&("Language".to_string(), "raw".to_string()))
    );
}

#[test]
fn test_handle_released_when_parse_of_report_fails() {
    let api = MockNativeApi::new("MediaInfoLib - v24.06").with_report("<Mediainfo><File>");
    let mut stream = Cursor::new(vec![1u8; 16]);

    let err = MediaInfo::parse_with(&binding_for(&api), Source::stream(&mut stream), &ParseOptions::default())
        .unwrap_err();
    assert!(matches!(err, CoreError::XmlParse { .. }));
    assert_eq!(api.live_handles(), 0);
}
