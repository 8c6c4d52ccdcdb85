use std::time::Duration;

use super::*;
use crate::error::EnsembleError;
use crate::types::Track;

#[tokio::test]
async fn test_dir_source_reads_sorted_by_name() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.mid"), b"bravo").unwrap();
    std::fs::write(dir.path().join("a.mid"), b"alpha").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

    let source = DirTrackSource::new(dir.path(), "mid");
    let tracks = source.load().await.unwrap();

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].name, "a.mid");
    assert_eq!(&tracks[0].data[..], b"alpha");
    assert_eq!(tracks[1].name, "b.mid");
}

#[tokio::test]
async fn test_dir_source_empty_dir_is_no_tracks() {
    let dir = tempfile::tempdir().unwrap();

    let source = DirTrackSource::new(dir.path(), "mid");
    let err = source.load().await.unwrap_err();

    assert!(matches!(err, EnsembleError::NoTracks { .. }));
}

#[tokio::test]
async fn test_dir_source_missing_dir_is_source_error() {
    let source = DirTrackSource::new("/nonexistent/ensemble-tracks", "mid");
    let err = source.load().await.unwrap_err();

    assert!(matches!(err, EnsembleError::TrackSource { .. }));
}

#[tokio::test]
async fn test_static_source_roundtrip() {
    let source = StaticTrackSource::from_pairs([("one", vec![1u8]), ("two", vec![2u8, 2])]);
    let tracks = source.load().await.unwrap();

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[1].len(), 2);
}

#[test]
fn test_concat_combiner_preserves_order() {
    let tracks = vec![
        Track::new("a", b"head".to_vec()),
        Track::new("b", b"-".to_vec()),
        Track::new("c", b"tail".to_vec()),
    ];

    let payload = ConcatCombiner.combine(&tracks);

    assert_eq!(&payload[..], b"head-tail");
}

#[test]
fn test_concat_combiner_empty_assignment() {
    let payload = ConcatCombiner.combine(&[]);
    assert!(payload.is_empty());
}

#[tokio::test]
async fn test_null_sink_lifecycle() {
    let mut sink = NullSink::new(Duration::from_millis(50));
    assert!(!sink.is_playing());

    sink.load(bytes::Bytes::from_static(b"pcm")).await.unwrap();
    assert_eq!(sink.loaded_len(), Some(3));

    sink.start().await.unwrap();
    assert!(sink.is_playing());

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(!sink.is_playing());
}

#[tokio::test]
async fn test_null_sink_start_without_load() {
    let mut sink = NullSink::default();
    let err = sink.start().await.unwrap_err();

    assert!(matches!(err, EnsembleError::Playback { .. }));
}
