use std::time::Duration;

use super::*;

fn sample(t0: u64, t1: u64, t2: u64, t3: u64) -> ProbeSample {
    ProbeSample {
        t0: MicroTimestamp::from_micros(t0),
        t1: MicroTimestamp::from_micros(t1),
        t2: MicroTimestamp::from_micros(t2),
        t3: MicroTimestamp::from_micros(t3),
    }
}

#[test]
fn test_timestamp_encode_decode() {
    let ts = MicroTimestamp::from_micros(1_700_000_000_123_456);

    let encoded = ts.encode();
    let decoded = MicroTimestamp::decode(&encoded).unwrap();

    assert_eq!(decoded, ts);
}

#[test]
fn test_timestamp_decode_rejects_wrong_size() {
    assert!(MicroTimestamp::decode(&[0u8; 7]).is_none());
    assert!(MicroTimestamp::decode(&[0u8; 9]).is_none());
    assert!(MicroTimestamp::decode(&[]).is_none());
}

#[test]
fn test_timestamp_now_is_recent() {
    let ts = MicroTimestamp::now();

    // After 2020-01-01 in microseconds
    assert!(ts.as_micros() > 1_577_836_800_000_000);
}

#[test]
fn test_timestamp_offset_by() {
    let ts = MicroTimestamp::from_micros(1_000);

    assert_eq!(ts.offset_by(500).as_micros(), 1_500);
    assert_eq!(ts.offset_by(-400).as_micros(), 600);
    assert_eq!(ts.offset_by(-2_000).as_micros(), 0);
}

#[test]
fn test_offset_and_delay_formulas() {
    // t0=0, t1=t2=5, t3=12:
    //   offset = ((5-0) + (5-12)) / 2 = -1
    //   delay  = (12-0) - (5-5)       = 12
    let s = sample(0, 5, 5, 12);

    assert_eq!(s.offset_micros(), -1);
    assert_eq!(s.round_trip_micros(), 12);
}

#[test]
fn test_offset_with_skewed_clocks() {
    // Responder runs 5s ahead; 10ms each way on the wire.
    let s = sample(
        1_000_000_000,
        1_005_010_000,
        1_005_010_000,
        1_000_020_000,
    );

    assert_eq!(s.offset_micros(), 5_000_000);
    assert_eq!(s.round_trip_micros(), 20_000);
}

#[test]
fn test_estimate_picks_minimum_delay_not_minimum_offset() {
    // The 3rd sample has the smallest |offset| but a worse round trip; the
    // 2nd has the smallest delay and must win.
    let samples = vec![
        sample(0, 400, 400, 1_000),     // offset -100, delay 1000
        sample(0, 230, 230, 400),       // offset 30,   delay 400
        sample(0, 1_001, 1_001, 2_000), // offset 1,    delay 2000
    ];

    let estimate = SyncEstimate::from_samples(&samples).unwrap();

    assert_eq!(estimate.ping_micros, 400);
    assert_eq!(estimate.offset_micros, 30);
}

#[test]
fn test_estimate_from_empty_samples() {
    assert!(SyncEstimate::from_samples(&[]).is_none());
}

#[tokio::test]
async fn test_prober_round_against_live_responder() {
    let responder = SyncResponder::bind(([127, 0, 0, 1], 0).into()).await.unwrap();
    let addr = responder.local_addr().unwrap();
    let server = tokio::spawn(responder.run());

    let prober = SyncProber::new(addr, 4, Duration::from_secs(1));
    let estimate = prober.sync_round().await.unwrap();

    // Same host, same clock: offset near zero, delay small but non-negative.
    assert!(estimate.offset_micros.abs() < 1_000_000);
    assert!(estimate.ping_micros >= 0);
    assert!(estimate.ping_micros < 1_000_000);

    server.abort();
}

#[tokio::test]
async fn test_responder_ignores_non_sentinel() {
    let responder = SyncResponder::bind(([127, 0, 0, 1], 0).into()).await.unwrap();
    let addr = responder.local_addr().unwrap();
    let server = tokio::spawn(responder.run());

    // Garbage first; the responder must stay up and answer a real probe.
    let noise = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    noise.send_to(b"??", addr).await.unwrap();
    noise.send_to(&[0xFF], addr).await.unwrap();

    let prober = SyncProber::new(addr, 2, Duration::from_secs(1));
    let estimate = prober.best_estimate(2).await.unwrap();
    assert!(estimate.ping_micros >= 0);

    server.abort();
}

#[tokio::test]
async fn test_prober_times_out_against_silence() {
    // Bound socket that never answers.
    let silent = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = silent.local_addr().unwrap();

    let prober = SyncProber::new(addr, 2, Duration::from_millis(50));
    let err = prober.sync_round().await.unwrap_err();

    assert!(matches!(
        err,
        crate::error::EnsembleError::SyncFailed { attempts: 2 }
    ));
}

#[tokio::test]
async fn test_stale_reply_to_timed_out_attempt_is_not_reused() {
    // A responder that withholds its answer to the first request and, once
    // the second request arrives, sends the first attempt a now-stale
    // timestamp alongside a fresh answer for the second. The stale reply
    // must not become the second attempt's sample: it would show an offset
    // wrong by roughly the probe timeout with a tiny round trip, which the
    // min-delay policy would then prefer.
    let server = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap();

    let script = tokio::spawn(async move {
        let mut buf = [0u8; 2];
        let (_, first) = server.recv_from(&mut buf).await.unwrap();
        let stale = MicroTimestamp::now();
        let (_, second) = server.recv_from(&mut buf).await.unwrap();
        server.send_to(&stale.encode(), first).await.unwrap();
        server
            .send_to(&MicroTimestamp::now().encode(), second)
            .await
            .unwrap();
    });

    let prober = SyncProber::new(addr, 2, Duration::from_millis(300));
    let estimate = prober.sync_round().await.unwrap();
    script.await.unwrap();

    // Same host, same clock: only the fresh reply yields a near-zero
    // offset. Consuming the stale one would report roughly -300ms.
    assert!(
        estimate.offset_micros.abs() < 50_000,
        "stale reply skewed the estimate: {}",
        estimate.offset_micros
    );
}
