//! Integration tests for the in-process links.
//!
//! The loopback tests play both sides of the link from one task. The
//! line tests run `LineLink` over `tokio::io::duplex`, the same way a
//! serial device would be wrapped.

use robolink_link::{LineLink, Link, LinkError, LoopbackLink};

// =========================================================================
// LoopbackLink
// =========================================================================

#[tokio::test]
async fn test_loopback_delivers_in_order_both_ways() {
    let (app, robot) = LoopbackLink::pair();
    assert_ne!(app.id(), robot.id());

    app.send(b"M#00").await.unwrap();
    app.send(b"E#").await.unwrap();
    robot.send(b"D").await.unwrap();

    assert_eq!(robot.recv().await.unwrap(), Some(b"M#00".to_vec()));
    assert_eq!(robot.recv().await.unwrap(), Some(b"E#".to_vec()));
    assert_eq!(app.recv().await.unwrap(), Some(b"D".to_vec()));
}

#[tokio::test]
async fn test_loopback_close_ends_peer_recv_after_drain() {
    let (app, robot) = LoopbackLink::pair();
    app.send(b"S#E").await.unwrap();
    app.close().await.unwrap();

    assert_eq!(robot.recv().await.unwrap(), Some(b"S#E".to_vec()));
    assert_eq!(robot.recv().await.unwrap(), None);
}

#[tokio::test]
async fn test_loopback_send_after_close_fails() {
    let (app, _robot) = LoopbackLink::pair();
    app.close().await.unwrap();
    // Closing twice is fine.
    app.close().await.unwrap();

    let err = app.send(b"D").await.unwrap_err();
    assert!(matches!(err, LinkError::Closed(_)));
}

#[tokio::test]
async fn test_loopback_send_to_dropped_peer_fails() {
    let (app, robot) = LoopbackLink::pair();
    drop(robot);
    assert!(matches!(app.send(b"D").await, Err(LinkError::Closed(_))));
}

#[tokio::test]
async fn test_loopback_can_be_driven_from_spawned_task() {
    let (app, robot) = LoopbackLink::pair();
    let echo = tokio::spawn(async move {
        while let Ok(Some(token)) = robot.recv().await {
            if robot.send(&token).await.is_err() {
                break;
            }
        }
    });

    app.send(b"W3").await.unwrap();
    assert_eq!(app.recv().await.unwrap(), Some(b"W3".to_vec()));

    app.close().await.unwrap();
    echo.await.unwrap();
}

// =========================================================================
// LineLink
// =========================================================================

#[tokio::test]
async fn test_line_link_frames_tokens_with_newlines() {
    let (a, b) = tokio::io::duplex(64);
    let app = LineLink::from_stream(a);
    let robot = LineLink::from_stream(b);

    app.send(b"L37??").await.unwrap();
    app.send(b"M#21").await.unwrap();

    assert_eq!(robot.recv().await.unwrap(), Some(b"L37??".to_vec()));
    assert_eq!(robot.recv().await.unwrap(), Some(b"M#21".to_vec()));
}

#[tokio::test]
async fn test_line_link_strips_crlf() {
    let (a, mut b) = tokio::io::duplex(64);
    let app = LineLink::from_stream(a);

    use tokio::io::AsyncWriteExt;
    b.write_all(b"D\r\nW5\n").await.unwrap();

    assert_eq!(app.recv().await.unwrap(), Some(b"D".to_vec()));
    assert_eq!(app.recv().await.unwrap(), Some(b"W5".to_vec()));
}

#[tokio::test]
async fn test_line_link_rejects_embedded_newline() {
    let (a, _b) = tokio::io::duplex(64);
    let app = LineLink::from_stream(a);

    let err = app.send(b"D\nD").await.unwrap_err();
    assert!(matches!(err, LinkError::SendFailed(_)));
}

#[tokio::test]
async fn test_line_link_close_ends_peer_recv() {
    let (a, b) = tokio::io::duplex(64);
    let app = LineLink::from_stream(a);
    let robot = LineLink::from_stream(b);

    app.send(b"E#").await.unwrap();
    app.close().await.unwrap();

    assert_eq!(robot.recv().await.unwrap(), Some(b"E#".to_vec()));
    assert_eq!(robot.recv().await.unwrap(), None);
    assert!(matches!(app.send(b"D").await, Err(LinkError::Closed(_))));
}

#[tokio::test]
async fn test_line_link_passes_non_utf8_lines_through() {
    let (a, mut b) = tokio::io::duplex(64);
    let app = LineLink::from_stream(a);

    use tokio::io::AsyncWriteExt;
    b.write_all(b"\xff\xfe\r\nE#\nD").await.unwrap();
    drop(b);

    assert_eq!(app.recv().await.unwrap(), Some(vec![0xff, 0xfe]));
    assert_eq!(app.recv().await.unwrap(), Some(b"E#".to_vec()));
    assert_eq!(app.recv().await.unwrap(), Some(b"D".to_vec()));
    assert_eq!(app.recv().await.unwrap(), None);
}
