use dj_control::{BackendError, MediaBackend, VlcBackend, VlcConfig};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Fake VLC rc interface. Forwards every received line; closes each
/// connection after `per_connection` lines.
async fn fake_vlc(per_connection: usize) -> (VlcConfig, mpsc::UnboundedReceiver<(usize, String)>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut connection = 0;
        while let Ok((stream, _)) = listener.accept().await {
            connection += 1;
            let (read, mut write) = stream.into_split();
            write.write_all(b"VLC media player 3.0.20 Vetinari\r\nCommand Line Interface initialized. Type `help' for help.\r\n> ").await.ok();
            let mut lines = BufReader::new(read).lines();
            let mut served = 0;
            while served < per_connection {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        tx.send((connection, line)).ok();
                        write.write_all(b"> ").await.ok();
                        served += 1;
                    }
                    _ => break,
                }
            }
        }
    });

    let config = VlcConfig {
        host: "127.0.0.1".to_string(),
        port,
        ..VlcConfig::default()
    };
    (config, rx)
}

#[tokio::test]
async fn test_commands() {
    let (config, mut rx) = fake_vlc(usize::MAX).await;
    let mut vlc = VlcBackend::connect(config).await.unwrap();

    vlc.toggle_play_pause().await.unwrap();
    vlc.next_track().await.unwrap();
    vlc.previous_track().await.unwrap();
    vlc.set_volume(10).await.unwrap();
    vlc.toggle_mute().await.unwrap();
    vlc.toggle_mute().await.unwrap();

    let mut received = Vec::new();
    for _ in 0..6 {
        received.push(rx.recv().await.unwrap().1);
    }
    assert_eq!(
        received,
        vec!["pause", "next", "prev", "volume 153", "volume 0", "volume 153"]
    );
    assert_eq!(vlc.volume().level(), 60);
}

#[tokio::test]
async fn test_volume_is_clamped() {
    let (config, mut rx) = fake_vlc(usize::MAX).await;
    let mut vlc = VlcBackend::connect(config).await.unwrap();

    for _ in 0..8 {
        vlc.set_volume(10).await.unwrap();
    }
    assert_eq!(vlc.volume().level(), 100);

    let mut last = String::new();
    for _ in 0..8 {
        last = rx.recv().await.unwrap().1;
    }
    assert_eq!(last, "volume 256");
}

#[tokio::test]
async fn test_reconnects_after_vlc_hangs_up() {
    let (config, mut rx) = fake_vlc(1).await;
    let mut vlc = VlcBackend::connect(config).await.unwrap();

    vlc.next_track().await.unwrap();
    assert_eq!(rx.recv().await.unwrap(), (1, "next".to_string()));

    // give the hang-up time to arrive
    tokio::time::sleep(Duration::from_millis(100)).await;

    vlc.previous_track().await.unwrap();
    assert_eq!(rx.recv().await.unwrap(), (2, "prev".to_string()));
    assert!(vlc.is_connected());
}

#[tokio::test]
async fn test_connect_fails_without_vlc() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = VlcConfig {
        host: "127.0.0.1".to_string(),
        port,
        connect_timeout: Duration::from_secs(1),
    };
    assert!(matches!(VlcBackend::connect(config).await, Err(BackendError::Io(_))));
}
