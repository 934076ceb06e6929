use super::*;
use herdctl_wire::{read_message, write_message};
use tokio::net::UnixListener;

async fn echo_server(listener: UnixListener) {
    let (stream, _) = listener.accept().await.unwrap();
    let (mut reader, mut writer) = stream.into_split();
    while let Some(request) = read_message::<_, Request>(&mut reader).await.unwrap() {
        let response = match request {
            Request::Ping => Response::Pong,
            _ => Response::Error { message: "unexpected request".to_string() },
        };
        write_message(&mut writer, &response).await.unwrap();
    }
}

async fn stream_server(listener: UnixListener, entries: Vec<Response>) {
    let (stream, _) = listener.accept().await.unwrap();
    let (mut reader, mut writer) = stream.into_split();
    let _request = read_message::<_, Request>(&mut reader).await.unwrap();
    for entry in entries {
        write_message(&mut writer, &entry).await.unwrap();
    }
    write_message(&mut writer, &Response::StreamEnded).await.unwrap();
}

#[tokio::test]
async fn call_round_trips_a_ping() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("herdctld.sock");
    let listener = UnixListener::bind(&path).unwrap();
    tokio::spawn(echo_server(listener));

    let mut conn = UnixStream::connect(&path).await.unwrap();
    let response = call(&mut conn, Request::Ping).await.unwrap();
    assert_eq!(response, Response::Pong);
}

#[tokio::test]
async fn stream_invokes_callback_per_entry_and_stops_at_stream_ended() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("herdctld.sock");
    let listener = UnixListener::bind(&path).unwrap();
    let entries = vec![Response::Pong, Response::Ok];
    tokio::spawn(stream_server(listener, entries));

    let mut conn = UnixStream::connect(&path).await.unwrap();
    let mut seen = Vec::new();
    stream(&mut conn, Request::Ping, |entry| seen.push(entry)).await.unwrap();

    assert_eq!(seen, vec![Response::Pong, Response::Ok]);
}

#[tokio::test]
async fn call_errors_when_daemon_is_unreachable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.sock");
    let connection = UnixStream::connect(&path).await;
    assert!(connection.is_err());
}
