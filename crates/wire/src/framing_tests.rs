// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::Request;

#[tokio::test]
async fn write_then_read_round_trips() {
    let mut buf = Vec::new();
    write_message(&mut buf, &Request::Ping).await.unwrap();
    let mut cursor = std::io::Cursor::new(buf);
    let decoded: Request = read_message(&mut cursor).await.unwrap().unwrap();
    assert_eq!(decoded, Request::Ping);
}

#[tokio::test]
async fn read_message_on_clean_eof_is_none() {
    let mut cursor = std::io::Cursor::new(Vec::<u8>::new());
    let decoded: Option<Request> = read_message(&mut cursor).await.unwrap();
    assert!(decoded.is_none());
}

#[tokio::test]
async fn oversized_frame_length_is_rejected() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&(MAX_FRAME_LEN + 1).to_be_bytes());
    let mut cursor = std::io::Cursor::new(buf);
    let err = read_message::<_, Request>(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::FrameTooLarge(_)));
}

#[test]
fn encode_prefixes_with_big_endian_length() {
    let framed = encode(&Request::Ping).unwrap();
    let payload = serde_json::to_vec(&Request::Ping).unwrap();
    assert_eq!(&framed[..4], &(payload.len() as u32).to_be_bytes());
    assert_eq!(&framed[4..], payload.as_slice());
}

#[tokio::test]
async fn multiple_messages_back_to_back_decode_in_order() {
    let mut buf = Vec::new();
    write_message(&mut buf, &Request::Ping).await.unwrap();
    write_message(&mut buf, &Request::Reload).await.unwrap();
    let mut cursor = std::io::Cursor::new(buf);
    let first: Request = read_message(&mut cursor).await.unwrap().unwrap();
    let second: Request = read_message(&mut cursor).await.unwrap().unwrap();
    assert_eq!(first, Request::Ping);
    assert_eq!(second, Request::Reload);
}
