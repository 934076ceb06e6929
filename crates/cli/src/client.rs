// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin Unix-socket client: one request out, one response in, or for the
//! three streaming requests, a `Vec` of entries collected until
//! `Response::StreamEnded`.

use crate::exit_error::ExitError;
use herdctl_wire::{read_message, write_message, ProtocolError, Request, Response};
use tokio::net::UnixStream;

pub async fn connect() -> Result<UnixStream, ExitError> {
    let path = crate::env::socket_path().map_err(|e| {
        ExitError::new(1, format!("cannot resolve state directory: {e}"))
    })?;
    UnixStream::connect(&path).await.map_err(|e| {
        ExitError::new(1, format!("cannot connect to daemon at {}: {e}", path.display()))
    })
}

/// Send a single request and wait for its single response.
pub async fn call(stream: &mut UnixStream, request: Request) -> Result<Response, ExitError> {
    let timeout = crate::env::ipc_timeout();
    tokio::time::timeout(timeout, roundtrip(stream, request))
        .await
        .map_err(|_| ExitError::new(1, "daemon did not respond before the timeout"))?
}

async fn roundtrip(stream: &mut UnixStream, request: Request) -> Result<Response, ExitError> {
    let (mut reader, mut writer) = stream.split();
    write_message(&mut writer, &request).await.map_err(protocol_err)?;
    let response = read_message::<_, Response>(&mut reader).await.map_err(protocol_err)?;
    response.ok_or_else(|| ExitError::new(1, "daemon closed the connection without responding"))
}

/// Send a streaming request and invoke `on_entry` for each entry as it
/// arrives, until the daemon sends `StreamEnded` or closes the socket.
pub async fn stream(
    stream: &mut UnixStream,
    request: Request,
    mut on_entry: impl FnMut(Response),
) -> Result<(), ExitError> {
    let (mut reader, mut writer) = stream.split();
    write_message(&mut writer, &request).await.map_err(protocol_err)?;

    loop {
        let response = read_message::<_, Response>(&mut reader).await.map_err(protocol_err)?;
        match response {
            Some(Response::StreamEnded) | None => break,
            Some(other) => on_entry(other),
        }
    }
    Ok(())
}

fn protocol_err(e: ProtocolError) -> ExitError {
    ExitError::new(1, format!("protocol error: {e}"))
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
