//! WebSocket transport.
//!
//! Each connection carries one `{type,data}` JSON envelope per text frame.
//! A connection is served by one thread named after its participant: it
//! reads frames with a short timeout, dispatches each decoded command
//! synchronously into the [`SessionRegistry`], and between reads writes
//! out whatever notifications the registry queued on its outbox.

use std::io;
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, info, warn};
use tungstenite::{Message, WebSocket};

use crate::error::ProtocolError;
use crate::protocol::{decode_client_message, encode_server_message, ServerMessage};
use crate::session::{ParticipantId, SessionRegistry};

/// Longest a connection waits for an inbound frame before flushing its
/// outbox.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A registered participant and the two ends of its outbox.
struct Connection {
    pid: ParticipantId,
    peer: String,
    outbox: Sender<ServerMessage>,
    inbox: Receiver<ServerMessage>,
}

/// Accepts connections forever, serving each on its own thread.
pub fn serve(listener: TcpListener, registry: Arc<SessionRegistry>) -> io::Result<()> {
    for stream in listener.incoming() {
        let stream = match stream {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "failed to accept connection");
                continue;
            }
        };

        let peer = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let (outbox, inbox) = crossbeam_channel::unbounded();
        let pid = registry.register(outbox.clone());
        let conn = Connection {
            pid,
            peer,
            outbox,
            inbox,
        };

        let shared = Arc::clone(&registry);
        let spawned = thread::Builder::new()
            .name(format!("participant-{pid}"))
            .spawn(move || handle_connection(stream, &shared, conn));
        if let Err(e) = spawned {
            warn!(participant = pid, error = %e, "failed to spawn connection thread");
            registry.leave(pid);
        }
    }
    Ok(())
}

/// Performs the WebSocket handshake and serves the participant until it
/// disconnects or sends something that is not JSON, then deregisters it.
fn handle_connection(stream: TcpStream, registry: &SessionRegistry, conn: Connection) {
    match tungstenite::accept(stream) {
        Ok(mut ws) => {
            info!(participant = conn.pid, peer = %conn.peer, "connection accepted");
            match ws.get_ref().set_read_timeout(Some(POLL_INTERVAL)) {
                Ok(()) => run(&mut ws, registry, &conn),
                Err(e) => warn!(participant = conn.pid, error = %e, "failed to set read timeout"),
            }
            close(ws, conn.pid);
        }
        Err(e) => warn!(participant = conn.pid, peer = %conn.peer, error = %e, "websocket handshake failed"),
    }

    registry.leave(conn.pid);
    info!(participant = conn.pid, peer = %conn.peer, "connection closed");
}

fn run(ws: &mut WebSocket<TcpStream>, registry: &SessionRegistry, conn: &Connection) {
    loop {
        match ws.read() {
            Ok(Message::Text(text)) => {
                if !dispatch(&text, registry, conn) {
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Binary(_)) => debug!(participant = conn.pid, "ignoring binary frame"),
            Ok(_) => {}
            Err(tungstenite::Error::Io(e))
                if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {}
            Err(e) => {
                debug!(participant = conn.pid, error = %e, "read failed");
                break;
            }
        }

        if let Err(e) = flush_outbox(ws, &conn.inbox) {
            debug!(participant = conn.pid, error = %e, "write failed");
            break;
        }
    }
}

/// Handles one inbound envelope. Returns false if the connection should be
/// dropped.
fn dispatch(text: &str, registry: &SessionRegistry, conn: &Connection) -> bool {
    let rejection = match decode_client_message(text) {
        Ok(msg) => registry.handle(conn.pid, msg).err().map(|e| e.to_string()),
        Err(e @ ProtocolError::Malformed(_)) => {
            warn!(participant = conn.pid, error = %e, "dropping connection");
            return false;
        }
        Err(e) => Some(e.to_string()),
    };

    if let Some(message) = rejection {
        debug!(participant = conn.pid, %message, "command rejected");
        // Queued behind any notification the registry already sent.
        if conn.outbox.send(ServerMessage::Error(message)).is_err() {
            return false;
        }
    }
    true
}

fn flush_outbox(
    ws: &mut WebSocket<TcpStream>,
    inbox: &Receiver<ServerMessage>,
) -> tungstenite::Result<()> {
    for msg in inbox.try_iter() {
        match encode_server_message(&msg) {
            Ok(text) => ws.send(Message::text(text))?,
            Err(e) => warn!(error = %e, kind = msg.kind(), "dropping notification"),
        }
    }
    Ok(())
}

fn close(mut ws: WebSocket<TcpStream>, pid: ParticipantId) {
    if let Err(e) = ws.close(None).and_then(|()| ws.flush()) {
        debug!(participant = pid, error = %e, "close handshake incomplete");
    }
    if let Err(e) = ws.get_ref().shutdown(Shutdown::Both) {
        debug!(participant = pid, error = %e, "socket shutdown failed");
    }
}
