//! A plain, blocking TCP transport for [rpc_pb]: one accept thread, one connection handled at a
//! time, each request/response framed the same way `busyrpc` frames its async buffers — a single
//! length byte, the packed [rpc_pb::Frame] it describes, then the frame's own `size` bytes of
//! body, checked against its `crc32c`.
//!
//! This is not meant to compete with `busyrpc`'s poll-driven channels on throughput. The worker
//! control surface answers health checks, elections, and ledger operations for a handful of
//! callers (the supervisor, `paxos-repl`, peers electing a leader); a thread per connection, or
//! even one connection at a time, is simpler and every bit as correct.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use biometrics::Counter;

use buffertk::{stack_pack, Packable, Unpackable, Unpacker};

use indicio::clue;

use rpc_pb::{Context, Frame, Request, Response, ServerRegistry};

use crate::COLLECTOR;

static TRANSPORT_CONNECTIONS_ACCEPTED: Counter = Counter::new("paxos_rpc.transport.connections.accepted");
static TRANSPORT_REQUESTS_SERVED: Counter = Counter::new("paxos_rpc.transport.requests.served");
static TRANSPORT_FRAMING_ERRORS: Counter = Counter::new("paxos_rpc.transport.framing_errors");

pub fn register_biometrics(collector: &biometrics::Collector) {
    collector.register_counter(&TRANSPORT_CONNECTIONS_ACCEPTED);
    collector.register_counter(&TRANSPORT_REQUESTS_SERVED);
    collector.register_counter(&TRANSPORT_FRAMING_ERRORS);
}

/// The longest a single accepted connection will block waiting for its next request before the
/// accept loop re-checks its shutdown flag.
const CONNECTION_POLL: Duration = Duration::from_millis(500);
/// How long `accept()` is allowed to block, in nonblocking-poll increments, before the accept
/// loop re-checks its shutdown flag.
const ACCEPT_POLL: Duration = Duration::from_millis(200);

fn io_invalid(what: impl Into<String>) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, what.into())
}

/// Writes one length-prefixed, crc-checked frame containing `body`.
fn write_framed<W: Write>(writer: &mut W, body: &[u8]) -> std::io::Result<()> {
    let frame = Frame::from_buffer(body);
    let frame_bytes = stack_pack(&frame).to_vec();
    if frame_bytes.len() > u8::MAX as usize {
        return Err(io_invalid("frame header too large to encode"));
    }
    writer.write_all(&[frame_bytes.len() as u8])?;
    writer.write_all(&frame_bytes)?;
    writer.write_all(body)?;
    writer.flush()
}

/// Reads one length-prefixed, crc-checked frame. Returns `Ok(None)` if the peer closed the
/// connection cleanly before sending the next frame's length byte.
fn read_framed<R: Read>(reader: &mut R) -> std::io::Result<Option<Vec<u8>>> {
    let mut hdr_len = [0u8; 1];
    match reader.read_exact(&mut hdr_len) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err),
    }
    let mut hdr = vec![0u8; hdr_len[0] as usize];
    reader.read_exact(&mut hdr)?;
    let mut up = Unpacker::new(&hdr);
    let frame: Frame = up
        .unpack()
        .map_err(|err| io_invalid(format!("could not parse frame header: {err:?}")))?;
    if frame.size > rpc_pb::MAX_BODY_SIZE as u64 {
        return Err(io_invalid(format!("frame body too large: {}", frame.size)));
    }
    let mut body = vec![0u8; frame.size as usize];
    reader.read_exact(&mut body)?;
    if crc32c::crc32c(&body) != frame.crc32c {
        TRANSPORT_FRAMING_ERRORS.click();
        return Err(io_invalid("crc32c mismatch on frame body"));
    }
    Ok(Some(body))
}

/////////////////////////////////////////////// TcpServer //////////////////////////////////////////

/// Hosts a [ServerRegistry] over plain TCP. One thread accepts connections; each connection is
/// then served to completion, one request at a time, before the next connection is accepted.
pub struct TcpServer {
    listener: TcpListener,
    registry: ServerRegistry,
    shutdown: Arc<AtomicBool>,
}

impl TcpServer {
    pub fn bind(
        addr: SocketAddr,
        registry: ServerRegistry,
        shutdown: Arc<AtomicBool>,
    ) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        Ok(Self {
            listener,
            registry,
            shutdown,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts and serves connections until the shutdown flag is set. Blocks the calling thread;
    /// callers that want a background server should run this inside its own `std::thread::spawn`.
    pub fn serve(self) {
        while !self.shutdown.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    TRANSPORT_CONNECTIONS_ACCEPTED.click();
                    clue!(COLLECTOR, indicio::DEBUG, { accepted_connection: peer.to_string() });
                    if let Err(err) = stream.set_nonblocking(false) {
                        clue!(COLLECTOR, indicio::ERROR, { set_blocking_failed: err.to_string() });
                        continue;
                    }
                    if let Err(err) = stream.set_read_timeout(Some(CONNECTION_POLL)) {
                        clue!(COLLECTOR, indicio::ERROR, { set_timeout_failed: err.to_string() });
                        continue;
                    }
                    self.serve_connection(stream);
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(ACCEPT_POLL);
                }
                Err(err) => {
                    clue!(COLLECTOR, indicio::ERROR, { accept_failed: err.to_string() });
                    std::thread::sleep(ACCEPT_POLL);
                }
            }
        }
    }

    fn serve_connection(&self, mut stream: TcpStream) {
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                return;
            }
            let body = match read_framed(&mut stream) {
                Ok(Some(body)) => body,
                Ok(None) => return,
                Err(err)
                    if err.kind() == std::io::ErrorKind::WouldBlock
                        || err.kind() == std::io::ErrorKind::TimedOut =>
                {
                    continue;
                }
                Err(err) => {
                    clue!(COLLECTOR, indicio::WARNING, { read_request_failed: err.to_string() });
                    return;
                }
            };
            let response_bytes = self.dispatch(&body);
            if let Err(err) = write_framed(&mut stream, &response_bytes) {
                clue!(COLLECTOR, indicio::WARNING, { write_response_failed: err.to_string() });
                return;
            }
            TRANSPORT_REQUESTS_SERVED.click();
        }
    }

    fn dispatch(&self, body: &[u8]) -> Vec<u8> {
        let seq_no;
        let trace;
        let result = match <Request as Unpackable>::unpack(body) {
            Ok((req, _)) => {
                seq_no = req.seq_no;
                trace = req.trace;
                let ctx = Context::from(&req);
                match self.registry.get_server(req.service) {
                    Some(server) => server.call(&ctx, req.method, req.body),
                    None => Err(rpc_pb::Error::UnknownServerName {
                        core: Default::default(),
                        name: req.service.to_string(),
                    }),
                }
            }
            Err(err) => {
                seq_no = 0;
                trace = None;
                Err(rpc_pb::Error::SerializationError {
                    core: Default::default(),
                    err,
                    context: "could not parse rpc_pb::Request".to_string(),
                })
            }
        };
        let (body, service_error, rpc_error) = match result {
            Ok(Ok(body)) => (Some(body), None, None),
            Ok(Err(service_error)) => (None, Some(service_error), None),
            Err(rpc_error) => (None, None, Some(stack_pack(&rpc_error).to_vec())),
        };
        let response = Response {
            seq_no,
            trace,
            body: body.as_deref(),
            service_error: service_error.as_deref(),
            rpc_error: rpc_error.as_deref(),
        };
        stack_pack(&response).to_vec()
    }
}

/////////////////////////////////////////////// TcpClient //////////////////////////////////////////

/// An [rpc_pb::Client] that speaks the same framing as [TcpServer] over one persistent TCP
/// connection, serializing concurrent callers onto it with a mutex.
pub struct TcpClient {
    stream: Mutex<TcpStream>,
    next_seq_no: AtomicU64,
}

impl TcpClient {
    pub fn connect(addr: SocketAddr) -> std::io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        Ok(Self {
            stream: Mutex::new(stream),
            next_seq_no: AtomicU64::new(1),
        })
    }
}

impl rpc_pb::Client for TcpClient {
    fn call(&self, ctx: &Context, server: &str, method: &str, req: &[u8]) -> rpc_pb::Status {
        let seq_no = self.next_seq_no.fetch_add(1, Ordering::Relaxed);
        let request = Request {
            service: server,
            method,
            seq_no,
            body: req,
            caller: ctx.clients(),
            trace: ctx.trace_id(),
        };
        let request_bytes = stack_pack(&request).to_vec();
        let mut stream = self.stream.lock().unwrap();
        write_framed(&mut *stream, &request_bytes)?;
        let response_bytes = read_framed(&mut *stream)?.ok_or_else(|| rpc_pb::Error::TransportFailure {
            core: Default::default(),
            what: "connection closed before a response arrived".to_string(),
        })?;
        let (response, _): (Response, _) = Unpackable::unpack(&response_bytes)?;
        if let Some(rpc_error) = response.rpc_error {
            let (err, _): (rpc_pb::Error, _) = Unpackable::unpack(rpc_error)?;
            return Err(err);
        }
        if let Some(service_error) = response.service_error {
            return Ok(Err(service_error.to_vec()));
        }
        match response.body {
            Some(body) => Ok(Ok(body.to_vec())),
            None => Err(rpc_pb::Error::LogicError {
                core: Default::default(),
                what: "response carried neither a body nor an error".to_string(),
            }),
        }
    }
}
