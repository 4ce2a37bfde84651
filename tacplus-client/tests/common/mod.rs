use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tacplus_client::protocol::authorization::{Reply, Request};
use tacplus_client::protocol::{HeaderInfo, Packet, PacketFlags, Version};
use tacplus_client::ServerConfig;

/// The secret shared between the test servers and clients.
pub const SECRET_KEY: &str = "very secure key that is super secret";

/// Binds a listener to an ephemeral loopback port.
fn bind() -> TcpListener {
    TcpListener::bind("127.0.0.1:0").expect("failed to bind to loopback address")
}

/// Builds a client-side server entry pointing at `address`.
pub fn server_config(address: SocketAddr, secret: &str) -> ServerConfig {
    let mut server = ServerConfig::new(address.ip().to_string(), secret);
    server.port = address.port();
    server.timeout = Duration::from_secs(5);
    server
}

/// An address on which nothing is listening.
pub fn closed_address() -> SocketAddr {
    let listener = bind();
    listener
        .local_addr()
        .expect("listener should have an address")
    // listener is dropped here, closing the port
}

fn read_packet(stream: &mut TcpStream) -> Vec<u8> {
    let mut buffer = vec![0; HeaderInfo::HEADER_SIZE_BYTES];
    stream
        .read_exact(&mut buffer)
        .expect("failed to read request header");

    let body_length = u32::from_be_bytes([buffer[8], buffer[9], buffer[10], buffer[11]]);
    buffer.resize(HeaderInfo::HEADER_SIZE_BYTES + body_length as usize, 0);
    stream
        .read_exact(&mut buffer[HeaderInfo::HEADER_SIZE_BYTES..])
        .expect("failed to read request body");

    buffer
}

/// Serves a single authorization exchange, answering with whatever `respond` returns.
///
/// `secret` empty means the exchange happens in the clear. The received request is
/// returned through the join handle.
pub fn spawn_server<F>(secret: &'static str, respond: F) -> (SocketAddr, JoinHandle<Request>)
where
    F: FnOnce(&Request) -> (u8, Reply) + Send + 'static,
{
    let listener = bind();
    let address = listener.local_addr().expect("listener should have an address");

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("failed to accept connection");
        let mut raw_request = read_packet(&mut stream);

        let request: Packet<Request> = if secret.is_empty() {
            Packet::deserialize_unobfuscated(&raw_request)
        } else {
            Packet::deserialize(secret, &mut raw_request)
        }
        .expect("client sent an invalid request");

        let (sequence_number, reply) = respond(request.body());
        let reply_packet = Packet::new(
            HeaderInfo::new(
                Version::default(),
                sequence_number,
                PacketFlags::empty(),
                request.header().session_id(),
            ),
            reply,
        );

        let raw_reply = if secret.is_empty() {
            reply_packet.serialize_unobfuscated()
        } else {
            reply_packet.serialize(secret)
        }
        .expect("reply should serialize");

        stream.write_all(&raw_reply).expect("failed to write reply");
        request.body().clone()
    });

    (address, handle)
}

/// Accepts one connection and holds it open without answering.
pub fn spawn_silent_server(hold_for: Duration) -> SocketAddr {
    let listener = bind();
    let address = listener.local_addr().expect("listener should have an address");

    thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            thread::sleep(hold_for);
            drop(stream);
        }
    });

    address
}
