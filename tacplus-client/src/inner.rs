//! Connection handling and packet I/O for a single server.

use std::future::Future;
use std::pin::pin;

use async_net::TcpStream;
use byteorder::{ByteOrder, NetworkEndian};
use futures::future::{self, Either};
use futures::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use futures_timer::Delay;
use tracing::debug;

use tacplus_protocol::{DeserializeError, HeaderInfo, Packet, PacketBody};

use super::{ClientError, ServerConfig};


/// Runs `future` to completion, failing with [`ClientError::Timeout`] if it takes longer than the server's timeout.
pub(super) async fn with_timeout<F, T>(server: &ServerConfig, future: F) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    let future = pin!(future);

    match future::select(future, Delay::new(server.timeout)).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(ClientError::Timeout {
            server: server.to_string(),
            timeout: server.timeout,
        }),
    }
}

/// Opens a TCP connection to a server.
pub(super) async fn connect(server: &ServerConfig) -> Result<TcpStream, ClientError> {
    debug!(%server, "connecting");
    let connection = TcpStream::connect((server.host.as_str(), server.port)).await?;
    Ok(connection)
}

/// Serializes and writes a packet, obfuscating the body if a key is provided.
pub(super) async fn write_packet<S, B>(
    connection: &mut S,
    packet: Packet<B>,
    secret_key: Option<&[u8]>,
) -> Result<(), ClientError>
where
    S: AsyncWrite + Unpin,
    B: PacketBody,
{
    let packet_buffer = match secret_key {
        Some(key) => packet.serialize(key)?,
        None => packet.serialize_unobfuscated()?,
    };

    debug!(length = packet_buffer.len(), "writing packet");
    connection.write_all(&packet_buffer).await?;
    connection.flush().await.map_err(Into::into)
}

/// Receives a packet, checking that its sequence number is the expected one.
pub(super) async fn receive_packet<S, B>(
    connection: &mut S,
    secret_key: Option<&[u8]>,
    expected_sequence_number: u8,
) -> Result<Packet<B>, ClientError>
where
    S: AsyncRead + Unpin,
    B: PacketBody,
{
    let mut buffer = vec![0; HeaderInfo::HEADER_SIZE_BYTES];
    connection.read_exact(&mut buffer).await?;

    // read rest of body based on length reported in header
    let body_length = NetworkEndian::read_u32(&buffer[8..12]);
    if body_length as usize > B::MAX_LENGTH {
        return Err(DeserializeError::BodyTooLong {
            declared: body_length,
            limit: B::MAX_LENGTH,
        }
        .into());
    }
    buffer.resize(HeaderInfo::HEADER_SIZE_BYTES + body_length as usize, 0);
    connection
        .read_exact(&mut buffer[HeaderInfo::HEADER_SIZE_BYTES..])
        .await?;

    debug!(length = buffer.len(), "received packet");

    // unobfuscate packet as necessary
    let packet: Packet<B> = match secret_key {
        Some(key) => Packet::deserialize(key, &mut buffer)?,
        None => Packet::deserialize_unobfuscated(&buffer)?,
    };

    let actual_sequence_number = packet.header().sequence_number();
    if actual_sequence_number == expected_sequence_number {
        Ok(packet)
    } else {
        Err(ClientError::SequenceNumberMismatch {
            expected: expected_sequence_number,
            actual: actual_sequence_number,
        })
    }
}
