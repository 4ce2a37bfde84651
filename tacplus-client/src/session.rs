use std::path::Path;

use futures::executor::block_on;
use rand::Rng;
use tracing::{debug, warn};

use tacplus_protocol::authorization::{Reply, Request};
use tacplus_protocol::{
    Argument, ArgumentFlags, AuthenticationContext, AuthenticationMethod, AuthenticationService,
    AuthenticationType, FieldText, HeaderInfo, MajorVersion, MinorVersion, Packet, PacketFlags,
    PrivilegeLevel, UserInformation, Version,
};

use super::config::{self, MAX_SERVERS};
use super::{inner, AuthorizationResult, ClientError, ServerConfig};

/// An authorization request that is still being filled in.
#[derive(Debug, Clone)]
struct PendingRequest {
    method: AuthenticationMethod,
    context: AuthenticationContext,
    user: Option<String>,
    port: FieldText,
    remote_address: FieldText,
    arguments: Vec<Argument>,
}

impl PendingRequest {
    fn to_body(&self) -> Result<Request, ClientError> {
        let user = self.user.clone().ok_or(ClientError::UserNotSet)?;
        let user_information =
            UserInformation::new(user, self.port.clone(), self.remote_address.clone())
                .ok_or(ClientError::InvalidUser)?;

        Ok(Request::new(
            self.method,
            self.context,
            user_information,
            self.arguments.clone(),
        ))
    }
}

/// A TACACS+ authorization session.
///
/// One request is built up with [`create_authorization`](Self::create_authorization) and the
/// setters, then sent with [`send`](Self::send). The reply is kept until the next request is
/// created, so its arguments can be fetched by index.
#[derive(Debug, Default)]
pub struct Session {
    servers: Vec<ServerConfig>,
    request: Option<PendingRequest>,
    reply: Option<Reply>,
}

impl Session {
    /// Creates a session with no servers configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads servers from a configuration file, appending them to any already added.
    ///
    /// With no explicit `path`, `$TACPLUS_CONF` is used, falling back to `/etc/tacplus.conf`.
    pub fn configure(&mut self, path: Option<&Path>) -> Result<(), ClientError> {
        let path = config::resolve_path(path);
        debug!(path = %path.display(), "loading configuration");

        for server in config::load(&path)? {
            self.add_server(server)?;
        }

        Ok(())
    }

    /// Adds a server to try after those already configured.
    pub fn add_server(&mut self, server: ServerConfig) -> Result<(), ClientError> {
        if self.servers.len() >= MAX_SERVERS {
            return Err(ClientError::TooManyServers);
        }

        if server.obfuscation_key().is_none() {
            warn!(%server, "no shared secret configured, packets will be sent unobfuscated");
        }

        self.servers.push(server);
        Ok(())
    }

    /// The servers that will be tried, in order.
    pub fn servers(&self) -> &[ServerConfig] {
        &self.servers
    }

    /// Starts a new authorization request, discarding any previous request and reply.
    ///
    /// The privilege level starts at 0 and the port and remote address are empty.
    pub fn create_authorization(
        &mut self,
        method: AuthenticationMethod,
        authentication_type: AuthenticationType,
        service: AuthenticationService,
    ) {
        self.reply = None;
        self.request = Some(PendingRequest {
            method,
            context: AuthenticationContext {
                privilege_level: PrivilegeLevel::default(),
                authentication_type,
                service,
            },
            user: None,
            port: FieldText::default(),
            remote_address: FieldText::default(),
            arguments: Vec::new(),
        });
    }

    fn pending(&mut self) -> Result<&mut PendingRequest, ClientError> {
        self.request.as_mut().ok_or(ClientError::NoRequest)
    }

    /// Sets the user the request is about.
    pub fn set_user(&mut self, user: &str) -> Result<(), ClientError> {
        if u8::try_from(user.len()).is_err() {
            return Err(ClientError::InvalidUser);
        }

        self.pending()?.user = Some(user.to_owned());
        Ok(())
    }

    /// Sets the port the user is connected to, e.g. `tty0`.
    pub fn set_port(&mut self, port: &str) -> Result<(), ClientError> {
        self.pending()?.port = FieldText::try_from(port)?;
        Ok(())
    }

    /// Sets the address the user is connecting from.
    pub fn set_remote_address(&mut self, remote_address: &str) -> Result<(), ClientError> {
        self.pending()?.remote_address = FieldText::try_from(remote_address)?;
        Ok(())
    }

    /// Sets the privilege level (0-15) of the request.
    pub fn set_privilege_level(&mut self, level: u8) -> Result<(), ClientError> {
        let privilege_level =
            PrivilegeLevel::new(level).ok_or(ClientError::InvalidPrivilegeLevel(level))?;
        self.pending()?.context.privilege_level = privilege_level;
        Ok(())
    }

    /// Appends an encoded `name=value` (mandatory) or `name*value` (optional) argument to the request.
    pub fn add_argument(&mut self, flags: ArgumentFlags, encoded: &str) -> Result<(), ClientError> {
        let argument =
            Argument::from_encoded(encoded, flags).map_err(|reason| ClientError::InvalidArgument {
                argument: encoded.to_owned(),
                reason,
            })?;

        let request = self.pending()?;
        if request.arguments.len() == usize::from(u8::MAX) {
            return Err(ClientError::TooManyArguments);
        }

        request.arguments.push(argument);
        Ok(())
    }

    /// Sends the request, blocking until a server replies.
    ///
    /// Servers are tried in order; connection failures, I/O errors and timeouts move on to the
    /// next server, while a malformed reply ends the attempt immediately.
    pub fn send(&mut self) -> Result<AuthorizationResult, ClientError> {
        let body = self
            .request
            .as_ref()
            .ok_or(ClientError::NoRequest)?
            .to_body()?;

        let reply = self.exchange_with_fail_over(body)?;
        let result = AuthorizationResult::from(&reply);

        debug!(
            status = result.status(),
            arguments = result.argument_count(),
            "authorization reply received"
        );
        self.reply = Some(reply);

        Ok(result)
    }

    fn exchange_with_fail_over(&self, body: Request) -> Result<Reply, ClientError> {
        // ThreadRng is a CSPRNG
        let session_id: u32 = rand::thread_rng().gen();
        let mut last_error = ClientError::NoServers;

        for server in &self.servers {
            match block_on(exchange(server, session_id, body.clone())) {
                Ok(reply) => return Ok(reply),
                Err(error) if error.try_next_server() => {
                    warn!(%server, %error, "server unavailable");
                    last_error = error;
                }
                Err(error) => return Err(error),
            }
        }

        Err(last_error)
    }

    /// The argument at `index` in the last reply, as the server sent it (usually `name=value`
    /// or `name*value`).
    pub fn argument(&self, index: usize) -> Result<String, ClientError> {
        let reply = self.reply.as_ref().ok_or(ClientError::NoReply)?;

        reply
            .arguments()
            .get(index)
            .cloned()
            .ok_or(ClientError::ArgumentIndex {
                index,
                count: reply.arguments().len(),
            })
    }

    /// The message the server returned for display to the user, if a reply was received.
    pub fn server_message(&self) -> Option<&str> {
        self.reply.as_ref().map(|reply| reply.server_message().as_str())
    }

    /// The administrative log message the server returned, if a reply was received.
    pub fn data(&self) -> Option<&str> {
        self.reply.as_ref().map(|reply| reply.data().as_str())
    }
}

/// Performs one request/reply exchange with a server over a fresh connection.
async fn exchange(
    server: &ServerConfig,
    session_id: u32,
    body: Request,
) -> Result<Reply, ClientError> {
    let mut flags = PacketFlags::empty();
    if server.single_connection {
        flags.insert(PacketFlags::SINGLE_CONNECTION);
    }

    let packet = Packet::new(
        // sequence number = 1 (first packet in session)
        HeaderInfo::new(
            Version::new(MajorVersion::RFC8907, MinorVersion::Default),
            1,
            flags,
            session_id,
        ),
        body,
    );

    let key = server.obfuscation_key();

    inner::with_timeout(server, async {
        let mut connection = inner::connect(server).await?;
        inner::write_packet(&mut connection, packet, key).await?;

        let reply: Packet<Reply> = inner::receive_packet(&mut connection, key, 2).await?;
        Ok(reply.body().clone())
    })
    .await
}
