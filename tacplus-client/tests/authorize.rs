use std::io::Write;
use std::time::Duration;

use tacplus_client::protocol::authorization::{Reply, Status};
use tacplus_client::protocol::{
    Argument, AuthenticationMethod, AuthenticationService, AuthenticationType,
};
use tacplus_client::{ArgumentFlags, ClientError, Session};

mod common;
use common::{closed_address, server_config, spawn_server, spawn_silent_server, SECRET_KEY};

fn encoded(argument: &str) -> Argument {
    Argument::from_encoded(argument, ArgumentFlags::empty()).expect("test argument should be valid")
}

fn new_request(session: &mut Session) {
    session.create_authorization(
        AuthenticationMethod::TacacsPlus,
        AuthenticationType::Ascii,
        AuthenticationService::Login,
    );
    session.set_user("someuser").expect("user should be valid");
}

#[test]
fn authorize_pass_add_with_arguments() {
    let (address, server) = spawn_server(SECRET_KEY, |_| {
        (
            2,
            Reply::new(
                Status::PassAdd as u8,
                String::from("welcome"),
                String::new(),
                vec![String::from("priv-lvl=15"), String::from("idletime*30")],
            ),
        )
    });

    let mut session = Session::new();
    session
        .add_server(server_config(address, SECRET_KEY))
        .unwrap();

    new_request(&mut session);
    session
        .add_argument(ArgumentFlags::empty(), "service=shell")
        .unwrap();
    session
        .add_argument(ArgumentFlags::empty(), "cmd*show")
        .unwrap();

    let result = session.send().expect("authorization exchange should succeed");
    assert_eq!(result.status(), 0x01);
    assert_eq!(result.known_status(), Some(Status::PassAdd));
    assert_eq!(result.argument_count(), 2);

    assert_eq!(session.argument(0).unwrap(), "priv-lvl=15");
    assert_eq!(session.argument(1).unwrap(), "idletime*30");
    assert!(matches!(
        session.argument(2),
        Err(ClientError::ArgumentIndex { index: 2, count: 2 })
    ));
    assert_eq!(session.server_message(), Some("welcome"));

    // check what actually went over the wire
    let request = server.join().expect("server thread panicked");
    assert_eq!(request.method(), AuthenticationMethod::TacacsPlus);
    assert_eq!(request.user_information().user(), "someuser");
    assert_eq!(request.user_information().port().as_str(), "");
    assert_eq!(
        request.authentication_context().service,
        AuthenticationService::Login
    );
    assert_eq!(
        request.arguments(),
        &vec![encoded("service=shell"), encoded("cmd*show")]
    );
}

#[test]
fn authorize_fail() {
    let (address, server) = spawn_server(SECRET_KEY, |_| {
        (
            2,
            Reply::new(
                Status::Fail as u8,
                String::new(),
                String::from("denied by policy"),
                Vec::new(),
            ),
        )
    });

    let mut session = Session::new();
    session
        .add_server(server_config(address, SECRET_KEY))
        .unwrap();
    new_request(&mut session);

    let result = session.send().expect("exchange should complete");
    assert_eq!(result.known_status(), Some(Status::Fail));
    assert_eq!(result.argument_count(), 0);
    assert_eq!(session.data(), Some("denied by policy"));

    server.join().expect("server thread panicked");
}

#[test]
fn nonconforming_reply_arguments_kept() {
    let (address, server) = spawn_server(SECRET_KEY, |_| {
        (
            2,
            Reply::new(
                Status::PassAdd as u8,
                String::new(),
                String::new(),
                vec![String::from("motd=café"), String::from("foo")],
            ),
        )
    });

    let mut session = Session::new();
    session
        .add_server(server_config(address, SECRET_KEY))
        .unwrap();
    new_request(&mut session);

    let result = session.send().expect("odd arguments shouldn't fail the exchange");
    assert_eq!(result.known_status(), Some(Status::PassAdd));
    assert_eq!(result.argument_count(), 2);
    assert_eq!(session.argument(0).unwrap(), "motd=café");
    assert_eq!(session.argument(1).unwrap(), "foo");

    server.join().expect("server thread panicked");
}

#[test]
fn unknown_status_passed_through() {
    let (address, server) = spawn_server(SECRET_KEY, |_| {
        (2, Reply::new(0x42, String::new(), String::new(), Vec::new()))
    });

    let mut session = Session::new();
    session
        .add_server(server_config(address, SECRET_KEY))
        .unwrap();
    new_request(&mut session);

    let result = session.send().expect("exchange should complete");
    assert_eq!(result.status(), 0x42);
    assert_eq!(result.known_status(), None);

    server.join().expect("server thread panicked");
}

#[test]
fn unobfuscated_exchange() {
    let (address, server) = spawn_server("", |_| {
        (
            2,
            Reply::new(Status::PassReplace as u8, String::new(), String::new(), Vec::new()),
        )
    });

    let mut session = Session::new();
    session.add_server(server_config(address, "")).unwrap();
    new_request(&mut session);

    let result = session.send().expect("exchange should complete");
    assert_eq!(result.known_status(), Some(Status::PassReplace));

    server.join().expect("server thread panicked");
}

#[test]
fn fail_over_to_next_server() {
    let (address, server) = spawn_server(SECRET_KEY, |_| {
        (
            2,
            Reply::new(Status::PassAdd as u8, String::new(), String::new(), Vec::new()),
        )
    });

    let mut session = Session::new();
    session
        .add_server(server_config(closed_address(), SECRET_KEY))
        .unwrap();
    session
        .add_server(server_config(address, SECRET_KEY))
        .unwrap();
    new_request(&mut session);

    let result = session.send().expect("second server should answer");
    assert_eq!(result.known_status(), Some(Status::PassAdd));

    server.join().expect("server thread panicked");
}

#[test]
fn all_servers_down_reports_last_error() {
    let mut session = Session::new();
    session
        .add_server(server_config(closed_address(), SECRET_KEY))
        .unwrap();
    session
        .add_server(server_config(closed_address(), SECRET_KEY))
        .unwrap();
    new_request(&mut session);

    let error = session.send().expect_err("no server is listening");
    assert!(matches!(error, ClientError::IOError(_)));
}

#[test]
fn silent_server_times_out() {
    let address = spawn_silent_server(Duration::from_secs(2));

    let mut server = server_config(address, SECRET_KEY);
    server.timeout = Duration::from_millis(200);

    let mut session = Session::new();
    session.add_server(server).unwrap();
    new_request(&mut session);

    let error = session.send().expect_err("server never answers");
    assert!(matches!(error, ClientError::Timeout { .. }));
}

#[test]
fn bad_sequence_number_is_fatal() {
    let (bad_address, bad_server) = spawn_server(SECRET_KEY, |_| {
        (
            4,
            Reply::new(Status::PassAdd as u8, String::new(), String::new(), Vec::new()),
        )
    });

    let mut session = Session::new();
    session
        .add_server(server_config(bad_address, SECRET_KEY))
        .unwrap();
    // never contacted, since a malformed reply stops the attempt
    session
        .add_server(server_config(closed_address(), SECRET_KEY))
        .unwrap();
    new_request(&mut session);

    let error = session.send().expect_err("reply sequence number is wrong");
    assert!(matches!(
        error,
        ClientError::SequenceNumberMismatch {
            expected: 2,
            actual: 4
        }
    ));

    bad_server.join().expect("server thread panicked");
}

#[test]
fn configured_from_file() {
    let (address, server) = spawn_server(SECRET_KEY, |request| {
        // echo the request arguments back
        (
            2,
            Reply::new(
                Status::PassReplace as u8,
                String::new(),
                String::new(),
                request.arguments().iter().map(ToString::to_string).collect(),
            ),
        )
    });

    let mut file = tempfile::NamedTempFile::new().expect("couldn't create temporary file");
    writeln!(file, "# test server").unwrap();
    writeln!(file, "{address} \"{SECRET_KEY}\" 5").unwrap();

    let mut session = Session::new();
    session
        .configure(Some(file.path()))
        .expect("configuration should load");
    assert_eq!(session.servers().len(), 1);

    new_request(&mut session);
    session
        .add_argument(ArgumentFlags::empty(), "service=ppp")
        .unwrap();

    let result = session.send().expect("exchange should complete");
    assert_eq!(result.argument_count(), 1);
    assert_eq!(session.argument(0).unwrap(), "service=ppp");

    server.join().expect("server thread panicked");
}

#[test]
fn request_state_errors() {
    let mut session = Session::new();

    assert!(matches!(session.set_user("x"), Err(ClientError::NoRequest)));
    assert!(matches!(session.send(), Err(ClientError::NoRequest)));
    assert!(matches!(session.argument(0), Err(ClientError::NoReply)));

    session.create_authorization(
        AuthenticationMethod::NotSet,
        AuthenticationType::NotSet,
        AuthenticationService::None,
    );
    assert!(matches!(session.send(), Err(ClientError::UserNotSet)));

    session.set_user("someone").unwrap();
    assert!(matches!(session.send(), Err(ClientError::NoServers)));
}

#[test]
fn invalid_arguments_rejected() {
    let mut session = Session::new();
    new_request(&mut session);

    assert!(matches!(
        session.add_argument(ArgumentFlags::empty(), "noseparator"),
        Err(ClientError::InvalidArgument { .. })
    ));
    assert!(matches!(
        session.set_user(&"u".repeat(256)),
        Err(ClientError::InvalidUser)
    ));
    assert!(matches!(
        session.set_privilege_level(16),
        Err(ClientError::InvalidPrivilegeLevel(16))
    ));
    assert!(matches!(
        session.set_port("tty\t0"),
        Err(ClientError::InvalidText(_))
    ));
}

#[test]
fn server_limit() {
    let mut session = Session::new();
    for _ in 0..tacplus_client::config::MAX_SERVERS {
        session
            .add_server(server_config(closed_address(), SECRET_KEY))
            .unwrap();
    }

    assert!(matches!(
        session.add_server(server_config(closed_address(), SECRET_KEY)),
        Err(ClientError::TooManyServers)
    ));
}
