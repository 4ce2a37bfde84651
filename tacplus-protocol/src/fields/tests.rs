use super::*;

#[test]
fn serialize_authentication_context() {
    let authentication_context = AuthenticationContext {
        privilege_level: PrivilegeLevel::new(14).unwrap(),
        authentication_type: AuthenticationType::Arap,
        service: AuthenticationService::FwProxy,
    };

    let mut buffer = Vec::new();
    authentication_context.serialize(&mut buffer);

    assert_eq!(
        buffer,
        [
            14,   // privilege level
            0x04, // ARAP authentication
            0x09, // firewall proxy service
        ]
    );
}

#[test]
fn serialize_user_information() {
    let user_info = UserInformation::new(
        String::from("useruser"),
        FieldText::try_from("tty0").unwrap(),
        FieldText::try_from("127.72.12.99").unwrap(),
    )
    .expect("user information construction should have succeeded");

    let mut buffer = Vec::new();
    user_info
        .serialize_field_lengths(&mut buffer)
        .expect("length serialization should have succeeded");
    assert_eq!(buffer, [8, 4, 12]);

    buffer.clear();
    user_info.serialize_field_values(&mut buffer);
    assert_eq!(buffer, b"useruser".iter().chain(b"tty0").chain(b"127.72.12.99").copied().collect::<Vec<_>>());
}

#[test]
fn user_information_too_long() {
    let long_user = "a".repeat(256);
    let user_info = UserInformation::new(long_user, FieldText::default(), FieldText::default());
    assert!(user_info.is_none());
}

#[test]
fn privilege_level_bounds() {
    assert!(PrivilegeLevel::new(0).is_some());
    assert!(PrivilegeLevel::new(15).is_some());
    assert!(PrivilegeLevel::new(16).is_none());
}
