use proptest::prelude::*;

use super::*;

#[test]
fn every_method_resolves_to_its_code() {
    let expected: [(&str, u8); 8] = [
        ("notset", 0x00),
        ("none", 0x01),
        ("krb5", 0x02),
        ("line", 0x03),
        ("enable", 0x04),
        ("local", 0x05),
        ("tacacsplus", 0x06),
        ("rcmd", 0x20),
    ];

    assert_eq!(METHODS.len(), expected.len());
    for (name, code) in expected {
        assert_eq!(lookup(METHODS, name).map(|method| method as u8), Some(code));
    }
}

#[test]
fn every_type_resolves_to_its_code() {
    for (code, name) in ["notset", "ascii", "pap", "chap", "arap", "mschap"]
        .into_iter()
        .enumerate()
    {
        assert_eq!(
            lookup(TYPES, name).map(|kind| kind as usize),
            Some(code),
            "{name}"
        );
    }
    assert_eq!(TYPES.len(), 6);
}

#[test]
fn every_service_resolves_to_its_code() {
    let names = [
        "none", "login", "enable", "ppp", "arap", "pt", "rcmd", "x25", "nasi", "fwproxy",
    ];

    for (code, name) in names.into_iter().enumerate() {
        assert_eq!(
            lookup(SERVICES, name).map(|service| service as usize),
            Some(code),
            "{name}"
        );
    }
    assert_eq!(SERVICES.len(), names.len());
}

#[test]
fn lookup_is_exact() {
    assert_eq!(lookup(METHODS, "Local"), None);
    assert_eq!(lookup(METHODS, "loc"), None);
    assert_eq!(lookup(SERVICES, " ppp"), None);
    assert_eq!(lookup(TYPES, ""), None);
}

#[test]
fn name_lists_follow_table_order() {
    assert_eq!(
        name_list(METHODS),
        "notset, none, krb5, line, enable, local, tacacsplus, rcmd"
    );
    assert_eq!(
        name_list(SERVICES),
        "none, login, enable, ppp, arap, pt, rcmd, x25, nasi, fwproxy"
    );
    assert_eq!(name_list(TYPES), "notset, ascii, pap, chap, arap, mschap");
}

proptest! {
    #[test]
    fn unknown_names_never_resolve(name in "\\PC*") {
        let known = |table: &[&str]| table.contains(&name.as_str());

        if !known(&METHODS.iter().map(|(n, _)| *n).collect::<Vec<_>>()) {
            prop_assert_eq!(lookup(METHODS, &name), None);
        }
        if !known(&TYPES.iter().map(|(n, _)| *n).collect::<Vec<_>>()) {
            prop_assert_eq!(lookup(TYPES, &name), None);
        }
        if !known(&SERVICES.iter().map(|(n, _)| *n).collect::<Vec<_>>()) {
            prop_assert_eq!(lookup(SERVICES, &name), None);
        }
    }
}
