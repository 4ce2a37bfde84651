//! Names accepted on the command line for each axis of an authorization request.
//!
//! Table order is the order names are listed in usage messages.

use tacplus_protocol::{AuthenticationMethod, AuthenticationService, AuthenticationType};

#[cfg(test)]
mod tests;

/// An ordered mapping from names to protocol values.
pub type SymbolTable<T> = [(&'static str, T)];

/// Authentication methods (`-m`).
pub const METHODS: &SymbolTable<AuthenticationMethod> = &[
    ("notset", AuthenticationMethod::NotSet),
    ("none", AuthenticationMethod::None),
    ("krb5", AuthenticationMethod::Kerberos5),
    ("line", AuthenticationMethod::Line),
    ("enable", AuthenticationMethod::Enable),
    ("local", AuthenticationMethod::Local),
    ("tacacsplus", AuthenticationMethod::TacacsPlus),
    ("rcmd", AuthenticationMethod::RCommand),
];

/// Authentication types (`-t`).
pub const TYPES: &SymbolTable<AuthenticationType> = &[
    ("notset", AuthenticationType::NotSet),
    ("ascii", AuthenticationType::Ascii),
    ("pap", AuthenticationType::Pap),
    ("chap", AuthenticationType::Chap),
    ("arap", AuthenticationType::Arap),
    ("mschap", AuthenticationType::MsChap),
];

/// Authentication services (`-s`).
pub const SERVICES: &SymbolTable<AuthenticationService> = &[
    ("none", AuthenticationService::None),
    ("login", AuthenticationService::Login),
    ("enable", AuthenticationService::Enable),
    ("ppp", AuthenticationService::Ppp),
    ("arap", AuthenticationService::Arap),
    ("pt", AuthenticationService::Pt),
    ("rcmd", AuthenticationService::RCommand),
    ("x25", AuthenticationService::X25),
    ("nasi", AuthenticationService::Nasi),
    ("fwproxy", AuthenticationService::FwProxy),
];

/// Finds the value for an exact, case-sensitive name.
///
/// # Examples
///
/// ```
/// use tacplus::symbols::{lookup, METHODS};
/// use tacplus_protocol::AuthenticationMethod;
///
/// assert_eq!(lookup(METHODS, "krb5"), Some(AuthenticationMethod::Kerberos5));
/// assert_eq!(lookup(METHODS, "KRB5"), None);
/// ```
pub fn lookup<T: Copy>(table: &SymbolTable<T>, name: &str) -> Option<T> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|&(_, value)| value)
}

/// The names in a table, comma separated, in table order.
pub fn name_list<T>(table: &SymbolTable<T>) -> String {
    table
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}
