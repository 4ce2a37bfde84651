use tacplus_protocol::{AuthenticationMethod, AuthenticationService, AuthenticationType};

/// The method/type/service triple an authorization request is made under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthorizationProfile {
    /// How the user authenticated to the client.
    pub method: AuthenticationMethod,

    /// The kind of authentication that was performed.
    pub authentication_type: AuthenticationType,

    /// The service access is requested for.
    pub service: AuthenticationService,
}

impl Default for AuthorizationProfile {
    fn default() -> Self {
        Self {
            method: AuthenticationMethod::NotSet,
            authentication_type: AuthenticationType::NotSet,
            service: AuthenticationService::None,
        }
    }
}
