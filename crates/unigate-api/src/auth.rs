use std::fmt;
use std::str::FromStr;

/// The platform type of the UniFi controller.
///
/// Determines URL prefixes, login paths, and which cookie carries the
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPlatform {
    /// UniFi OS device (UDM, UCG, etc.) -- port 443, `/proxy/network/` prefix.
    UnifiOs,
    /// Standalone Network Application (Java) -- port 8443, no prefix.
    ClassicController,
}

impl ControllerPlatform {
    /// The path prefix for legacy API endpoints.
    pub fn legacy_prefix(self) -> &'static str {
        match self {
            Self::UnifiOs => "/proxy/network",
            Self::ClassicController => "",
        }
    }

    /// The login endpoint path.
    pub fn login_path(self) -> &'static str {
        match self {
            Self::UnifiOs => "/api/auth/login",
            Self::ClassicController => "/api/login",
        }
    }

    /// The logout endpoint path.
    pub fn logout_path(self) -> &'static str {
        match self {
            Self::UnifiOs => "/api/auth/logout",
            Self::ClassicController => "/api/logout",
        }
    }

    /// Name of the cookie that carries the session on this platform.
    pub fn session_cookie_name(self) -> &'static str {
        match self {
            Self::UnifiOs => "TOKEN",
            Self::ClassicController => "unifises",
        }
    }
}

impl fmt::Display for ControllerPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnifiOs => f.write_str("unifi-os"),
            Self::ClassicController => f.write_str("classic"),
        }
    }
}

impl FromStr for ControllerPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unifi-os" | "unifios" | "os" => Ok(Self::UnifiOs),
            "classic" | "standalone" | "legacy" => Ok(Self::ClassicController),
            other => Err(format!("expected 'unifi-os' or 'classic', got '{other}'")),
        }
    }
}
