//! Hostname resolution for access records.

/// Substituted when the hostname cannot be resolved.
pub const UNKNOWN_HOSTNAME: &str = "unknown";

/// Source of the local hostname. Queried once per request.
pub trait HostnameLookup: Send + Sync + 'static {
    /// `None` when the lookup fails.
    fn hostname(&self) -> Option<String>;
}

/// Asks the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemHostname;

impl HostnameLookup for SystemHostname {
    fn hostname(&self) -> Option<String> {
        sysinfo::System::host_name().filter(|name| !name.is_empty())
    }
}

/// Resolves through `lookup`, falling back to [`UNKNOWN_HOSTNAME`].
pub(crate) fn resolve(lookup: &dyn HostnameLookup) -> String {
    lookup.hostname().unwrap_or_else(|| UNKNOWN_HOSTNAME.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<&'static str>);

    impl HostnameLookup for Fixed {
        fn hostname(&self) -> Option<String> {
            self.0.map(str::to_owned)
        }
    }

    #[test]
    fn failed_lookup_is_unknown() {
        assert_eq!(resolve(&Fixed(None)), "unknown");
    }

    #[test]
    fn successful_lookup_passes_through() {
        assert_eq!(resolve(&Fixed(Some("host42"))), "host42");
    }
}
