use bitflags::bitflags;

bitflags! {
    /// Optional host integrations known to be loaded in this process.
    ///
    /// Supplied by the host at startup instead of probing for loaded modules.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Integrations: u32 {
        /// The subscription client (store, resource records, package installer).
        const SUBSCRIPTION_CLIENT = 1 << 0;
        /// The calendar sync engine (OmniEvent).
        const OMNIEVENT = 1 << 1;

        const ALL = Self::SUBSCRIPTION_CLIENT.bits() | Self::OMNIEVENT.bits();
    }
}

/// How the host process is running.
///
/// Setup only acts while serving; one-off scripts and asset builds share the code base
/// but must not refresh subscriptions or install packages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HostMode {
    #[default]
    Serving,
    Script,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_covers_every_integration() {
        assert_eq!(Integrations::ALL, Integrations::SUBSCRIPTION_CLIENT | Integrations::OMNIEVENT);
        assert!(!Integrations::OMNIEVENT.contains(Integrations::SUBSCRIPTION_CLIENT));
    }

    #[test]
    fn hosts_serve_by_default() {
        assert_eq!(HostMode::default(), HostMode::Serving);
    }
}
