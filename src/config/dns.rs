//! DNS resolver registries.
//!
//! Two named server lists, "public" and "opennic", consumed by lookups
//! elsewhere in the application. A reload replaces a list only when the
//! corresponding setting is non-empty.

use std::sync::Arc;

use parking_lot::RwLock;

const DEFAULT_PUBLIC_SERVERS: &[&str] = &["8.8.8.8", "8.8.4.4", "9.9.9.9"];
const DEFAULT_OPENNIC_SERVERS: &[&str] = &["193.183.98.66", "172.104.136.243", "89.18.27.167"];

/// Lookup category a resolver serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolverCategory {
    Public,
    Opennic,
}

impl ResolverCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Opennic => "opennic",
        }
    }
}

/// An immutable set of DNS servers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    servers: Vec<String>,
}

impl Resolver {
    pub fn new(servers: Vec<String>) -> Self {
        Self { servers }
    }

    pub fn servers(&self) -> &[String] {
        &self.servers
    }
}

/// Parses a comma-separated server list, dropping all whitespace.
///
/// Returns `None` when nothing is left, so the caller keeps its resolver.
pub fn parse_server_list(list: &str) -> Option<Vec<String>> {
    let compact = strip_whitespace(list);
    if compact.is_empty() {
        return None;
    }

    let servers: Vec<String> = compact
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if servers.is_empty() {
        None
    } else {
        Some(servers)
    }
}

pub(crate) fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Process-wide resolver registries, shared by handle.
#[derive(Debug)]
pub struct DnsResolvers {
    public: RwLock<Arc<Resolver>>,
    opennic: RwLock<Arc<Resolver>>,
}

impl DnsResolvers {
    pub fn new() -> Self {
        let defaults =
            |servers: &[&str]| Resolver::new(servers.iter().map(|s| s.to_string()).collect());
        Self {
            public: RwLock::new(Arc::new(defaults(DEFAULT_PUBLIC_SERVERS))),
            opennic: RwLock::new(Arc::new(defaults(DEFAULT_OPENNIC_SERVERS))),
        }
    }

    fn slot(&self, category: ResolverCategory) -> &RwLock<Arc<Resolver>> {
        match category {
            ResolverCategory::Public => &self.public,
            ResolverCategory::Opennic => &self.opennic,
        }
    }

    pub fn get(&self, category: ResolverCategory) -> Arc<Resolver> {
        Arc::clone(&*self.slot(category).read())
    }

    pub fn replace(&self, category: ResolverCategory, resolver: Resolver) {
        *self.slot(category).write() = Arc::new(resolver);
    }

    /// Rebuilds `category` from a configured list; blank lists are ignored.
    ///
    /// Returns whether the resolver was replaced.
    pub fn rebuild(&self, category: ResolverCategory, list: &str) -> bool {
        let Some(servers) = parse_server_list(list) else {
            return false;
        };

        tracing::debug!(
            "Rebuilding {} resolver with {:?}",
            category.as_str(),
            servers
        );
        self.replace(category, Resolver::new(servers));
        true
    }
}

impl Default for DnsResolvers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_whitespace() {
        assert_eq!(
            parse_server_list("1.1.1.1, 8.8.8.8 ,9.9.9.9"),
            Some(vec![
                "1.1.1.1".to_string(),
                "8.8.8.8".to_string(),
                "9.9.9.9".to_string()
            ])
        );
        assert_eq!(
            parse_server_list("\t1.0.0.1,\n 1.1.1.1 "),
            Some(vec!["1.0.0.1".to_string(), "1.1.1.1".to_string()])
        );
    }

    #[test]
    fn test_parse_blank() {
        assert_eq!(parse_server_list(""), None);
        assert_eq!(parse_server_list("   "), None);
        assert_eq!(parse_server_list(" , ,"), None);
    }

    #[test]
    fn test_defaults() {
        let resolvers = DnsResolvers::new();
        assert_eq!(
            resolvers.get(ResolverCategory::Public).servers(),
            ["8.8.8.8", "8.8.4.4", "9.9.9.9"]
        );
        assert_eq!(resolvers.get(ResolverCategory::Opennic).servers().len(), 3);
    }

    #[test]
    fn test_rebuild_keeps_existing_on_blank() {
        let resolvers = DnsResolvers::new();
        assert!(resolvers.rebuild(ResolverCategory::Opennic, "10.0.0.1"));
        assert!(!resolvers.rebuild(ResolverCategory::Opennic, "  "));

        assert_eq!(
            resolvers.get(ResolverCategory::Opennic).servers(),
            ["10.0.0.1"]
        );
        // Other category untouched.
        assert_eq!(resolvers.get(ResolverCategory::Public).servers()[0], "8.8.8.8");
    }
}
