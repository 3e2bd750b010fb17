//! Partition of a template's resources by declared type

use crate::diagnostics::Diagnostics;
use crate::document::{Mapping, RawResource};

use super::ResourceKind;

/// Resources grouped by kind, each bucket in declaration order
#[derive(Debug, Default)]
pub struct Classified<'a> {
    pub servers: Vec<RawResource<'a>>,
    pub ports: Vec<RawResource<'a>>,
    pub networks: Vec<RawResource<'a>>,
    pub subnets: Vec<RawResource<'a>>,
    pub routers: Vec<RawResource<'a>>,
    pub router_interfaces: Vec<RawResource<'a>>,
    pub floating_ips: Vec<RawResource<'a>>,
    /// Entries without a textual `type`
    pub untyped: usize,
    /// Unrecognized type tags with occurrence counts, in first-seen order
    pub unknown: Vec<(String, usize)>,
}

impl<'a> Classified<'a> {
    pub fn bucket(&self, kind: ResourceKind) -> &[RawResource<'a>] {
        match kind {
            ResourceKind::Server => &self.servers,
            ResourceKind::Port => &self.ports,
            ResourceKind::Network => &self.networks,
            ResourceKind::Subnet => &self.subnets,
            ResourceKind::Router => &self.routers,
            ResourceKind::RouterInterface => &self.router_interfaces,
            ResourceKind::FloatingIp => &self.floating_ips,
            ResourceKind::Unknown => &[],
        }
    }

    fn bucket_mut(&mut self, kind: ResourceKind) -> Option<&mut Vec<RawResource<'a>>> {
        match kind {
            ResourceKind::Server => Some(&mut self.servers),
            ResourceKind::Port => Some(&mut self.ports),
            ResourceKind::Network => Some(&mut self.networks),
            ResourceKind::Subnet => Some(&mut self.subnets),
            ResourceKind::Router => Some(&mut self.routers),
            ResourceKind::RouterInterface => Some(&mut self.router_interfaces),
            ResourceKind::FloatingIp => Some(&mut self.floating_ips),
            ResourceKind::Unknown => None,
        }
    }

    fn tally_unknown(&mut self, tag: &str) {
        match self.unknown.iter_mut().find(|(t, _)| t == tag) {
            Some((_, count)) => *count += 1,
            None => self.unknown.push((tag.to_string(), 1)),
        }
    }

    /// Number of resources sorted into a known bucket
    pub fn recognized(&self) -> usize {
        ResourceKind::KNOWN.iter().map(|k| self.bucket(*k).len()).sum()
    }

    /// Record the per-kind summary, untyped count and unknown tally
    pub fn report(&self, diagnostics: &mut Diagnostics) {
        for kind in ResourceKind::KNOWN {
            diagnostics.info(format!("{}: {}", kind.plural(), self.bucket(kind).len()));
        }
        if self.untyped > 0 {
            diagnostics.info(format!("Without type: {}", self.untyped));
        }
        if !self.unknown.is_empty() {
            diagnostics.info("Unknown types:");
            for (tag, count) in &self.unknown {
                diagnostics.info(format!("{}: {}", tag, count));
            }
        }
    }
}

/// Sort every entry of `resources` into exactly one bucket, or tally it.
pub fn classify(resources: &Mapping) -> Classified<'_> {
    let mut classified = Classified::default();
    for (name, body) in resources.iter() {
        let resource = RawResource::new(name, body);
        let Some(tag) = resource.type_tag() else {
            classified.untyped += 1;
            continue;
        };
        match classified.bucket_mut(ResourceKind::from_type_tag(tag)) {
            Some(bucket) => bucket.push(resource),
            None => classified.tally_unknown(tag),
        }
    }
    classified
}
