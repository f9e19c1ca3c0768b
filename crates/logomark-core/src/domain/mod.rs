pub mod known;
pub mod name;
pub mod resolver;

pub use name::{clean_name, compact, NormalizedKey, OrganizationKind};
pub use resolver::{
    resolve_domain, resolve_domain_candidates, Domain, DomainDerivation, DomainResolver,
};
