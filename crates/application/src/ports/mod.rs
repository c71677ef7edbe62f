pub mod name_resolver;
pub mod request_context;

pub use name_resolver::NameResolver;
pub use request_context::RequestContext;
