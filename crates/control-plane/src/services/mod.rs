// Services layer for business logic
// Services own business rules and authorization, calling storage directly

pub mod registry;

pub use registry::RegistryService;
