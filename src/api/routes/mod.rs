//! Handler routers mounted by the registry

pub mod audio;
pub mod test;
