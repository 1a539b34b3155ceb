//! Custom resolution and transform plugins layered on the bundler.

mod define;
mod forced_node_modules;
mod stub;

pub use define::DefinePlugin;
pub use forced_node_modules::ForcedNodeModulesPlugin;
pub use stub::{StubPlugin, stub_source};
