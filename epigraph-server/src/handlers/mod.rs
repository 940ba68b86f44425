pub mod graph;
pub mod ping;

pub use graph::graph_handler;
pub use ping::ping_handler;
