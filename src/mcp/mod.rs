// MCP server
// JSON-RPC 2.0 over newline-delimited stdio

mod protocol;
mod server;

pub use protocol::{RpcError, MCP_PROTOCOL_VERSION, SERVER_NAME};
pub use server::McpServer;
