//! CLI subcommand implementations.

pub mod decode;
pub mod execute;
pub mod pending;
pub mod propose;
pub mod vote;

pub use decode::DecodeArgs;
pub use execute::ResolveArgs;
pub use pending::{PendingArgs, ProposalArgs};
pub use propose::ProposeArgs;
pub use vote::VoteArgs;
