#[macro_use]
extern crate serde;

mod cancel;
mod create;
mod detail;
mod encryption;
mod error;
mod ledger;
mod list;
mod proposal;
mod serde_hex;
mod transaction;
mod util;
mod wallet;

pub use cancel::*;
pub use create::*;
pub use detail::*;
pub use encryption::*;
pub use error::*;
pub use ledger::*;
pub use list::*;
pub use proposal::*;
pub use serde_hex::*;
pub use transaction::*;
pub use util::*;
pub use wallet::*;
