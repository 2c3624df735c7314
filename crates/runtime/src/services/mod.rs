//! Player-facing and periodic operations on the [`World`](crate::World).
//!
//! Every operation follows the same order inside one character: mutate under
//! the character's locks, recompute stats if the mutation touched anything
//! the pipeline reads, then publish. Business-rule rejections come back as
//! [`ActionResult::rejected`]; lookup failures are logged and come back as
//! [`ActionResult::aborted`]. Only infrastructure failures are `Err`.

mod buffs;
mod combat;
mod death;
mod inventory;
mod items;
mod periodic;
mod pets;
mod progression;
mod session;
mod social;
mod stats;

use mmo_core::{ActionError, CharacterId};
use tracing::{debug, warn};

use crate::api::ActionResult;

pub(crate) fn reject(error: ActionError, character: CharacterId, action: &'static str) -> ActionResult {
    match error {
        ActionError::Rejected(rejection) => {
            debug!(%character, action, %rejection, "action rejected");
            ActionResult::rejected(rejection)
        }
        ActionError::Lookup(error) => {
            warn!(%character, action, %error, "lookup failed, action aborted");
            ActionResult::aborted()
        }
    }
}
