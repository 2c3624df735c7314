//! Party membership as seen by kill rewards.
//!
//! Parties themselves are managed elsewhere; the runtime only asks who is in
//! a character's party and how rewards are split.

use std::collections::HashMap;
use std::sync::RwLock;

use mmo_core::CharacterId;
use serde::{Deserialize, Serialize};

use crate::api::Result;
use crate::live::{read, write};

/// How experience and loot from a kill are shared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistributionMode {
    /// The killer gets everything.
    #[default]
    Solo,
    /// Experience is split evenly between members near the kill; loot goes
    /// to one of them at random.
    PartyShared,
}

pub trait PartyDirectory: Send + Sync {
    /// Members of `character`'s party, including `character`. Empty when
    /// not in a party.
    fn members(&self, character: CharacterId) -> Result<Vec<CharacterId>>;

    fn mode(&self, character: CharacterId) -> Result<DistributionMode>;
}

/// Nobody is ever in a party.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoParties;

impl PartyDirectory for NoParties {
    fn members(&self, _character: CharacterId) -> Result<Vec<CharacterId>> {
        Ok(Vec::new())
    }

    fn mode(&self, _character: CharacterId) -> Result<DistributionMode> {
        Ok(DistributionMode::Solo)
    }
}

#[derive(Debug)]
struct Party {
    members: Vec<CharacterId>,
    mode: DistributionMode,
}

/// Process-local parties keyed by an opaque party number.
#[derive(Debug, Default)]
pub struct InMemoryParties {
    parties: RwLock<HashMap<u32, Party>>,
    membership: RwLock<HashMap<CharacterId, u32>>,
}

impl InMemoryParties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or replaces party `party`. Members leave any previous party.
    pub fn form(&self, party: u32, members: Vec<CharacterId>, mode: DistributionMode) -> Result<()> {
        let mut parties = write(&self.parties)?;
        let mut membership = write(&self.membership)?;
        for member in &members {
            if let Some(previous) = membership.insert(*member, party)
                && previous != party
                && let Some(old) = parties.get_mut(&previous)
            {
                old.members.retain(|id| id != member);
            }
        }
        parties.insert(party, Party { members, mode });
        Ok(())
    }

    pub fn leave(&self, character: CharacterId) -> Result<()> {
        let mut parties = write(&self.parties)?;
        if let Some(party) = write(&self.membership)?.remove(&character)
            && let Some(entry) = parties.get_mut(&party)
        {
            entry.members.retain(|id| *id != character);
        }
        Ok(())
    }
}

impl PartyDirectory for InMemoryParties {
    fn members(&self, character: CharacterId) -> Result<Vec<CharacterId>> {
        let parties = read(&self.parties)?;
        Ok(read(&self.membership)?
            .get(&character)
            .and_then(|party| parties.get(party))
            .map(|party| party.members.clone())
            .unwrap_or_default())
    }

    fn mode(&self, character: CharacterId) -> Result<DistributionMode> {
        let parties = read(&self.parties)?;
        Ok(read(&self.membership)?
            .get(&character)
            .and_then(|party| parties.get(party))
            .map(|party| party.mode)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_follow_the_latest_party() {
        let parties = InMemoryParties::new();
        let (a, b, c) = (CharacterId(1), CharacterId(2), CharacterId(3));
        parties.form(1, vec![a, b], DistributionMode::PartyShared).unwrap();
        parties.form(2, vec![b, c], DistributionMode::Solo).unwrap();

        assert_eq!(parties.members(a).unwrap(), vec![a]);
        assert_eq!(parties.members(b).unwrap(), vec![b, c]);
        assert_eq!(parties.mode(a).unwrap(), DistributionMode::PartyShared);

        parties.leave(c).unwrap();
        assert_eq!(parties.members(b).unwrap(), vec![b]);
        assert!(parties.members(c).unwrap().is_empty());
    }
}
