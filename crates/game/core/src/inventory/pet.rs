use crate::config::GameConfig;

/// Pet carried in the equip pet slot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PetRecord {
    pub name: String,
    pub level: u16,
    pub exp: u64,
    pub hp: u32,
    pub max_hp: u32,
    /// `0..=GameConfig::MAX_PET_FULLNESS`.
    pub fullness: u8,
    pub summoned: bool,
}

/// What happened to a pet during one of its ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PetTick {
    /// Pet is not summoned; nothing changed.
    Idle,
    Fed { hp: u32, fullness: u8 },
    /// Fullness reached zero and the pet was unsummoned.
    Starved,
}

impl PetRecord {
    pub fn new(name: impl Into<String>, max_hp: u32) -> Self {
        Self {
            name: name.into(),
            level: 1,
            exp: 0,
            hp: max_hp,
            max_hp,
            fullness: GameConfig::MAX_PET_FULLNESS,
            summoned: false,
        }
    }

    /// Drains fullness and regenerates HP; unsummons a starving pet.
    pub fn tick(&mut self, config: &GameConfig) -> PetTick {
        if !self.summoned {
            return PetTick::Idle;
        }
        self.fullness = self.fullness.saturating_sub(config.pet_hunger_per_tick);
        if self.fullness == 0 {
            self.summoned = false;
            return PetTick::Starved;
        }
        self.hp = (self.hp + config.pet_regen_per_tick).min(self.max_hp);
        PetTick::Fed {
            hp: self.hp,
            fullness: self.fullness,
        }
    }

    pub fn feed(&mut self, amount: u8) {
        self.fullness = self
            .fullness
            .saturating_add(amount)
            .min(GameConfig::MAX_PET_FULLNESS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starving_pet_is_unsummoned() {
        let config = GameConfig::default();
        let mut pet = PetRecord::new("Mochi", 100);
        pet.summoned = true;
        pet.fullness = 2;
        pet.hp = 50;

        assert_eq!(
            pet.tick(&config),
            PetTick::Fed {
                hp: 55,
                fullness: 1
            }
        );
        assert_eq!(pet.tick(&config), PetTick::Starved);
        assert!(!pet.summoned);
        assert_eq!(pet.tick(&config), PetTick::Idle);
    }
}
