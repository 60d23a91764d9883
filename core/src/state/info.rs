/// Area the host reports on a zone change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaInstance {
    pub name: String,
    /// Instance identity; differs between two visits to the same map layout.
    pub hash: u64,
    pub is_town: bool,
    pub is_hideout: bool,
}

impl AreaInstance {
    pub fn new(name: impl Into<String>, hash: u64) -> Self {
        Self {
            name: name.into(),
            hash,
            is_town: false,
            is_hideout: false,
        }
    }

    pub fn town(name: impl Into<String>, hash: u64) -> Self {
        Self {
            is_town: true,
            ..Self::new(name, hash)
        }
    }

    pub fn hideout(name: impl Into<String>, hash: u64) -> Self {
        Self {
            is_hideout: true,
            ..Self::new(name, hash)
        }
    }

    /// Towns and hideouts pause tracking instead of starting a run.
    pub fn is_town_or_hideout(&self) -> bool {
        self.is_town || self.is_hideout
    }
}

/// Player values read from the host at the time of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerSnapshot {
    pub level: u32,
    pub xp: u64,
}

impl PlayerSnapshot {
    pub fn new(level: u32, xp: u64) -> Self {
        Self { level, xp }
    }
}
