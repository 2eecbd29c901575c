use std::collections::HashMap;

/// Valid squad member class names a player can call into the field.
pub const SQUAD_MEMBER_CLASSES: [&str; 3] = ["Rusher", "Engineer", "Hunter"];

/// Valid ability names, tactical abilities first, then the abilities of
/// each squad member class.
pub const ABILITIES: [&str; 14] = [
    // tactical
    "Cloak",
    "Air Strike",
    "Scan",
    // Rusher
    "Charge",
    "Concussion Grenade",
    "Target Engines",
    "Focus Fire",
    // Engineer
    "Recharge",
    "Call Artillery",
    "EMP Mine",
    // Hunter
    "Aimed Shot",
    "EMP Grenade",
    "Expose Weakness",
    "Call Scoutdrone",
];

/// Zero-initialized squad member counters for a newly registered player.
pub fn zeroed_squad_counts() -> HashMap<String, u32> {
    SQUAD_MEMBER_CLASSES
        .iter()
        .map(|class| (class.to_string(), 0))
        .collect()
}

/// Zero-initialized ability counters for a newly registered player.
pub fn zeroed_ability_counts() -> HashMap<String, u32> {
    ABILITIES
        .iter()
        .map(|ability| (ability.to_string(), 0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_counts_cover_full_vocabulary() {
        let squads = zeroed_squad_counts();
        assert_eq!(squads.len(), SQUAD_MEMBER_CLASSES.len());
        assert!(squads.values().all(|count| *count == 0));

        let abilities = zeroed_ability_counts();
        assert_eq!(abilities.len(), ABILITIES.len());
        assert!(abilities.contains_key("Call Scoutdrone"));
        assert!(abilities.values().all(|count| *count == 0));
    }
}
