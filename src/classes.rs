use phf::phf_map;

/// Display labels for the ticket tiers found in the `class` column.
pub static CLASS_LABELS: phf::Map<&'static str, &'static str> = phf_map! {
    "First" => "Пассажиры первого класса",
    "Second" => "Пассажиры второго класса",
    "Third" => "Пассажиры третьего класса",
};

/// Tier order used when grouping by class.
pub const TIER_ORDER: [&str; 3] = ["First", "Second", "Third"];

/// Map a raw class value to its display label.
///
/// Values without an entry in [`CLASS_LABELS`] are returned unchanged, which
/// also makes the mapping idempotent since no label is itself a key.
pub fn display_label(class: &str) -> String {
    CLASS_LABELS
        .get(class)
        .map(|l| l.to_string())
        .unwrap_or_else(|| class.to_string())
}

/// Position of a display label in [`TIER_ORDER`], if it is a known tier.
pub fn tier_rank(label: &str) -> Option<usize> {
    TIER_ORDER
        .iter()
        .position(|t| CLASS_LABELS.get(*t).is_some_and(|l| *l == label))
}
