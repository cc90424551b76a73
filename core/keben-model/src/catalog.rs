//! Materials the yard sells, and the unit each is counted in.

/// Known material names, in the order the form lists them.
pub const MATERIAL_OPTIONS: &[&str] = &[
    "Ballast 1/2",
    "Ballast 3/4",
    "Mixed Ballast",
    "Quarry Sand",
    "Quarry Dust",
    "West Pokot Sand",
    "River Sand",
    "Machine Blocks 6x9",
    "Machine Blocks 9x9",
    "Foundation Stones",
    "Hardcore",
    "Murram",
    "Quarry Waste",
];

/// Placeholder material whose real name is typed in by the driver.
pub const OTHER_MATERIAL: &str = "Other";

/// Returns true if `name` is one of [`MATERIAL_OPTIONS`] (case-insensitive).
pub fn is_known_material(name: &str) -> bool {
    MATERIAL_OPTIONS
        .iter()
        .any(|m| m.eq_ignore_ascii_case(name.trim()))
}

/// Unit a material is measured in when the driver leaves it blank.
///
/// Foundation stones are sold by the foot and machine blocks by the piece;
/// everything else goes by the ton.
pub fn default_unit(material: &str) -> &'static str {
    let m = material.to_lowercase();
    if m.contains("foundation") {
        "ft"
    } else if m.contains("machine block") || m.contains("6x9") || m.contains("9x9") {
        "pieces"
    } else {
        "tons"
    }
}
